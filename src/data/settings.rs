use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, FromQueryResult, JsonValue, Statement,
};

use crate::{
    error::AppError,
    model::settings::{SettingsKind, SettingsRow, ROW_ID_ALIAS, SENTINEL_ID},
};

/// Reads rows from one of the settings tables.
///
/// Columns are not known at compile time: every query selects `*` and each row comes back
/// as a JSON object, so columns added to the tables by later migrations show up as new
/// settings without any change here. Table and column names come from [`SettingsKind`] and
/// are never user supplied.
pub struct SettingsRepository<'a> {
    db: &'a DatabaseConnection,
    kind: SettingsKind,
}

impl<'a> SettingsRepository<'a> {
    pub fn new(db: &'a DatabaseConnection, kind: SettingsKind) -> Self {
        Self { db, kind }
    }

    pub fn guilds(db: &'a DatabaseConnection) -> Self {
        Self::new(db, SettingsKind::Guild)
    }

    pub fn users(db: &'a DatabaseConnection) -> Self {
        Self::new(db, SettingsKind::User)
    }

    fn statement(&self, sql: String) -> Statement {
        Statement::from_string(self.db.get_database_backend(), sql)
    }

    fn to_row(&self, value: JsonValue) -> Result<SettingsRow, AppError> {
        Ok(SettingsRow::from_json(self.kind, value)?)
    }

    /// Fetches the sentinel row holding the table's default values.
    ///
    /// # Returns
    /// - `Ok(Some(SettingsRow))` - Sentinel row exists
    /// - `Ok(None)` - Table has no sentinel row yet
    /// - `Err(AppError)` - Query failed or the row couldn't be read
    pub async fn find_default(&self) -> Result<Option<SettingsRow>, AppError> {
        let sql = format!(
            "SELECT CAST({id} AS TEXT) AS {alias}, * FROM {table} WHERE {id} = {sentinel}",
            id = self.kind.id_column(),
            alias = ROW_ID_ALIAS,
            table = self.kind.table(),
            sentinel = SENTINEL_ID,
        );

        JsonValue::find_by_statement(self.statement(sql))
            .one(self.db)
            .await?
            .map(|value| self.to_row(value))
            .transpose()
    }

    /// Inserts the sentinel row with every column at its database default and returns it.
    pub async fn insert_default(&self) -> Result<SettingsRow, AppError> {
        let sql = format!(
            "INSERT INTO {table} ({id}) VALUES ({sentinel}) RETURNING CAST({id} AS TEXT) AS {alias}, *",
            id = self.kind.id_column(),
            alias = ROW_ID_ALIAS,
            table = self.kind.table(),
            sentinel = SENTINEL_ID,
        );

        let value = JsonValue::find_by_statement(self.statement(sql))
            .one(self.db)
            .await?
            .ok_or(DbErr::RecordNotInserted)?;

        self.to_row(value)
    }

    /// Fetches the sentinel row, creating it first if the table doesn't have one.
    pub async fn ensure_default(&self) -> Result<SettingsRow, AppError> {
        if let Some(row) = self.find_default().await? {
            return Ok(row);
        }

        tracing::info!("No default row in {}, inserting one", self.kind.table());
        self.insert_default().await
    }

    /// Fetches every row except the sentinel.
    pub async fn get_all(&self) -> Result<Vec<SettingsRow>, AppError> {
        let sql = format!(
            "SELECT CAST({id} AS TEXT) AS {alias}, * FROM {table} WHERE {id} <> {sentinel}",
            id = self.kind.id_column(),
            alias = ROW_ID_ALIAS,
            table = self.kind.table(),
            sentinel = SENTINEL_ID,
        );

        JsonValue::find_by_statement(self.statement(sql))
            .all(self.db)
            .await?
            .into_iter()
            .map(|value| self.to_row(value))
            .collect()
    }
}

//! Guild settings factory for creating `guild_settings` rows.

use crate::factory::helpers::next_id;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test guild settings rows with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::guild_settings::GuildSettingsFactory;
///
/// let guild = GuildSettingsFactory::new(&db)
///     .guild_id(42)
///     .prefix(Some("?"))
///     .build()
///     .await?;
/// ```
pub struct GuildSettingsFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: i64,
    prefix: Option<String>,
}

impl<'a> GuildSettingsFactory<'a> {
    /// Creates a new GuildSettingsFactory with default values.
    ///
    /// Defaults:
    /// - guild_id: auto-incremented, never `0`
    /// - prefix: `None`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the row
    ///
    /// # Returns
    /// - `GuildSettingsFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: next_id(),
            prefix: None,
        }
    }

    /// Sets the guild ID.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID, or `0` for the sentinel row
    ///
    /// # Returns
    /// - `Self` - Factory instance for method chaining
    pub fn guild_id(mut self, guild_id: i64) -> Self {
        self.guild_id = guild_id;
        self
    }

    /// Sets the command prefix.
    ///
    /// # Arguments
    /// - `prefix` - Optional prefix override for the guild
    ///
    /// # Returns
    /// - `Self` - Factory instance for method chaining
    pub fn prefix(mut self, prefix: Option<&str>) -> Self {
        self.prefix = prefix.map(str::to_string);
        self
    }

    /// Builds and inserts the row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::guild_settings::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::guild_settings::Model, DbErr> {
        entity::guild_settings::ActiveModel {
            guild_id: ActiveValue::Set(self.guild_id),
            prefix: ActiveValue::Set(self.prefix),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a guild settings row with default values.
///
/// Shorthand for `GuildSettingsFactory::new(db).build().await`.
pub async fn create_guild_settings(
    db: &DatabaseConnection,
) -> Result<entity::guild_settings::Model, DbErr> {
    GuildSettingsFactory::new(db).build().await
}

/// Creates the sentinel guild settings row (`guild_id = 0`).
///
/// # Arguments
/// - `db` - Database connection
/// - `prefix` - Default prefix stored on the sentinel row
pub async fn create_default_guild_settings(
    db: &DatabaseConnection,
    prefix: Option<&str>,
) -> Result<entity::guild_settings::Model, DbErr> {
    GuildSettingsFactory::new(db)
        .guild_id(0)
        .prefix(prefix)
        .build()
        .await
}

//! Settings records for guilds and users.
//!
//! A settings record is a mapping from column name to value. The columns are not fixed at
//! compile time: whatever columns the `guild_settings` / `user_settings` tables carry are
//! read as-is, so new settings only need a migration, not a code change.

use serde_json::Value;

use crate::error::internal::InternalError;

/// ID of the row that holds default values in each settings table.
pub const SENTINEL_ID: u64 = 0;

/// Column alias queries use to return the primary key as text alongside the row.
///
/// Integer columns don't decode to JSON the same way on every backend, so the ID is read
/// from this alias when present and written back into the ID column as a number.
pub const ROW_ID_ALIAS: &str = "settings_row_id";

/// A single entity's settings, keyed by column name.
pub type Settings = serde_json::Map<String, Value>;

/// Which settings table a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsKind {
    Guild,
    User,
}

impl SettingsKind {
    /// Name of the backing table.
    pub fn table(self) -> &'static str {
        match self {
            Self::Guild => "guild_settings",
            Self::User => "user_settings",
        }
    }

    /// Name of the primary key column.
    pub fn id_column(self) -> &'static str {
        match self {
            Self::Guild => "guild_id",
            Self::User => "user_id",
        }
    }
}

/// A row read from a settings table.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsRow {
    /// Guild or user ID taken from the primary key column.
    pub id: u64,
    /// Every column of the row, including the primary key.
    pub values: Settings,
}

impl SettingsRow {
    /// Converts a JSON object returned by the database into a settings row.
    ///
    /// # Arguments
    /// - `kind` - Table the row was read from, used to locate the ID column
    /// - `value` - Row as returned by `JsonValue::find_by_statement`
    ///
    /// # Returns
    /// - `Ok(SettingsRow)` - Row with its parsed ID
    /// - `Err(InternalError::MalformedSettingsRow)` - Not an object, or the ID is unusable
    pub fn from_json(kind: SettingsKind, value: Value) -> Result<Self, InternalError> {
        let values = match value {
            Value::Object(values) => values,
            other => {
                return Err(InternalError::MalformedSettingsRow {
                    table: kind.table(),
                    reason: format!("expected an object, got {}", other),
                })
            }
        };

        let mut values = values;
        let raw_id = values
            .remove(ROW_ID_ALIAS)
            .or_else(|| values.get(kind.id_column()).cloned());

        let id = match raw_id {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.parse::<u64>().ok(),
            _ => None,
        }
        .ok_or_else(|| InternalError::MalformedSettingsRow {
            table: kind.table(),
            reason: format!("missing or invalid {} column", kind.id_column()),
        })?;

        values.insert(kind.id_column().to_string(), Value::from(id));

        Ok(Self { id, values })
    }
}

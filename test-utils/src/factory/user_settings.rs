//! User settings factory for creating `user_settings` rows.

use crate::factory::helpers::next_id;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test user settings rows.
pub struct UserSettingsFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: i64,
}

impl<'a> UserSettingsFactory<'a> {
    /// Creates a new UserSettingsFactory with an auto-incremented user ID.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            user_id: next_id(),
        }
    }

    /// Sets the user ID.
    pub fn user_id(mut self, user_id: i64) -> Self {
        self.user_id = user_id;
        self
    }

    /// Builds and inserts the row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::user_settings::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::user_settings::Model, DbErr> {
        entity::user_settings::ActiveModel {
            user_id: ActiveValue::Set(self.user_id),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a user settings row with an auto-assigned ID.
pub async fn create_user_settings(
    db: &DatabaseConnection,
) -> Result<entity::user_settings::Model, DbErr> {
    UserSettingsFactory::new(db).build().await
}

/// Creates the sentinel user settings row (`user_id = 0`).
pub async fn create_default_user_settings(
    db: &DatabaseConnection,
) -> Result<entity::user_settings::Model, DbErr> {
    UserSettingsFactory::new(db).user_id(0).build().await
}

//! Startup hydration of the settings caches.
//!
//! Runs once in a background task while the gateway connects. The sequence is strictly
//! ordered:
//!
//! 1. Clear the guild and user caches
//! 2. Take a database connection for the duration of the sequence
//! 3. Ensure the guild sentinel row exists and merge its columns into the guild defaults
//! 4. Load every other guild row into the guild cache
//! 5. Repeat 3 and 4 for users
//! 6. Run each extension's `cache_setup` in registration order
//! 7. Wait until every local shard is ready
//! 8. Release the connection
//!
//! Any error is returned to the caller, which treats it as fatal. Commands handled before
//! the sequence finishes may see partially hydrated caches.

use sea_orm::DatabaseConnection;

use crate::{
    bot::readiness::ReadySignal,
    cache::SettingsStore,
    data::settings::SettingsRepository,
    error::AppError,
    extension::ExtensionRegistry,
    model::settings::SettingsKind,
};

pub struct SettingsHydrationService<'a> {
    db: &'a DatabaseConnection,
    settings: &'a SettingsStore,
}

impl<'a> SettingsHydrationService<'a> {
    pub fn new(db: &'a DatabaseConnection, settings: &'a SettingsStore) -> Self {
        Self { db, settings }
    }

    /// Clears both caches and reloads them from the database.
    ///
    /// Covers steps 1 and 3 to 5 of the startup sequence.
    pub async fn hydrate(&self) -> Result<(), AppError> {
        tracing::debug!("Clearing settings caches");
        self.settings.clear();

        self.hydrate_kind(SettingsKind::Guild).await?;
        self.hydrate_kind(SettingsKind::User).await?;

        Ok(())
    }

    /// Loads the defaults and every entity row for one settings table.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of entity rows loaded
    /// - `Err(AppError)` - Query failed or a row couldn't be read
    pub async fn hydrate_kind(&self, kind: SettingsKind) -> Result<usize, AppError> {
        let repo = SettingsRepository::new(self.db, kind);

        let sentinel = repo.ensure_default().await?;
        self.settings.hydrate_defaults(kind, &sentinel.values);

        let rows = repo.get_all().await?;
        let count = rows.len();
        self.settings.hydrate_all(kind, rows);

        tracing::info!("Loaded {} rows from {}", count, kind.table());

        Ok(count)
    }
}

/// Runs the full startup sequence.
///
/// Takes ownership of a connection handle and drops it once the sequence finishes, on
/// success or error.
///
/// # Arguments
/// - `db` - Connection used for the whole sequence
/// - `settings` - Caches to hydrate
/// - `extensions` - Extensions whose `cache_setup` hooks run after hydration
/// - `ready` - Signal fired once every local shard is ready
pub async fn run_startup(
    db: DatabaseConnection,
    settings: &SettingsStore,
    extensions: &ExtensionRegistry,
    ready: &ReadySignal,
) -> Result<(), AppError> {
    SettingsHydrationService::new(&db, settings).hydrate().await?;

    extensions.cache_setup_all(&db).await?;

    tracing::debug!("Waiting until ready before completing startup");
    ready.wait().await;

    drop(db);
    tracing::info!("Startup hydration complete");

    Ok(())
}

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::{config::Config, data::redis::RedisConnection, error::AppError};

/// Connects to the configured database and runs pending migrations.
///
/// Returns `Ok(None)` when `database.enabled` is false.
///
/// # Arguments
/// - `config` - Configuration containing the `[database]` section
///
/// # Returns
/// - `Ok(Some(DatabaseConnection))` - Connected database with migrations applied
/// - `Ok(None)` - Database disabled
/// - `Err(AppError::DbErr)` - Failed to connect to the database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<Option<DatabaseConnection>, AppError> {
    if !config.database.enabled {
        tracing::info!("Database connection has been disabled");
        return Ok(None);
    }

    tracing::info!("Creating database pool");
    let mut opt = ConnectOptions::new(config.database.connection_url());
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;
    tracing::info!("Created database pool successfully");

    Ok(Some(db))
}

/// Connects to the configured redis server.
///
/// Returns `Ok(None)` when `redis.enabled` is false.
pub async fn connect_to_redis(config: &Config) -> Result<Option<RedisConnection>, AppError> {
    if !config.redis.enabled {
        tracing::info!("Redis connection has been disabled");
        return Ok(None);
    }

    tracing::info!("Creating redis connection");
    let redis = RedisConnection::connect(&config.redis).await?;
    tracing::info!("Created redis connection successfully");

    Ok(Some(redis))
}

//! Error types and the fatal startup path.
//!
//! `AppError` is the top-level error type that wraps domain-specific errors. Most code
//! propagates it with `?`. Code that can end the process (configuration loading and
//! reloading, the background settings hydration task and the bot's run loop) hands it to
//! [`fatal`], which is the only code path that terminates the process on error. Background
//! tasks reach it through [`supervise`].

pub mod config;
pub mod internal;

use std::{fmt::Display, future::Future};

use thiserror::Error;

use crate::{
    error::{config::ConfigError, internal::InternalError},
    util::time_value::InvalidTimeDuration,
};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application. Most variants
/// use `#[from]` for automatic error conversion.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup, reload or CLI validation.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Key-value cache error from redis.
    #[error(transparent)]
    RedisErr(#[from] redis::RedisError),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// HTTP client request error from reqwest.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// A user supplied duration could not be parsed.
    #[error(transparent)]
    TimeValueErr(#[from] InvalidTimeDuration),

    /// Internal invariant violation, indicating a bug or an unexpected schema.
    #[error(transparent)]
    InternalErr(#[from] InternalError),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

/// Logs an unrecoverable error at critical severity and terminates the process.
///
/// Running with an unknown configuration or a cold settings cache is unsafe, so there is
/// no degraded mode: the error is logged once on the `critical` target and the process
/// exits with status 1.
///
/// # Arguments
/// - `err` - The error that stopped the bot
pub fn fatal(err: impl Display) -> ! {
    tracing::error!(target: "critical", "Fatal error: {}", err);
    std::process::exit(1)
}

/// Awaits `task` and hands its error, if any, to `on_fatal`.
///
/// Background startup tasks pass `|e| fatal(e)` as the hook.
pub async fn supervise<F>(task: F, on_fatal: impl FnOnce(AppError))
where
    F: Future<Output = Result<(), AppError>>,
{
    if let Err(e) = task.await {
        on_fatal(e);
    }
}

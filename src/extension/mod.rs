//! Extensions add commands and startup work to the bot.
//!
//! An extension hands its poise commands to the framework and may load its own data during
//! startup through [`Extension::cache_setup`]. Extensions are registered in order on an
//! [`ExtensionRegistry`]; that order is the order their `cache_setup` hooks run in and the
//! order their commands are registered with the framework.

pub mod builtin;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::async_trait;

use crate::{bot::framework::Command, error::AppError};

#[async_trait]
pub trait Extension: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Commands this extension registers with the framework.
    fn commands(&self) -> Vec<Command> {
        Vec::new()
    }

    /// Loads extension data at startup.
    ///
    /// Runs after the settings caches are hydrated and before the bot waits for the
    /// gateway. An error here aborts startup.
    async fn cache_setup(&self, _db: &DatabaseConnection) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct ExtensionRegistry {
    extensions: Vec<Arc<dyn Extension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an extension after every extension already registered.
    pub fn register(mut self, extension: impl Extension + 'static) -> Self {
        tracing::debug!("Registering extension {}", extension.name());
        self.extensions.push(Arc::new(extension));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Extension>> {
        self.extensions.iter()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Every extension's commands, in registration order.
    pub fn commands(&self) -> Vec<Command> {
        self.extensions
            .iter()
            .flat_map(|extension| extension.commands())
            .collect()
    }

    /// Runs every extension's `cache_setup` in registration order, stopping at the first
    /// error.
    pub async fn cache_setup_all(&self, db: &DatabaseConnection) -> Result<(), AppError> {
        for extension in &self.extensions {
            tracing::debug!("Running cache setup for {}", extension.name());
            extension.cache_setup(db).await?;
        }
        Ok(())
    }
}

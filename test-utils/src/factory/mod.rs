//! Factory methods for creating test data.
//!
//! This module provides factory methods for seeding the settings tables with sensible
//! defaults, reducing boilerplate in tests.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Sentinel row holding the default values
//!     factory::guild_settings::create_default_guild_settings(&db, Some("!")).await?;
//!
//!     // A regular guild with an auto-assigned ID
//!     let guild = factory::guild_settings::create_guild_settings(&db).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! ```rust,ignore
//! let guild = factory::guild_settings::GuildSettingsFactory::new(&db)
//!     .guild_id(42)
//!     .prefix(Some("?"))
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `guild_settings` - Create `guild_settings` rows
//! - `user_settings` - Create `user_settings` rows
//! - `helpers` - Shared ID generation

pub mod guild_settings;
pub mod helpers;
pub mod user_settings;

// Re-export commonly used factory functions for concise usage
pub use guild_settings::{create_default_guild_settings, create_guild_settings};
pub use user_settings::{create_default_user_settings, create_user_settings};

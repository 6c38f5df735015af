//! Botkit Test Utils
//!
//! Provides shared testing utilities for building integration and unit tests for botkit. This
//! crate offers a builder pattern for creating test contexts with in-memory SQLite databases and
//! factories for seeding the settings tables.
//!
//! # Overview
//!
//! The test utilities consist of four main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **serenity**: Factories for Serenity models built from API-shaped JSON
//!
//! # Usage
//!
//! Use `TestBuilder` to create a test context with the required database tables:
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::GuildSettings;
//!
//! #[tokio::test]
//! async fn test_guild_settings() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(GuildSettings)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod serenity;

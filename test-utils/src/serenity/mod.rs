//! Test factories for creating Serenity API objects.
//!
//! Serenity models can't be built field by field, so these factories deserialize JSON
//! shaped like Discord's API responses, with sensible defaults for everything the caller
//! doesn't care about.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::{create_test_message, create_test_user};
//!
//! let author = create_test_user(10, "alice", false);
//! let message = create_test_message(1, 500, Some(900), &author, "hello");
//! ```
//!
//! # Available Factories
//!
//! - `user::create_test_user` - Create Serenity User objects
//! - `member::create_test_member` - Create Serenity Member objects
//! - `guild::create_test_guild` - Create a Guild with roles and channels
//! - `reaction::create_test_reaction` - Create a guild Reaction with its member
//! - `message::create_test_message` - Create Serenity Message objects
//! - `message::create_test_message_from_json` - Create a Message with extra fields

pub mod guild;
pub mod member;
pub mod message;
pub mod reaction;
pub mod user;

pub use guild::create_test_guild;
pub use member::create_test_member;
pub use message::{create_test_message, create_test_message_from_json};
pub use reaction::create_test_reaction;
pub use user::create_test_user;

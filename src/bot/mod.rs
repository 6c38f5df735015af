//! Discord-facing side of the bot: the command framework, gateway events and the helpers
//! commands use.

pub mod delete_button;
pub mod framework;
pub mod gateway;
pub mod handler;
pub mod invite;
pub mod message_log;
pub mod presence;
pub mod prefix;
pub mod readiness;
pub mod start;

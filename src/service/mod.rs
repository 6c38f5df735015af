//! Service layer.
//!
//! Services coordinate repositories, caches and external collaborators. They are what the
//! bot's event handlers and background tasks call into.

pub mod google_analytics;
pub mod hydration;
pub mod stats;

#[cfg(test)]
mod test;

//! Persistence layer.
//!
//! Repositories here talk to the relational database through SeaORM and to redis through
//! the `redis` crate. They return domain types from `crate::model` so callers never see
//! raw query results.

pub mod redis;
pub mod settings;

#[cfg(test)]
mod test;

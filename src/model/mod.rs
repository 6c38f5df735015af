//! Domain models shared between the data, cache and service layers.

pub mod settings;

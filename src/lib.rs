pub mod bot;
pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod extension;
pub mod model;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;

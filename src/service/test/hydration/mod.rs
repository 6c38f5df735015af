use crate::{
    bot::readiness::ReadySignal,
    cache::SettingsStore,
    error::AppError,
    extension::ExtensionRegistry,
    model::settings::SettingsKind,
    service::hydration::{run_startup, SettingsHydrationService},
};
use serde_json::json;
use test_utils::{builder::TestBuilder, factory};

mod hydrate;
mod run_startup;

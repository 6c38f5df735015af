use crate::{
    data::settings::SettingsRepository,
    error::AppError,
    model::settings::{SettingsKind, SENTINEL_ID},
};
use serde_json::json;
use test_utils::{builder::TestBuilder, factory};

mod ensure_default;
mod find_default;
mod get_all;
mod insert_default;

//! Configuration for swipenav
//!
//! Supports:
//! - `config.toml` - gesture thresholds, display metrics, dispatcher commands
//! - `SWIPENAV_SWIPE_START_THRESHOLD` - system-level edge threshold override

pub mod settings;
pub mod types;

pub use settings::{
    apply_env_overrides, default_config_path, init_config_file, load_settings,
    try_load_settings, SWIPE_START_THRESHOLD_ENV,
};
pub use types::*;

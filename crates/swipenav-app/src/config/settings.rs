//! Settings parser for config.toml

use super::types::Settings;
use std::path::{Path, PathBuf};
use swipenav_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "swipenav";

/// Environment variable standing in for the system-level edge threshold
/// property. When it parses as an integer it overrides
/// `gesture.edge_threshold_px`.
pub const SWIPE_START_THRESHOLD_ENV: &str = "SWIPENAV_SWIPE_START_THRESHOLD";

/// Default config location: `$XDG_CONFIG_HOME/swipenav/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Load settings from `config_path`, falling back to defaults
///
/// A missing file is normal (debug log). An unreadable or unparsable file is
/// reported with a warning and also yields defaults; startup never fails on
/// configuration.
pub fn load_settings(config_path: &Path) -> Settings {
    let mut settings = if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        Settings::default()
    } else {
        match try_read(config_path) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to load {:?}: {}", config_path, e);
                Settings::default()
            }
        }
    };

    apply_env_overrides(&mut settings);
    settings
}

/// Load settings strictly, for reloads that must keep the previous config
/// when the file is broken.
pub fn try_load_settings(config_path: &Path) -> Result<Settings> {
    if !config_path.exists() {
        return Err(Error::ConfigNotFound {
            path: config_path.to_path_buf(),
        });
    }

    let mut settings = try_read(config_path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

fn try_read(config_path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(config_path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply process-level overrides on top of file settings
pub fn apply_env_overrides(settings: &mut Settings) {
    let Ok(raw) = std::env::var(SWIPE_START_THRESHOLD_ENV) else {
        return;
    };

    match raw.trim().parse::<i32>() {
        Ok(threshold) => {
            debug!(
                "{} overrides edge threshold: {} -> {}",
                SWIPE_START_THRESHOLD_ENV, settings.gesture.edge_threshold_px, threshold
            );
            settings.gesture.edge_threshold_px = threshold;
        }
        Err(_) => {
            warn!(
                "Ignoring {}={:?}: not an integer",
                SWIPE_START_THRESHOLD_ENV, raw
            );
        }
    }
}

/// Write a commented default config if none exists yet
pub fn init_config_file(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::config(format!("Failed to create config dir: {}", e)))?;
    }

    let default_content = r#"# swipenav configuration

[gesture]
edge_threshold_px = 20        # trigger strip width along the active edge
swipe_min_length_dp = 40      # scaled by display density
# swipe_min_length_px = 100   # uncomment to set the length in pixels directly
move_tolerance_px = 10        # movement between samples still counted as holding
trigger_timeout_ms = 300      # hold time for long-press and recents switch
haptic_duration_ms = 50       # 0 disables haptic feedback
long_press_action = "home"    # "home" or "last_app"

[display]
width = 1080
height = 2160
rotation = 0                  # quarter turns, 0-3
density = 2.625

[commands]
# Shell templates run by the command dispatcher. Unset entries are skipped.
# inject_key = "input keyevent {code}"
# toggle_recents = "input keyevent {code}"
# haptic = "cmd vibrator vibrate {duration_ms}"
"#;

    std::fs::write(config_path, default_content)
        .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;

    info!("Created default config at {:?}", config_path);
    Ok(())
}

//! Keyguard, display and configuration changes
//!
//! A new [`GestureConfig`] replaces the old one as a whole. Sessions keep the
//! snapshot they captured at Down, so thresholds never change mid-gesture.

use std::sync::Arc;

use swipenav_core::DisplayInfo;
use tracing::{debug, info, warn};

use super::{UpdateAction, UpdateResult};
use crate::config::{GestureConfig, Settings};
use crate::state::AppState;

pub fn handle_keyguard_changed(state: &mut AppState, showing: bool) -> UpdateResult {
    if state.keyguard_showing != showing {
        debug!("Keyguard showing: {}", showing);
    }
    state.keyguard_showing = showing;
    UpdateResult::none()
}

/// Recompute geometry (edge position, long/short sides) for a new display
pub fn handle_display_changed(state: &mut AppState, new_display: DisplayInfo) -> UpdateResult {
    match GestureConfig::resolve(&state.settings.gesture, &new_display) {
        Ok(config) => {
            if config.nav_bar_position != state.config.nav_bar_position {
                info!(
                    "Navigation bar moved: {:?} -> {:?}",
                    state.config.nav_bar_position, config.nav_bar_position
                );
            }
            state.display = new_display;
            state.config = Arc::new(config);
        }
        Err(e) => warn!("Ignoring display change {:?}: {}", new_display, e),
    }
    UpdateResult::none()
}

/// Apply reloaded settings against the current display
///
/// The file's `[display]` section seeds the display at startup only; live
/// display changes arrive as [`crate::message::Message::DisplayChanged`].
pub fn handle_config_reloaded(state: &mut AppState, settings: Settings) -> UpdateResult {
    match GestureConfig::resolve(&settings.gesture, &state.display) {
        Ok(config) => {
            info!(
                "Config reloaded: timeout={}ms min_swipe={}px tolerance={}px haptic={}ms",
                config.trigger_timeout_ms,
                config.min_swipe_length_px,
                config.move_tolerance_px,
                config.haptic_duration_ms
            );
            state.settings = settings;
            state.config = Arc::new(config);
        }
        Err(e) => warn!("Keeping previous config: {}", e),
    }
    UpdateResult::none()
}

pub fn handle_reload_request() -> UpdateResult {
    UpdateResult::action(UpdateAction::ReloadConfig)
}

//! Application state (Model in TEA pattern)

use std::sync::Arc;

use swipenav_core::DisplayInfo;

use crate::config::{GestureConfig, Settings};
use crate::session::{GesturePhase, GestureSession};

/// Complete recognizer state
#[derive(Debug)]
pub struct AppState {
    /// Current settings as loaded from disk
    pub settings: Settings,

    /// Current display metrics
    pub display: DisplayInfo,

    /// Resolved thresholds; replaced wholesale on reload
    pub config: Arc<GestureConfig>,

    /// The in-flight gesture, if any
    pub session: Option<GestureSession>,

    /// Last reported keyguard state
    pub keyguard_showing: bool,

    /// Set once Quit has been processed
    pub quitting: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            display: DisplayInfo::default(),
            config: Arc::new(GestureConfig::default()),
            session: None,
            keyguard_showing: false,
            quitting: false,
        }
    }

    /// Build state from loaded settings
    ///
    /// Invalid settings fall back to default thresholds; the caller is told
    /// through the log.
    pub fn with_settings(settings: Settings) -> Self {
        let display = settings.display;
        let config = match GestureConfig::resolve(&settings.gesture, &display) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Invalid gesture settings, using defaults: {}", e);
                GestureConfig::default()
            }
        };

        Self {
            settings,
            display,
            config: Arc::new(config),
            ..Self::new()
        }
    }

    /// Lock screen visible and not covered by an occluding activity
    pub fn is_keyguard_showing_and_not_occluded(&self) -> bool {
        self.keyguard_showing
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn phase(&self) -> GesturePhase {
        self.session
            .as_ref()
            .map(GestureSession::phase)
            .unwrap_or(GesturePhase::Idle)
    }

    pub fn should_quit(&self) -> bool {
        self.quitting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GestureSettings;

    #[test]
    fn test_new_state_is_idle() {
        let state = AppState::new();
        assert!(!state.has_session());
        assert_eq!(state.phase(), GesturePhase::Idle);
        assert!(!state.is_keyguard_showing_and_not_occluded());
        assert!(!state.should_quit());
    }

    #[test]
    fn test_with_settings_resolves_config() {
        let mut settings = Settings::default();
        settings.gesture.swipe_min_length_px = Some(100);
        settings.display.width = 1440;
        settings.display.height = 3120;

        let state = AppState::with_settings(settings);
        assert_eq!(state.config.min_swipe_length_px, 100);
        assert_eq!(state.config.screen_short_px, 1440);
        assert_eq!(state.display.height, 3120);
    }

    #[test]
    fn test_with_invalid_settings_falls_back() {
        let settings = Settings {
            gesture: GestureSettings {
                edge_threshold_px: -5,
                ..GestureSettings::default()
            },
            ..Settings::default()
        };

        let state = AppState::with_settings(settings);
        assert_eq!(state.config.edge_threshold_px, 20);
    }
}

//! Configuration types for swipenav
//!
//! Defines:
//! - `Settings` - the on-disk TOML document
//! - `GestureConfig` - the resolved, immutable thresholds the recognizer reads
//! - Related sub-types and enums

use std::time::Duration;

use serde::{Deserialize, Serialize};
use swipenav_core::prelude::*;
use swipenav_core::{
    candidate_for, is_in_edge_region, pixel_length, CandidateAction, DisplayInfo, NavBarPosition,
    Point,
};

/// Application settings (config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub gesture: GestureSettings,

    #[serde(default)]
    pub display: DisplayInfo,

    #[serde(default)]
    pub commands: CommandSettings,
}

/// What a stationary hold on the Home zone does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LongPressAction {
    /// Inject the candidate key (Home)
    #[default]
    Home,
    /// Switch to the previously used app
    LastApp,
}

/// Gesture thresholds ([gesture] section)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GestureSettings {
    /// Width of the trigger strip along the active edge
    #[serde(default = "default_edge_threshold")]
    pub edge_threshold_px: i32,

    /// Minimum swipe length in density-independent units
    #[serde(default = "default_swipe_min_length_dp")]
    pub swipe_min_length_dp: i32,

    /// Minimum swipe length in pixels; overrides the dp value when set
    #[serde(default)]
    pub swipe_min_length_px: Option<i32>,

    /// Max movement between samples still treated as stationary
    #[serde(default = "default_move_tolerance")]
    pub move_tolerance_px: i32,

    /// Hold time before long-press / recents-switch fire
    #[serde(default = "default_trigger_timeout")]
    pub trigger_timeout_ms: u64,

    /// Vibration length; 0 disables haptics
    #[serde(default = "default_haptic_duration")]
    pub haptic_duration_ms: u32,

    #[serde(default)]
    pub long_press_action: LongPressAction,
}

fn default_edge_threshold() -> i32 {
    20
}

fn default_swipe_min_length_dp() -> i32 {
    40
}

fn default_move_tolerance() -> i32 {
    10
}

fn default_trigger_timeout() -> u64 {
    300
}

fn default_haptic_duration() -> u32 {
    50
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            edge_threshold_px: default_edge_threshold(),
            swipe_min_length_dp: default_swipe_min_length_dp(),
            swipe_min_length_px: None,
            move_tolerance_px: default_move_tolerance(),
            trigger_timeout_ms: default_trigger_timeout(),
            haptic_duration_ms: default_haptic_duration(),
            long_press_action: LongPressAction::default(),
        }
    }
}

/// Shell command templates for the command dispatcher ([commands] section)
///
/// `{code}` is replaced by the key code (`APP_SWITCH` for `toggle_recents`),
/// `{duration_ms}` by the haptic duration. Unset entries are skipped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CommandSettings {
    #[serde(default)]
    pub inject_key: Option<String>,
    #[serde(default)]
    pub toggle_recents: Option<String>,
    #[serde(default)]
    pub preload_recents: Option<String>,
    #[serde(default)]
    pub cancel_preload_recents: Option<String>,
    #[serde(default)]
    pub toggle_last_app: Option<String>,
    #[serde(default)]
    pub dismiss_input_method: Option<String>,
    #[serde(default)]
    pub haptic: Option<String>,
}

impl CommandSettings {
    pub fn is_empty(&self) -> bool {
        self == &CommandSettings::default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolved gesture configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Thresholds and geometry the state machine reads
///
/// Built from [`GestureSettings`] and [`DisplayInfo`]; never mutated. A new
/// value replaces the old one wholesale (shared as `Arc<GestureConfig>`).
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    pub edge_threshold_px: i32,
    pub min_swipe_length_px: i32,
    pub move_tolerance_px: i32,
    pub trigger_timeout_ms: u64,
    pub haptic_duration_ms: u32,
    pub screen_long_px: i32,
    pub screen_short_px: i32,
    pub nav_bar_position: NavBarPosition,
    pub long_press_action: LongPressAction,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::build(&GestureSettings::default(), &DisplayInfo::default())
    }
}

impl GestureConfig {
    /// Validate and resolve settings against the current display
    pub fn resolve(gesture: &GestureSettings, display: &DisplayInfo) -> Result<Self> {
        if display.width <= 0 || display.height <= 0 {
            return Err(Error::config_invalid(format!(
                "display size must be positive, got {}x{}",
                display.width, display.height
            )));
        }
        if display.density.is_nan() || display.density <= 0.0 {
            return Err(Error::config_invalid(format!(
                "display density must be positive, got {}",
                display.density
            )));
        }
        if gesture.edge_threshold_px < 0 {
            return Err(Error::config_invalid("edge_threshold_px must not be negative"));
        }
        if gesture.move_tolerance_px < 0 {
            return Err(Error::config_invalid("move_tolerance_px must not be negative"));
        }
        if gesture.swipe_min_length_dp < 0 || gesture.swipe_min_length_px.is_some_and(|px| px < 0)
        {
            return Err(Error::config_invalid("swipe min length must not be negative"));
        }

        Ok(Self::build(gesture, display))
    }

    fn build(gesture: &GestureSettings, display: &DisplayInfo) -> Self {
        let min_swipe_length_px = gesture
            .swipe_min_length_px
            .unwrap_or_else(|| pixel_length(gesture.swipe_min_length_dp, display.density));

        Self {
            edge_threshold_px: gesture.edge_threshold_px,
            min_swipe_length_px,
            move_tolerance_px: gesture.move_tolerance_px,
            trigger_timeout_ms: gesture.trigger_timeout_ms,
            haptic_duration_ms: gesture.haptic_duration_ms,
            screen_long_px: display.screen_long(),
            screen_short_px: display.screen_short(),
            nav_bar_position: display.nav_bar_position(),
            long_press_action: gesture.long_press_action,
        }
    }

    pub fn trigger_timeout(&self) -> Duration {
        Duration::from_millis(self.trigger_timeout_ms)
    }

    /// Whether the point falls inside the trigger strip of the active edge
    pub fn is_gesture_button_region(&self, x: f32, y: f32) -> bool {
        is_in_edge_region(
            self.nav_bar_position,
            x,
            y,
            self.screen_long_px,
            self.edge_threshold_px,
        )
    }

    pub fn candidate_for(&self, point: Point) -> CandidateAction {
        candidate_for(self.nav_bar_position, point, self.screen_short_px)
    }

    /// Coordinate on the swipe axis (Y for a bottom bar, X for side bars)
    pub fn primary_axis(&self, point: Point) -> f32 {
        self.nav_bar_position.primary(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipenav_core::Rotation;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.gesture.edge_threshold_px, 20);
        assert_eq!(settings.gesture.trigger_timeout_ms, 300);
        assert_eq!(settings.gesture.haptic_duration_ms, 50);
        assert_eq!(settings.gesture.long_press_action, LongPressAction::Home);
        assert!(settings.commands.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
[gesture]
move_tolerance_px = 6
long_press_action = "last_app"

[display]
rotation = 3
"#,
        )
        .unwrap();

        assert_eq!(settings.gesture.move_tolerance_px, 6);
        assert_eq!(settings.gesture.edge_threshold_px, 20);
        assert_eq!(settings.gesture.long_press_action, LongPressAction::LastApp);
        assert_eq!(settings.display.rotation, Rotation::Rotation270);
        assert_eq!(settings.display.width, 1080);
    }

    #[test]
    fn test_resolve_scales_swipe_length_by_density() {
        let display = DisplayInfo {
            density: 2.0,
            ..DisplayInfo::default()
        };
        let config = GestureConfig::resolve(&GestureSettings::default(), &display).unwrap();
        assert_eq!(config.min_swipe_length_px, 80);
    }

    #[test]
    fn test_resolve_px_override_wins() {
        let gesture = GestureSettings {
            swipe_min_length_px: Some(100),
            ..GestureSettings::default()
        };
        let config = GestureConfig::resolve(&gesture, &DisplayInfo::default()).unwrap();
        assert_eq!(config.min_swipe_length_px, 100);
    }

    #[test]
    fn test_resolve_landscape_geometry() {
        let display = DisplayInfo {
            width: 2160,
            height: 1080,
            rotation: Rotation::Rotation270,
            density: 3.0,
        };
        let config = GestureConfig::resolve(&GestureSettings::default(), &display).unwrap();
        assert_eq!(config.nav_bar_position, NavBarPosition::Left);
        assert_eq!(config.screen_long_px, 2160);
        assert_eq!(config.screen_short_px, 1080);
        assert!(config.is_gesture_button_region(5.0, 400.0));
        assert!(!config.is_gesture_button_region(2155.0, 400.0));
    }

    #[test]
    fn test_resolve_accepts_huge_display() {
        let display = DisplayInfo {
            width: i32::MAX,
            height: i32::MAX,
            ..DisplayInfo::default()
        };
        let config = GestureConfig::resolve(&GestureSettings::default(), &display).unwrap();
        let middle = Point::new(i32::MAX as f32 / 2.0, i32::MAX as f32);
        assert_eq!(config.candidate_for(middle), CandidateAction::Home);
    }

    #[test]
    fn test_resolve_rejects_bad_display() {
        let display = DisplayInfo {
            width: 0,
            ..DisplayInfo::default()
        };
        let err = GestureConfig::resolve(&GestureSettings::default(), &display).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));

        let display = DisplayInfo {
            density: 0.0,
            ..DisplayInfo::default()
        };
        assert!(GestureConfig::resolve(&GestureSettings::default(), &display).is_err());
    }

    #[test]
    fn test_resolve_rejects_negative_thresholds() {
        let gesture = GestureSettings {
            move_tolerance_px: -1,
            ..GestureSettings::default()
        };
        assert!(GestureConfig::resolve(&gesture, &DisplayInfo::default()).is_err());
    }

    #[test]
    fn test_default_config_matches_default_settings() {
        let config = GestureConfig::default();
        assert_eq!(config.edge_threshold_px, 20);
        assert_eq!(config.min_swipe_length_px, 105);
        assert_eq!(config.nav_bar_position, NavBarPosition::Bottom);
        assert_eq!(config.trigger_timeout(), Duration::from_millis(300));
    }
}

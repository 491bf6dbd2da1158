//! Pointer events consumed by the recognizer
//!
//! Events arrive from the host input pipeline (or a replay script) already
//! reduced to a single pointer. Multi-finger streams are not modelled.

use serde::{Deserialize, Serialize};

/// Masked pointer action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerAction {
    Down,
    Move,
    Up,
    Cancel,
}

impl PointerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointerAction::Down => "down",
            PointerAction::Move => "move",
            PointerAction::Up => "up",
            PointerAction::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for PointerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw pointer sample in screen coordinates
///
/// Coordinates are raw (display-absolute) pixels, matching what a global
/// pointer listener sees regardless of which window is focused.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub action: PointerAction,
    #[serde(alias = "x", default)]
    pub raw_x: f32,
    #[serde(alias = "y", default)]
    pub raw_y: f32,
    /// Event time in milliseconds on the host's monotonic clock
    #[serde(alias = "t_ms", default)]
    pub event_time_ms: u64,
    #[serde(default)]
    pub device_id: i32,
}

impl PointerEvent {
    pub fn new(action: PointerAction, raw_x: f32, raw_y: f32, event_time_ms: u64) -> Self {
        Self {
            action,
            raw_x,
            raw_y,
            event_time_ms,
            device_id: 0,
        }
    }

    pub fn down(x: f32, y: f32, t_ms: u64) -> Self {
        Self::new(PointerAction::Down, x, y, t_ms)
    }

    pub fn moved(x: f32, y: f32, t_ms: u64) -> Self {
        Self::new(PointerAction::Move, x, y, t_ms)
    }

    pub fn up(x: f32, y: f32, t_ms: u64) -> Self {
        Self::new(PointerAction::Up, x, y, t_ms)
    }

    pub fn cancel(t_ms: u64) -> Self {
        Self::new(PointerAction::Cancel, 0.0, 0.0, t_ms)
    }

    pub fn with_device(mut self, device_id: i32) -> Self {
        self.device_id = device_id;
        self
    }

    pub fn point(&self) -> crate::types::Point {
        crate::types::Point::new(self.raw_x, self.raw_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pointer_event_json_short_names() {
        let json = r#"{"action":"down","x":540.0,"y":2155.0,"t_ms":12}"#;
        let event: PointerEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.action, PointerAction::Down);
        assert_eq!(event.raw_x, 540.0);
        assert_eq!(event.raw_y, 2155.0);
        assert_eq!(event.event_time_ms, 12);
        assert_eq!(event.device_id, 0);
    }

    #[test]
    fn test_parse_pointer_event_json_full_names() {
        let json =
            r#"{"action":"cancel","raw_x":1.5,"raw_y":2.5,"event_time_ms":99,"device_id":7}"#;
        let event: PointerEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.action, PointerAction::Cancel);
        assert_eq!(event.device_id, 7);
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let json = r#"{"action":"pinch","x":0,"y":0}"#;
        assert!(serde_json::from_str::<PointerEvent>(json).is_err());
    }

    #[test]
    fn test_action_display() {
        assert_eq!(PointerAction::Move.to_string(), "move");
        assert_eq!(PointerAction::Up.as_str(), "up");
    }
}

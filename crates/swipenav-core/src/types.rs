//! Domain types shared by the recognizer and its collaborators

use serde::{Deserialize, Serialize};

/// A point in raw screen pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Platform key code injected as a virtual key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub i32);

impl KeyCode {
    pub const HOME: KeyCode = KeyCode(3);
    pub const BACK: KeyCode = KeyCode(4);
    pub const APP_SWITCH: KeyCode = KeyCode(187);

    pub fn code(&self) -> i32 {
        self.0
    }

    pub fn name(&self) -> &'static str {
        match *self {
            KeyCode::HOME => "HOME",
            KeyCode::BACK => "BACK",
            KeyCode::APP_SWITCH => "APP_SWITCH",
            _ => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for KeyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name(), self.0)
    }
}

/// The navigation action a gesture session is tied to
///
/// Decided once from the Down position along the edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateAction {
    #[default]
    None,
    Back,
    Home,
}

impl CandidateAction {
    /// Key code injected when this candidate completes
    pub fn key_code(&self) -> Option<KeyCode> {
        match self {
            CandidateAction::None => None,
            CandidateAction::Back => Some(KeyCode::BACK),
            CandidateAction::Home => Some(KeyCode::HOME),
        }
    }

    pub fn is_home(&self) -> bool {
        matches!(self, CandidateAction::Home)
    }
}

/// Requests sent to the action dispatcher
///
/// Haptic pulses travel separately since they are delayed and never ordered
/// against these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum NavCommand {
    InjectKey { code: KeyCode },
    ToggleRecents,
    PreloadRecents,
    CancelPreloadRecents,
    ToggleLastApp,
    DismissInputMethod,
}

impl NavCommand {
    pub fn inject(code: KeyCode) -> Self {
        NavCommand::InjectKey { code }
    }

    /// Short label for logging
    pub fn label(&self) -> &'static str {
        match self {
            NavCommand::InjectKey { .. } => "inject_key",
            NavCommand::ToggleRecents => "toggle_recents",
            NavCommand::PreloadRecents => "preload_recents",
            NavCommand::CancelPreloadRecents => "cancel_preload_recents",
            NavCommand::ToggleLastApp => "toggle_last_app",
            NavCommand::DismissInputMethod => "dismiss_input_method",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_key_codes() {
        assert_eq!(CandidateAction::Back.key_code(), Some(KeyCode::BACK));
        assert_eq!(CandidateAction::Home.key_code(), Some(KeyCode::HOME));
        assert_eq!(CandidateAction::None.key_code(), None);
    }

    #[test]
    fn test_key_code_display() {
        assert_eq!(KeyCode::HOME.to_string(), "HOME(3)");
        assert_eq!(KeyCode(42).name(), "UNKNOWN");
    }

    #[test]
    fn test_nav_command_serializes_with_tag() {
        let json = serde_json::to_string(&NavCommand::inject(KeyCode::BACK)).unwrap();
        assert_eq!(json, r#"{"command":"inject_key","code":4}"#);

        let json = serde_json::to_string(&NavCommand::ToggleRecents).unwrap();
        assert_eq!(json, r#"{"command":"toggle_recents"}"#);
    }
}

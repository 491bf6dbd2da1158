//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner turns them into NDJSON.

use swipenav_core::{CandidateAction, NavBarPosition, NavCommand};

use crate::session::SessionId;

/// Domain events emitted by the Engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Gesture Lifecycle
    // ─────────────────────────────────────────────────────────
    /// A Down landed in the edge strip and opened a session
    GestureStarted {
        gesture_id: SessionId,
        candidate: CandidateAction,
        x: f32,
        y: f32,
    },

    /// The session closed on Up or Cancel
    GestureEnded { gesture_id: SessionId, fired: bool },

    // ─────────────────────────────────────────────────────────
    // Effects
    // ─────────────────────────────────────────────────────────
    /// A command was queued for the dispatcher
    CommandDispatched { command: NavCommand },

    /// A haptic pulse was requested
    HapticRequested { duration_ms: u32 },

    // ─────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────
    /// New thresholds or geometry are in effect
    ConfigReloaded {
        nav_bar_position: NavBarPosition,
        edge_threshold_px: i32,
        min_swipe_length_px: i32,
        trigger_timeout_ms: u64,
    },

    // ─────────────────────────────────────────────────────────
    // Engine Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::GestureStarted { .. } => "gesture_started",
            Self::GestureEnded { .. } => "gesture_ended",
            Self::CommandDispatched { .. } => "command_dispatched",
            Self::HapticRequested { .. } => "haptic_requested",
            Self::ConfigReloaded { .. } => "config_reloaded",
            Self::Shutdown => "shutdown",
        }
    }

    /// True for commands that complete a gesture (key, recents, last app)
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::CommandDispatched {
                command: NavCommand::InjectKey { .. }
                    | NavCommand::ToggleRecents
                    | NavCommand::ToggleLastApp
            }
        )
    }
}

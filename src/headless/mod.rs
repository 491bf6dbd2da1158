//! Headless mode - NDJSON event output
//!
//! The recognizer has no UI; every engine event is written to stdout as one
//! JSON object per line so runs can be inspected or asserted on by scripts.
//!
//! # Example Output
//!
//! ```json
//! {"event":"gesture_started","gesture_id":1,"candidate":"home","x":540.0,"y":2155.0,"timestamp":1704700001000}
//! {"event":"haptic","duration_ms":50,"timestamp":1704700001300}
//! {"event":"command","command":"dismiss_input_method","timestamp":1704700001300}
//! {"event":"command","command":"inject_key","code":3,"timestamp":1704700001300}
//! ```

pub mod runner;
pub mod script;

use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};
use swipenav_app::EngineEvent;
use swipenav_core::{CandidateAction, Error, NavBarPosition, NavCommand};
use tracing::error;

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// A gesture session opened
    GestureStarted {
        gesture_id: u64,
        candidate: CandidateAction,
        x: f32,
        y: f32,
        timestamp: i64,
    },

    /// A gesture session closed
    GestureEnded {
        gesture_id: u64,
        fired: bool,
        timestamp: i64,
    },

    /// A command was sent to the dispatcher
    Command {
        command: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<i32>,
        timestamp: i64,
    },

    /// A haptic pulse was requested
    Haptic { duration_ms: u32, timestamp: i64 },

    /// New thresholds are in effect
    ConfigReloaded {
        nav_bar_position: NavBarPosition,
        edge_threshold_px: i32,
        min_swipe_length_px: i32,
        trigger_timeout_ms: u64,
        timestamp: i64,
    },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },

    /// Engine stopped
    Shutdown { timestamp: i64 },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        // Write to stdout with newline (NDJSON format)
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn command(command: NavCommand) -> Self {
        let code = match command {
            NavCommand::InjectKey { code } => Some(code.code()),
            _ => None,
        };
        Self::Command {
            command: command.label(),
            code,
            timestamp: Self::now(),
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }

    /// Report a runner error, flagged fatal when the run cannot continue
    pub fn from_error(err: &Error) -> Self {
        Self::error(err.to_string(), err.is_fatal())
    }
}

impl From<&EngineEvent> for HeadlessEvent {
    fn from(event: &EngineEvent) -> Self {
        let timestamp = Self::now();
        match *event {
            EngineEvent::GestureStarted {
                gesture_id,
                candidate,
                x,
                y,
            } => Self::GestureStarted {
                gesture_id,
                candidate,
                x,
                y,
                timestamp,
            },
            EngineEvent::GestureEnded { gesture_id, fired } => Self::GestureEnded {
                gesture_id,
                fired,
                timestamp,
            },
            EngineEvent::CommandDispatched { command } => Self::command(command),
            EngineEvent::HapticRequested { duration_ms } => Self::Haptic {
                duration_ms,
                timestamp,
            },
            EngineEvent::ConfigReloaded {
                nav_bar_position,
                edge_threshold_px,
                min_swipe_length_px,
                trigger_timeout_ms,
            } => Self::ConfigReloaded {
                nav_bar_position,
                edge_threshold_px,
                min_swipe_length_px,
                trigger_timeout_ms,
                timestamp,
            },
            EngineEvent::Shutdown => Self::Shutdown { timestamp },
        }
    }
}

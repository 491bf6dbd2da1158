//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `pointer`: Down/Move/Up/Cancel transitions of the gesture state machine
//! - `timers`: Long-press and recents-switch fires
//! - `environment`: Keyguard, display and config changes

pub(crate) mod environment;
pub(crate) mod pointer;
pub(crate) mod timers;
pub(crate) mod update;


use std::time::Duration;

use swipenav_core::NavCommand;

use crate::timer::TimerId;

// Re-export main entry point
pub use update::update;

/// Effects the event loop should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Schedule a timer, replacing any pending instance with the same id
    ScheduleTimer { timer: TimerId, delay: Duration },

    /// Cancel a timer (no-op if not pending)
    CancelTimer(TimerId),

    /// Forward a command to the action dispatcher, in order
    Dispatch(NavCommand),

    /// Fire-and-forget haptic pulse, delivered shortly after
    Haptic { duration_ms: u32 },

    /// Re-read the config file
    ReloadConfig,
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Actions for the event loop, executed in order
    pub actions: Vec<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            actions: vec![action],
        }
    }

    pub fn push(&mut self, action: UpdateAction) {
        self.actions.push(action);
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Dispatcher commands in order, skipping timer and haptic actions
    pub fn commands(&self) -> Vec<NavCommand> {
        self.actions
            .iter()
            .filter_map(|action| match action {
                UpdateAction::Dispatch(command) => Some(*command),
                _ => None,
            })
            .collect()
    }
}

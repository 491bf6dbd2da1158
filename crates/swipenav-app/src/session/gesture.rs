//! GestureSession - one pointer stream from a qualifying Down to Up/Cancel

use std::sync::Arc;

use swipenav_core::{CandidateAction, PointerEvent, Point};

use super::{next_session_id, SessionId};
use crate::config::GestureConfig;

/// Observable recognizer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// No gesture in flight
    Idle,
    /// Down accepted inside the edge strip, nothing decided yet
    Armed,
    /// Home hold detected, long-press timer running
    LongPressPending,
    /// Moved past the minimum swipe length
    SwipeTracking,
    /// Swipe paused, recents-switch timer running or fired
    RecentsArmed,
}

impl GesturePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GesturePhase::Idle => "idle",
            GesturePhase::Armed => "armed",
            GesturePhase::LongPressPending => "long_press_pending",
            GesturePhase::SwipeTracking => "swipe_tracking",
            GesturePhase::RecentsArmed => "recents_armed",
        }
    }
}

/// Mutable record of one in-flight gesture
///
/// Exists only between a qualifying Down and the matching Up/Cancel. The
/// candidate and the config snapshot are fixed at creation; `action_fired`
/// only ever flips from false to true.
#[derive(Debug, Clone)]
pub struct GestureSession {
    pub id: SessionId,
    pub start_point: Point,
    pub start_time_ms: u64,
    pub last_point: Point,
    pub device_id: i32,

    /// A real swipe (past the minimum length) has been seen
    pub long_press_eligible: bool,
    /// Recents preloaded and the switch timer scheduled
    pub recents_armed: bool,
    /// Long-press timer is scheduled
    pub long_press_pending: bool,

    candidate: CandidateAction,
    action_fired: bool,
    input_method_dismissed: bool,
    config: Arc<GestureConfig>,
}

impl GestureSession {
    /// Start a session from a Down event
    pub fn start(event: &PointerEvent, candidate: CandidateAction, config: Arc<GestureConfig>) -> Self {
        let point = event.point();
        Self {
            id: next_session_id(),
            start_point: point,
            start_time_ms: event.event_time_ms,
            last_point: point,
            device_id: event.device_id,
            long_press_eligible: false,
            recents_armed: false,
            long_press_pending: false,
            candidate,
            action_fired: false,
            input_method_dismissed: false,
            config,
        }
    }

    pub fn candidate(&self) -> CandidateAction {
        self.candidate
    }

    /// Thresholds captured at Down
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn action_fired(&self) -> bool {
        self.action_fired
    }

    /// Claim the session's single action
    ///
    /// Returns false if an action was already dispatched.
    pub fn try_fire(&mut self) -> bool {
        if self.action_fired {
            return false;
        }
        self.action_fired = true;
        true
    }

    /// Returns true the first time input-method dismissal is requested
    pub fn take_input_method_dismissal(&mut self) -> bool {
        !std::mem::replace(&mut self.input_method_dismissed, true)
    }

    /// Distance along the swipe axis from the Down point
    pub fn distance_since_down(&self, point: Point) -> f32 {
        let axis = |p| self.config.primary_axis(p);
        (axis(self.start_point) - axis(point)).abs()
    }

    /// Distance along the swipe axis from the previous sample
    pub fn distance_since_last(&self, point: Point) -> f32 {
        let axis = |p| self.config.primary_axis(p);
        (axis(self.last_point) - axis(point)).abs()
    }

    pub fn elapsed_ms(&self, event_time_ms: u64) -> u64 {
        event_time_ms.saturating_sub(self.start_time_ms)
    }

    pub fn phase(&self) -> GesturePhase {
        if self.recents_armed {
            GesturePhase::RecentsArmed
        } else if self.long_press_eligible {
            GesturePhase::SwipeTracking
        } else if self.long_press_pending {
            GesturePhase::LongPressPending
        } else {
            GesturePhase::Armed
        }
    }
}

//! Pointer event handlers - the edge-swipe state machine
//!
//! Down opens a session inside the edge strip, Move decides between
//! long-press and swipe-to-recents, Up completes a plain swipe, Cancel
//! abandons everything.

use std::sync::Arc;

use swipenav_core::{NavCommand, PointerEvent};
use tracing::{debug, info, trace};

use super::{UpdateAction, UpdateResult};
use crate::session::GestureSession;
use crate::state::AppState;
use crate::timer::TimerId;

/// Down: open a session if the pointer lands in the edge strip
///
/// A session still open at Down lost its Up; it is dropped with its timers
/// before the new Down is evaluated.
pub fn handle_down(state: &mut AppState, event: &PointerEvent) -> UpdateResult {
    let mut result = UpdateResult::none();

    if let Some(stale) = state.session.take() {
        debug!(
            "Gesture {} dropped: new Down while {}",
            stale.id,
            stale.phase().as_str()
        );
        result.push(UpdateAction::CancelTimer(TimerId::RecentsSwitch));
        result.push(UpdateAction::CancelTimer(TimerId::LongPress));
    }

    if state.is_keyguard_showing_and_not_occluded() {
        debug!("Down ignored: keyguard showing");
        return result;
    }

    let config = Arc::clone(&state.config);
    if !config.is_gesture_button_region(event.raw_x, event.raw_y) {
        trace!(
            "Down at ({}, {}) outside {:?} edge strip",
            event.raw_x,
            event.raw_y,
            config.nav_bar_position
        );
        return result;
    }

    let candidate = config.candidate_for(event.point());
    let session = GestureSession::start(event, candidate, config);
    debug!(
        "Gesture {} armed: {:?} at ({}, {}) device {}",
        session.id, candidate, event.raw_x, event.raw_y, event.device_id
    );
    state.session = Some(session);

    result
}

/// Move: long-press detection for Home, swipe tracking, recents arming
pub fn handle_move(state: &mut AppState, event: &PointerEvent) -> UpdateResult {
    let keyguard_showing = state.is_keyguard_showing_and_not_occluded();
    let Some(session) = state.session.as_mut() else {
        trace!("Move without an active gesture ignored");
        return UpdateResult::none();
    };

    if session.action_fired() || session.recents_armed || keyguard_showing {
        return UpdateResult::none();
    }

    let point = event.point();
    let since_down = session.distance_since_down(point);
    let since_last = session.distance_since_last(point);
    let min_swipe = session.config().min_swipe_length_px as f32;
    let tolerance = session.config().move_tolerance_px as f32;
    let delay = session.config().trigger_timeout();
    let candidate = session.candidate();

    let mut result = UpdateResult::none();

    if candidate.is_home() && since_down < min_swipe {
        if since_last < tolerance {
            trace!(
                "Gesture {}: holding (moved {} since last)",
                session.id,
                since_last
            );
            session.long_press_pending = true;
            result.push(UpdateAction::ScheduleTimer {
                timer: TimerId::LongPress,
                delay,
            });
        } else if session.long_press_pending {
            session.long_press_pending = false;
            result.push(UpdateAction::CancelTimer(TimerId::LongPress));
        }
    }

    if since_down > min_swipe {
        if session.long_press_pending {
            session.long_press_pending = false;
            result.push(UpdateAction::CancelTimer(TimerId::LongPress));
        }
        if !session.long_press_eligible {
            debug!(
                "Gesture {}: swipe past {}px after {}ms",
                session.id,
                min_swipe,
                session.elapsed_ms(event.event_time_ms)
            );
        }
        session.long_press_eligible = true;

        // Back only fires once the finger lifts
        if candidate.is_home() && !session.recents_armed && since_last < tolerance {
            debug!("Gesture {}: swipe paused, arming recents", session.id);
            session.recents_armed = true;
            result.push(UpdateAction::Dispatch(NavCommand::PreloadRecents));
            result.push(UpdateAction::ScheduleTimer {
                timer: TimerId::RecentsSwitch,
                delay,
            });
        }
    }

    session.last_point = point;
    result
}

/// Up: complete a swipe that no timer claimed, then close the session
pub fn handle_up(state: &mut AppState, event: &PointerEvent) -> UpdateResult {
    let keyguard_showing = state.is_keyguard_showing_and_not_occluded();
    let Some(mut session) = state.session.take() else {
        trace!("Up without an active gesture ignored");
        return UpdateResult::none();
    };

    let mut result = UpdateResult::none();
    result.push(UpdateAction::CancelTimer(TimerId::RecentsSwitch));
    result.push(UpdateAction::CancelTimer(TimerId::LongPress));
    if session.recents_armed && !session.action_fired() {
        result.push(UpdateAction::Dispatch(NavCommand::CancelPreloadRecents));
    }

    if keyguard_showing {
        debug!("Gesture {} ended under keyguard, nothing fired", session.id);
        return result;
    }

    if session.long_press_eligible && session.try_fire() {
        info!(
            "Gesture {}: swipe completed -> {:?} ({}ms)",
            session.id,
            session.candidate(),
            session.elapsed_ms(event.event_time_ms)
        );
        push_haptic(&mut result, &session);
        push_candidate_key(&mut result, &mut session);
    } else {
        debug!(
            "Gesture {} ended in {} (fired: {})",
            session.id,
            session.phase().as_str(),
            session.action_fired()
        );
    }

    result
}

/// Cancel: drop the session and its timers without dispatching anything
pub fn handle_cancel(state: &mut AppState) -> UpdateResult {
    let Some(session) = state.session.take() else {
        return UpdateResult::none();
    };

    debug!(
        "Gesture {} cancelled in {}",
        session.id,
        session.phase().as_str()
    );

    let mut result = UpdateResult::none();
    result.push(UpdateAction::CancelTimer(TimerId::RecentsSwitch));
    result.push(UpdateAction::CancelTimer(TimerId::LongPress));
    result
}

// ─────────────────────────────────────────────────────────────────
// Shared firing helpers
// ─────────────────────────────────────────────────────────────────

/// Inject the candidate key, dismissing the input method first for Home
pub(super) fn push_candidate_key(result: &mut UpdateResult, session: &mut GestureSession) {
    let candidate = session.candidate();
    let Some(code) = candidate.key_code() else {
        return;
    };

    if candidate.is_home() && session.take_input_method_dismissal() {
        result.push(UpdateAction::Dispatch(NavCommand::DismissInputMethod));
    }
    result.push(UpdateAction::Dispatch(NavCommand::inject(code)));
}

/// Queue a haptic pulse unless haptics are disabled
pub(super) fn push_haptic(result: &mut UpdateResult, session: &GestureSession) {
    let duration_ms = session.config().haptic_duration_ms;
    if duration_ms > 0 {
        result.push(UpdateAction::Haptic { duration_ms });
    }
}

//! Timer fire handlers

use swipenav_core::NavCommand;
use tracing::{debug, info};

use super::pointer::{push_candidate_key, push_haptic};
use super::{UpdateAction, UpdateResult};
use crate::config::LongPressAction;
use crate::state::AppState;
use crate::timer::TimerId;

/// A timer scheduled by the state machine expired
///
/// Fires that no longer match the session (already fired, recents not
/// armed, long-press cancelled) are ignored.
pub fn handle_timer_fired(state: &mut AppState, timer: TimerId) -> UpdateResult {
    let keyguard_showing = state.is_keyguard_showing_and_not_occluded();
    let Some(session) = state.session.as_mut() else {
        debug!("{} fired with no active gesture", timer.as_str());
        return UpdateResult::none();
    };

    let mut result = UpdateResult::none();

    match timer {
        TimerId::LongPress => {
            if !session.long_press_pending {
                debug!("Gesture {}: long-press no longer pending", session.id);
                return result;
            }
            session.long_press_pending = false;

            if keyguard_showing || !session.try_fire() {
                return result;
            }

            info!("Gesture {}: long-press", session.id);
            push_haptic(&mut result, session);
            let long_press_action = session.config().long_press_action;
            match long_press_action {
                LongPressAction::Home => push_candidate_key(&mut result, session),
                LongPressAction::LastApp => {
                    result.push(UpdateAction::Dispatch(NavCommand::ToggleLastApp))
                }
            }
        }

        TimerId::RecentsSwitch => {
            if !session.recents_armed {
                debug!("Gesture {}: recents not armed", session.id);
                return result;
            }

            if keyguard_showing || !session.try_fire() {
                return result;
            }

            info!("Gesture {}: recents switch", session.id);
            push_haptic(&mut result, session);
            result.push(UpdateAction::Dispatch(NavCommand::ToggleRecents));
        }
    }

    result
}

//! Message processing
//!
//! Runs a message through the TEA update function and executes the resulting
//! actions in order. Timer fires are checked against the scheduler first so a
//! fire that raced a cancel or reschedule never reaches the state machine.

use crate::actions::{handle_action, ActionContext};
use crate::engine_event::EngineEvent;
use crate::handler;
use crate::message::Message;
use crate::services::ActionDispatcher;
use crate::state::AppState;

/// Process a message through the TEA update function
///
/// Returns the events produced by executed actions, in execution order.
pub fn process_message<D: ActionDispatcher + Sync + 'static>(
    state: &mut AppState,
    message: Message,
    ctx: &mut ActionContext<D>,
) -> Vec<EngineEvent> {
    if let Message::TimerFired { timer, generation } = &message {
        if !ctx.scheduler.acknowledge(*timer, *generation) {
            return Vec::new();
        }
    }

    let result = handler::update(state, message);

    result
        .actions
        .into_iter()
        .filter_map(|action| handle_action(action, ctx))
        .collect()
}

//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::AppState;
use swipenav_core::PointerAction;

use super::{environment, pointer, timers, UpdateResult};

/// Process a message and update state
///
/// Pure with respect to the outside world: every effect comes back as an
/// [`super::UpdateAction`].
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Pointer(event) => match event.action {
            PointerAction::Down => pointer::handle_down(state, &event),
            PointerAction::Move => pointer::handle_move(state, &event),
            PointerAction::Up => pointer::handle_up(state, &event),
            PointerAction::Cancel => pointer::handle_cancel(state),
        },

        Message::TimerFired { timer, .. } => timers::handle_timer_fired(state, timer),

        // ─────────────────────────────────────────────────────────
        // Environment Messages
        // ─────────────────────────────────────────────────────────
        Message::KeyguardChanged { showing } => {
            environment::handle_keyguard_changed(state, showing)
        }
        Message::DisplayChanged(display) => environment::handle_display_changed(state, display),
        Message::ConfigReloaded(settings) => environment::handle_config_reloaded(state, *settings),
        Message::ReloadConfig => environment::handle_reload_request(),

        Message::Quit => {
            state.quitting = true;
            UpdateResult::none()
        }
    }
}

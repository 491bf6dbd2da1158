//! Message types for the application (TEA pattern)

use swipenav_core::{DisplayInfo, PointerEvent};

use crate::config::Settings;
use crate::timer::TimerId;

/// All possible inputs to the recognizer
///
/// Pointer events, timer fires and configuration changes share one queue so
/// a single consumer processes them in arrival order.
#[derive(Debug, Clone)]
pub enum Message {
    /// Raw pointer sample from the input pipeline
    Pointer(PointerEvent),

    /// A scheduled timer expired
    TimerFired { timer: TimerId, generation: u64 },

    // ─────────────────────────────────────────────────────────
    // Environment Messages
    // ─────────────────────────────────────────────────────────
    /// Keyguard (lock screen) visibility changed
    KeyguardChanged { showing: bool },

    /// Display size, rotation or density changed
    DisplayChanged(DisplayInfo),

    /// Freshly loaded settings to apply
    ConfigReloaded(Box<Settings>),

    /// Config file changed on disk; the engine reloads it
    ReloadConfig,

    /// Stop the engine
    Quit,
}

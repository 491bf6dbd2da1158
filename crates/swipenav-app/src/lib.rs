//! swipenav-app - Gesture recognition and orchestration for swipenav
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! edge-swipe state machine, the Engine that owns the single event queue,
//! the timer scheduler, configuration loading, the action dispatcher
//! service trait, signal handling and config-file watching.

pub mod actions;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod message;
pub mod process;
pub mod services;
pub mod session;
pub mod signals;
pub mod state;
pub mod timer;
pub mod watcher;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use message::Message;
pub use services::{ActionDispatcher, CommandDispatcher, LogDispatcher};
pub use session::{GesturePhase, GestureSession, SessionId};
pub use state::AppState;
pub use timer::{TimerId, TimerScheduler};

//! State of the single in-flight gesture

mod gesture;

#[cfg(test)]
mod tests;

pub use gesture::{GesturePhase, GestureSession};

// SessionId and next_session_id live here in mod.rs
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a gesture session (for logs and engine events)
pub type SessionId = u64;

static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique session ID
pub fn next_session_id() -> SessionId {
    SESSION_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

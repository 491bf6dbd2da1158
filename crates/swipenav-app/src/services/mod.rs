//! Service layer - the outbound side of the recognizer
//!
//! The state machine never performs navigation itself. Commands leave the
//! engine through an [`ActionDispatcher`] implementation:
//! - [`LogDispatcher`]: log every command (default, no side effects)
//! - [`CommandDispatcher`]: run configured shell templates
//! - `RecordingDispatcher`: capture calls for assertions (tests only)

pub mod dispatcher;

pub use dispatcher::{
    deliver, ActionDispatcher, CommandDispatcher, LocalActionDispatcher, LogDispatcher,
};

#[cfg(any(test, feature = "test-helpers"))]
pub use dispatcher::test_utils::{Dispatched, RecordingDispatcher};

//! swipenav Library
//!
//! Headless runner for the edge-swipe navigation gesture recognizer.

pub mod headless;

// Re-export main entry points
pub use headless::runner::{run_headless, RunOptions};

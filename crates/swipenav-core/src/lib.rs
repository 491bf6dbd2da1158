//! # swipenav-core - Core Domain Types
//!
//! Foundation crate for swipenav. Provides pointer events, navigation
//! commands, display geometry and error handling.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, toml, tracing).
//!
//! ## Public API
//!
//! ### Events (`events`)
//! - [`PointerEvent`] - A raw single-pointer sample (Down/Move/Up/Cancel)
//! - [`PointerAction`] - Masked action of a pointer sample
//!
//! ### Domain Types (`types`)
//! - [`CandidateAction`] - Back/Home decided at gesture start
//! - [`NavCommand`] - Requests sent to the action dispatcher
//! - [`KeyCode`] - Platform key codes for virtual key injection
//!
//! ### Geometry (`geometry`)
//! - [`navigation_bar_position()`] - Edge the navigation bar sits on
//! - [`is_in_edge_region()`] - Edge-trigger strip test
//! - [`candidate_for()`] - Thirds split along the edge
//! - [`pixel_length()`] - dp to px conversion
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use swipenav_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod geometry;
pub mod logging;
pub mod prelude;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use events::{PointerAction, PointerEvent};
pub use geometry::{
    candidate_for, is_in_edge_region, navigation_bar_position, pixel_length, DisplayInfo,
    NavBarPosition, Rotation, DEFAULT_DENSITY,
};
pub use types::{CandidateAction, KeyCode, NavCommand, Point};

//! Display geometry: navigation bar placement, edge region and thirds split
//!
//! All functions are pure so the recognizer can be exercised without a
//! display. `screen_long` and `screen_short` are the long and short sides of
//! the physical display, independent of the current rotation.

use serde::{Deserialize, Serialize};

use crate::types::{CandidateAction, Point};

/// Display rotation in quarter turns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rotation {
    #[default]
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

impl TryFrom<u8> for Rotation {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rotation::Rotation0),
            1 => Ok(Rotation::Rotation90),
            2 => Ok(Rotation::Rotation180),
            3 => Ok(Rotation::Rotation270),
            other => Err(format!("rotation must be 0-3, got {}", other)),
        }
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> u8 {
        match rotation {
            Rotation::Rotation0 => 0,
            Rotation::Rotation90 => 1,
            Rotation::Rotation180 => 2,
            Rotation::Rotation270 => 3,
        }
    }
}

/// Screen edge the navigation bar (and thus the trigger strip) sits on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavBarPosition {
    #[default]
    Bottom,
    Right,
    Left,
}

impl NavBarPosition {
    /// Coordinate along the axis pointing into the edge
    ///
    /// Swipe distances are measured on this axis.
    pub fn primary(&self, point: Point) -> f32 {
        match self {
            NavBarPosition::Bottom => point.y,
            NavBarPosition::Right | NavBarPosition::Left => point.x,
        }
    }

    /// Coordinate along the edge itself, used for the thirds split
    pub fn perpendicular(&self, point: Point) -> f32 {
        match self {
            NavBarPosition::Bottom => point.x,
            NavBarPosition::Right | NavBarPosition::Left => point.y,
        }
    }
}

/// Current display metrics
///
/// Missing fields fall back to a 1080x2160 portrait panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayInfo {
    pub width: i32,
    pub height: i32,
    pub rotation: Rotation,
    pub density: f32,
}

/// Density used when the host does not report one
pub const DEFAULT_DENSITY: f32 = 2.625;

impl Default for DisplayInfo {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 2160,
            rotation: Rotation::Rotation0,
            density: DEFAULT_DENSITY,
        }
    }
}

impl DisplayInfo {
    pub fn screen_long(&self) -> i32 {
        self.width.max(self.height)
    }

    pub fn screen_short(&self) -> i32 {
        self.width.min(self.height)
    }

    pub fn nav_bar_position(&self) -> NavBarPosition {
        navigation_bar_position(self.width, self.height, self.rotation)
    }
}

/// Where the navigation bar sits for the given display size and rotation
///
/// Landscape puts it on the left edge for 270° and the right edge otherwise;
/// portrait always uses the bottom edge.
pub fn navigation_bar_position(
    display_width: i32,
    display_height: i32,
    rotation: Rotation,
) -> NavBarPosition {
    if display_width > display_height {
        if rotation == Rotation::Rotation270 {
            NavBarPosition::Left
        } else {
            NavBarPosition::Right
        }
    } else {
        NavBarPosition::Bottom
    }
}

/// Convert density-independent units to whole pixels
pub fn pixel_length(dp: i32, density: f32) -> i32 {
    (dp as f32 * density).round() as i32
}

/// Whether `(x, y)` lies inside the trigger strip along the active edge
pub fn is_in_edge_region(
    position: NavBarPosition,
    x: f32,
    y: f32,
    screen_long: i32,
    edge_threshold: i32,
) -> bool {
    let far_edge = (screen_long - edge_threshold) as f32;
    match position {
        NavBarPosition::Bottom => y >= far_edge,
        NavBarPosition::Right => x >= far_edge,
        NavBarPosition::Left => x <= edge_threshold as f32,
    }
}

/// Split the edge into thirds: outer thirds are Back, the middle is Home
pub fn candidate_for(position: NavBarPosition, point: Point, screen_short: i32) -> CandidateAction {
    let along = position.perpendicular(point);
    let short = i64::from(screen_short);
    let lower = (short / 3) as f32;
    let upper = ((short * 2) / 3) as f32;
    if along < lower || along > upper {
        CandidateAction::Back
    } else {
        CandidateAction::Home
    }
}

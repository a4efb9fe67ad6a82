//! Grid snapping for dragged geometry.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default grid spacing in network units.
pub const GRID_SIZE: f64 = 20.0;

/// Snap mode applied to dragged points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapMode {
    /// No snapping.
    #[default]
    None,
    /// Snap to grid intersections.
    Grid,
}

impl SnapMode {
    /// Check if grid snapping is enabled.
    pub fn snaps_to_grid(self) -> bool {
        matches!(self, SnapMode::Grid)
    }
}

/// Snap a point to the nearest grid intersection.
///
/// A non-positive grid size leaves the point untouched.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    if grid_size <= 0.0 {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

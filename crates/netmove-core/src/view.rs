//! View collaborator: grid snapping and cursor position.

use crate::config::MoveConfig;
use crate::snap::{SnapMode, snap_to_grid};
use kurbo::Point;

/// Queries the move engine makes against the view during a drag.
pub trait ViewContext {
    /// Snap a world point to the active grid. Must be idempotent.
    fn snap_to_active_grid(&self, point: Point) -> Point;

    /// Current pointer location in world coordinates.
    fn cursor_position(&self) -> Point;
}

/// Minimal view state: snap settings and the last known cursor position.
#[derive(Debug, Clone)]
pub struct GridView {
    pub snap_mode: SnapMode,
    pub grid_size: f64,
    cursor: Point,
}

impl Default for GridView {
    fn default() -> Self {
        Self::from_config(&MoveConfig::default())
    }
}

impl GridView {
    pub fn new(snap_mode: SnapMode, grid_size: f64) -> Self {
        Self {
            snap_mode,
            grid_size,
            cursor: Point::ZERO,
        }
    }

    pub fn from_config(config: &MoveConfig) -> Self {
        Self::new(config.snap_mode, config.grid_size)
    }

    /// Record the pointer position (world coordinates).
    pub fn set_cursor(&mut self, cursor: Point) {
        self.cursor = cursor;
    }
}

impl ViewContext for GridView {
    fn snap_to_active_grid(&self, point: Point) -> Point {
        if self.snap_mode.snaps_to_grid() {
            snap_to_grid(point, self.grid_size)
        } else {
            point
        }
    }

    fn cursor_position(&self) -> Point {
        self.cursor
    }
}

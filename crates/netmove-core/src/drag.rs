//! Drag tracking: turns pointer positions into move offsets.

use crate::movement::{MoveOffset, MoveOperation};
use kurbo::{Point, Vec2};

/// What a pointer drag changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    /// Pointer delta moves the element in the plane.
    #[default]
    Planar,
    /// Vertical pointer delta changes elevation.
    Elevation,
}

/// State of an active move drag.
#[derive(Debug, Clone)]
pub struct MoveDrag {
    /// The operation built at drag start.
    pub operation: MoveOperation,
    /// Starting point of the drag.
    pub start_point: Point,
    /// Current point of the drag.
    pub current_point: Point,
    pub mode: DragMode,
}

impl MoveDrag {
    /// Start a planar drag.
    pub fn new(operation: MoveOperation, start_point: Point) -> Self {
        Self {
            operation,
            start_point,
            current_point: start_point,
            mode: DragMode::Planar,
        }
    }

    pub fn with_mode(mut self, mode: DragMode) -> Self {
        self.mode = mode;
        self
    }

    /// Record a new pointer position.
    pub fn update(&mut self, point: Point) {
        self.current_point = point;
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Offset from drag start to the current point. Always the total, never an
    /// increment, so previews and the commit see the same value.
    pub fn offset(&self) -> MoveOffset {
        let delta = self.delta();
        match self.mode {
            DragMode::Planar => MoveOffset::from(delta),
            DragMode::Elevation => MoveOffset::elevation(-delta.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;
    use uuid::Uuid;

    fn drag() -> MoveDrag {
        let op = MoveOperation::single_position(Uuid::new_v4(), Position::new(0.0, 0.0));
        MoveDrag::new(op, Point::new(10.0, 10.0))
    }

    #[test]
    fn test_offset_is_total_delta() {
        let mut drag = drag();
        assert_eq!(drag.offset(), MoveOffset::default());
        drag.update(Point::new(12.0, 15.0));
        drag.update(Point::new(20.0, 5.0));
        assert_eq!(drag.offset(), MoveOffset::planar(10.0, -5.0));
    }

    #[test]
    fn test_elevation_mode() {
        let mut drag = drag().with_mode(DragMode::Elevation);
        drag.update(Point::new(30.0, 4.0));
        assert_eq!(drag.offset(), MoveOffset::elevation(6.0));
    }
}

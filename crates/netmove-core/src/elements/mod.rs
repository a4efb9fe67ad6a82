//! Movable network elements.

mod free_shape;
mod lane_marker;

pub use free_shape::FreeShape;
pub use lane_marker::LaneMarker;

use crate::movement::{MoveResult, MoveTarget};
use crate::undo::{ElementState, UndoList};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Enum wrapper for all element types.
#[derive(Debug, Clone)]
pub enum Element {
    Shape(FreeShape),
    LaneMarker(LaneMarker),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Shape(s) => s.id(),
            Element::LaneMarker(m) => m.id(),
        }
    }

    /// Snapshot of the state a move can change.
    pub fn state(&self) -> ElementState {
        match self {
            Element::Shape(s) => s.state(),
            Element::LaneMarker(m) => m.state(),
        }
    }

    /// Restore a snapshot taken with [`Element::state`].
    /// Returns false if the snapshot belongs to another kind of element.
    pub fn restore(&mut self, state: &ElementState) -> bool {
        match (self, state) {
            (Element::Shape(s), ElementState::Shape(points)) => {
                s.points = points.clone();
                true
            }
            (Element::LaneMarker(m), ElementState::OnLane { lane, positions }) => {
                m.restore(*lane, positions.clone());
                true
            }
            _ => false,
        }
    }
}

impl MoveTarget for Element {
    fn set_move_shape(&mut self, result: &MoveResult) {
        match self {
            Element::Shape(s) => s.set_move_shape(result),
            Element::LaneMarker(m) => m.set_move_shape(result),
        }
    }

    fn commit_move_shape(&mut self, result: &MoveResult, undo_list: &mut UndoList) {
        match self {
            Element::Shape(s) => s.commit_move_shape(result, undo_list),
            Element::LaneMarker(m) => m.commit_move_shape(result, undo_list),
        }
    }
}

impl From<FreeShape> for Element {
    fn from(shape: FreeShape) -> Self {
        Element::Shape(shape)
    }
}

impl From<LaneMarker> for Element {
    fn from(marker: LaneMarker) -> Self {
        Element::LaneMarker(marker)
    }
}

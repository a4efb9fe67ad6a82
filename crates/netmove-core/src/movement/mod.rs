//! Move operations: what is dragged, by how much, and what the drag produces.
//!
//! A [`MoveOperation`] is built once when a drag starts and never changes
//! afterwards. Each pointer update turns it plus a [`MoveOffset`] into a fresh
//! [`MoveResult`] through [`MoveEngine`], which pushes the result to the
//! element's [`MoveTarget`] implementation.

mod engine;

pub use engine::MoveEngine;

use crate::elements::ElementId;
use crate::geometry::{GeometryPoint, Position};
use crate::network::LaneId;
use crate::undo::UndoList;
use kurbo::Vec2;
use thiserror::Error;

/// Move errors. All of them mean the operation was built with bad data.
#[derive(Debug, Error, PartialEq)]
pub enum MoveError {
    #[error("Trying to move an invalid position (geometry point {index})")]
    InvalidGeometryPoint { index: usize },
    #[error("Geometry point {index} out of bounds for shape with {len} points")]
    GeometryIndexOutOfBounds { index: usize, len: usize },
    #[error("Unknown lane: {0}")]
    UnknownLane(LaneId),
    #[error("Move over lane requires at least one position")]
    EmptyLanePositions,
    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),
}

/// Capability every movable element implements.
pub trait MoveTarget {
    /// Show the computed shape without recording history.
    fn set_move_shape(&mut self, result: &MoveResult);

    /// Apply the final shape and record an undoable change.
    fn commit_move_shape(&mut self, result: &MoveResult, undo_list: &mut UndoList);
}

/// Description of a drag, fixed at drag start.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOperation {
    element: ElementId,
    original_shape: Vec<GeometryPoint>,
    original_geometry_points: Vec<usize>,
    shape_to_move: Vec<GeometryPoint>,
    geometry_points_to_move: Vec<usize>,
    lane: Option<LaneId>,
    original_positions_over_lane: Vec<f64>,
    allow_change_lane: bool,
}

impl MoveOperation {
    /// Move a single position (e.g. a junction or a point of interest).
    pub fn single_position(element: ElementId, position: Position) -> Self {
        Self::whole_shape(element, vec![GeometryPoint::Valid(position)])
    }

    /// Move an entire shape rigidly.
    pub fn whole_shape(element: ElementId, shape: Vec<GeometryPoint>) -> Self {
        Self {
            element,
            original_shape: shape.clone(),
            original_geometry_points: Vec::new(),
            shape_to_move: shape,
            geometry_points_to_move: Vec::new(),
            lane: None,
            original_positions_over_lane: Vec::new(),
            allow_change_lane: false,
        }
    }

    /// Move some points of a shape.
    ///
    /// `shape_to_move` may differ from `original_shape`, e.g. when the drag
    /// started by inserting a new point. `original_geometry_points` index into
    /// `original_shape`, `geometry_points_to_move` into `shape_to_move`.
    pub fn partial_shape(
        element: ElementId,
        original_shape: Vec<GeometryPoint>,
        original_geometry_points: Vec<usize>,
        shape_to_move: Vec<GeometryPoint>,
        geometry_points_to_move: Vec<usize>,
    ) -> Self {
        Self {
            element,
            original_shape,
            original_geometry_points,
            shape_to_move,
            geometry_points_to_move,
            lane: None,
            original_positions_over_lane: Vec::new(),
            allow_change_lane: false,
        }
    }

    /// Move positions over a lane as one rigid span.
    pub fn over_lane(
        element: ElementId,
        lane: LaneId,
        positions: Vec<f64>,
        allow_change_lane: bool,
    ) -> Self {
        Self {
            element,
            original_shape: Vec::new(),
            original_geometry_points: Vec::new(),
            shape_to_move: Vec::new(),
            geometry_points_to_move: Vec::new(),
            lane: Some(lane),
            original_positions_over_lane: positions,
            allow_change_lane,
        }
    }

    /// Move positions over a lane; the element only applies the selected ones.
    pub fn over_lane_partial(
        element: ElementId,
        lane: LaneId,
        positions: Vec<f64>,
        geometry_points_to_move: Vec<usize>,
    ) -> Self {
        Self {
            geometry_points_to_move,
            ..Self::over_lane(element, lane, positions, false)
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn original_shape(&self) -> &[GeometryPoint] {
        &self.original_shape
    }

    pub fn original_geometry_points(&self) -> &[usize] {
        &self.original_geometry_points
    }

    pub fn shape_to_move(&self) -> &[GeometryPoint] {
        &self.shape_to_move
    }

    /// Empty means the whole shape moves.
    pub fn geometry_points_to_move(&self) -> &[usize] {
        &self.geometry_points_to_move
    }

    pub fn lane(&self) -> Option<LaneId> {
        self.lane
    }

    pub fn original_positions_over_lane(&self) -> &[f64] {
        &self.original_positions_over_lane
    }

    pub fn allow_change_lane(&self) -> bool {
        self.allow_change_lane
    }

    /// Whether only selected points of a free shape move.
    pub fn is_partial(&self) -> bool {
        !self.geometry_points_to_move.is_empty()
    }
}

/// Displacement requested by the user. Either planar or elevation-only.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveOffset {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl MoveOffset {
    pub fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn elevation(z: f64) -> Self {
        Self { x: 0.0, y: 0.0, z }
    }
}

impl From<Vec2> for MoveOffset {
    fn from(delta: Vec2) -> Self {
        Self::planar(delta.x, delta.y)
    }
}

/// Outcome of one move computation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoveResult {
    /// Candidate shape. For lane moves, `(pos_over_lane, 0)` placeholders.
    pub shape_to_update: Vec<GeometryPoint>,
    /// Echo of the operation's selected points.
    pub geometry_points_to_move: Vec<usize>,
    /// Lane the element should switch to, if a lane change was detected.
    pub new_lane: Option<LaneId>,
    /// Lateral offset towards `new_lane`; zero without a switch.
    pub lane_offset: f64,
}

impl MoveResult {
    pub fn new(geometry_points_to_move: Vec<usize>) -> Self {
        Self {
            geometry_points_to_move,
            ..Default::default()
        }
    }

    /// Lane positions held by the placeholder shape of a lane move.
    pub fn positions_over_lane(&self) -> Vec<f64> {
        self.shape_to_update
            .iter()
            .filter_map(|p| p.position().map(|p| p.pos_over_lane()))
            .collect()
    }
}

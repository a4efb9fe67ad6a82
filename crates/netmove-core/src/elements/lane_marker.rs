//! Element attached to a lane (stops, detectors, ...).

use super::ElementId;
use crate::movement::{MoveOperation, MoveResult, MoveTarget};
use crate::network::LaneId;
use crate::undo::{ElementState, UndoEntry, UndoList};
use uuid::Uuid;

/// An element placed over a lane at one or more positions (e.g. start and end).
#[derive(Debug, Clone)]
pub struct LaneMarker {
    pub(crate) id: ElementId,
    /// Lane the element is attached to.
    pub lane: LaneId,
    /// Positions over the lane.
    pub positions: Vec<f64>,
    /// Lateral drawing offset while a lane change is previewed.
    pub lateral_offset: f64,
    preview_lane: Option<LaneId>,
}

impl LaneMarker {
    pub fn new(lane: LaneId, positions: Vec<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            lane,
            positions,
            lateral_offset: 0.0,
            preview_lane: None,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Lane a running drag would move the element to.
    pub fn preview_lane(&self) -> Option<LaneId> {
        self.preview_lane
    }

    pub fn state(&self) -> ElementState {
        ElementState::OnLane {
            lane: self.lane,
            positions: self.positions.clone(),
        }
    }

    pub(crate) fn restore(&mut self, lane: LaneId, positions: Vec<f64>) {
        self.lane = lane;
        self.positions = positions;
        self.lateral_offset = 0.0;
        self.preview_lane = None;
    }

    /// Move the whole element along its lane.
    pub fn move_operation(&self, allow_change_lane: bool) -> MoveOperation {
        MoveOperation::over_lane(self.id, self.lane, self.positions.clone(), allow_change_lane)
    }

    /// Move one of the element's positions (e.g. only its end), leaving the others.
    pub fn move_operation_for_position(&self, index: usize) -> Option<MoveOperation> {
        let position = *self.positions.get(index)?;
        Some(MoveOperation::over_lane_partial(self.id, self.lane, vec![position], vec![index]))
    }

    fn apply_positions(&mut self, result: &MoveResult) {
        let moved = result.positions_over_lane();
        if result.geometry_points_to_move.is_empty() {
            self.positions = moved;
            return;
        }
        for (&index, pos) in result.geometry_points_to_move.iter().zip(moved) {
            if let Some(slot) = self.positions.get_mut(index) {
                *slot = pos;
            }
        }
    }
}

impl MoveTarget for LaneMarker {
    fn set_move_shape(&mut self, result: &MoveResult) {
        self.apply_positions(result);
        self.preview_lane = result.new_lane;
        self.lateral_offset = result.lane_offset;
    }

    fn commit_move_shape(&mut self, result: &MoveResult, undo_list: &mut UndoList) {
        let before = self.state();
        self.apply_positions(result);
        if let Some(lane) = result.new_lane {
            self.lane = lane;
        }
        self.preview_lane = None;
        self.lateral_offset = 0.0;
        let description = if result.new_lane.is_some() {
            "change lane"
        } else {
            "move over lane"
        };
        undo_list.push(UndoEntry {
            element: self.id,
            description: description.to_string(),
            before,
            after: self.state(),
        });
    }
}

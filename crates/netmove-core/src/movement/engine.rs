//! Preview/commit move engine.

use super::{MoveError, MoveOffset, MoveOperation, MoveResult, MoveTarget};
use crate::config::MoveConfig;
use crate::geometry::{GeometryPoint, Position, remove_double_points};
use crate::network::{LaneId, LaneNetwork};
use crate::undo::UndoList;
use crate::view::ViewContext;

/// Turns move operations into shapes and drives the preview/commit protocol.
///
/// The engine holds no drag state; everything it needs comes in through the
/// operation, the offset and the view/network collaborators.
#[derive(Debug, Clone, Default)]
pub struct MoveEngine {
    config: MoveConfig,
}

impl MoveEngine {
    pub fn new(config: MoveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MoveConfig {
        &self.config
    }

    /// Preview step: compute the shape for `offset` and show it on `target`
    /// without recording history. Safe to call any number of times per drag.
    pub fn move_element<V, N, T>(
        &self,
        view: &V,
        network: &N,
        operation: &MoveOperation,
        offset: &MoveOffset,
        target: &mut T,
    ) -> Result<MoveResult, MoveError>
    where
        V: ViewContext + ?Sized,
        N: LaneNetwork + ?Sized,
        T: MoveTarget + ?Sized,
    {
        let result = self.calculate_move(view, network, operation, offset)?;
        log::trace!(
            "Preview move of {} ({} points)",
            operation.element(),
            result.shape_to_update.len()
        );
        target.set_move_shape(&result);
        Ok(result)
    }

    /// Commit step: recompute from the pre-drag state and record the change.
    ///
    /// The element is first reset to its original geometry so that the final
    /// shape never depends on how many previews ran.
    pub fn commit_move<V, N, T>(
        &self,
        view: &V,
        network: &N,
        operation: &MoveOperation,
        offset: &MoveOffset,
        target: &mut T,
        undo_list: &mut UndoList,
    ) -> Result<MoveResult, MoveError>
    where
        V: ViewContext + ?Sized,
        N: LaneNetwork + ?Sized,
        T: MoveTarget + ?Sized,
    {
        let reset = if operation.lane().is_some() {
            MoveResult {
                shape_to_update: operation
                    .original_positions_over_lane()
                    .iter()
                    .map(|&pos| GeometryPoint::Valid(Position::along_lane(pos)))
                    .collect(),
                ..MoveResult::new(operation.geometry_points_to_move().to_vec())
            }
        } else {
            MoveResult {
                shape_to_update: operation.original_shape().to_vec(),
                ..MoveResult::new(operation.original_geometry_points().to_vec())
            }
        };
        target.set_move_shape(&reset);

        let mut result = self.calculate_move(view, network, operation, offset)?;
        // Only on commit, so points never vanish mid-drag.
        if operation.lane().is_none()
            && operation.is_partial()
            && result.shape_to_update.len() > 2
        {
            let tolerance = self.config.double_point_tolerance;
            remove_double_points(&mut result.shape_to_update, tolerance);
        }
        log::debug!(
            "Commit move of {}: {} points, new lane {:?}",
            operation.element(),
            result.shape_to_update.len(),
            result.new_lane
        );
        target.commit_move_shape(&result, undo_list);
        Ok(result)
    }

    /// Pure computation shared by preview and commit.
    pub fn calculate_move<V, N>(
        &self,
        view: &V,
        network: &N,
        operation: &MoveOperation,
        offset: &MoveOffset,
    ) -> Result<MoveResult, MoveError>
    where
        V: ViewContext + ?Sized,
        N: LaneNetwork + ?Sized,
    {
        let mut result = MoveResult::new(operation.geometry_points_to_move().to_vec());
        if let Some(lane) = operation.lane() {
            result.shape_to_update =
                self.calculate_movement_over_lane(view, network, operation, lane, offset)?;
            self.calculate_new_lane(view, network, operation, lane, &mut result)?;
        } else {
            result.shape_to_update = offset_shape(
                view,
                operation.shape_to_move(),
                operation.geometry_points_to_move(),
                offset,
            )?;
        }
        Ok(result)
    }

    /// Shift the operation's lane span along the lane by the projected offset.
    ///
    /// The span moves rigidly and is clamped so that no position leaves
    /// `[0, lane length]` when the span fits the lane.
    pub fn calculate_movement_over_lane<V, N>(
        &self,
        view: &V,
        network: &N,
        operation: &MoveOperation,
        lane: LaneId,
        offset: &MoveOffset,
    ) -> Result<Vec<GeometryPoint>, MoveError>
    where
        V: ViewContext + ?Sized,
        N: LaneNetwork + ?Sized,
    {
        let positions = operation.original_positions_over_lane();
        let (Some(&front), Some(&back)) = (positions.first(), positions.last()) else {
            return Err(MoveError::EmptyLanePositions);
        };
        let shape = network.lane_shape(lane).ok_or(MoveError::UnknownLane(lane))?;
        let lane_length = network.lane_length(lane).ok_or(MoveError::UnknownLane(lane))?;

        let center = (front + back) * 0.5;
        let half_span = (back - front).abs() * 0.5;

        let mut target = shape.position_at_offset(center);
        target.x += offset.x;
        target.y += offset.y;
        let target = view.snap_to_active_grid(target);

        let shift = match shape.nearest_offset(target, true) {
            // Beyond either end of the lane
            None => {
                if shape.nearest_offset(target, false) == Some(0.0) {
                    front
                } else {
                    back - lane_length
                }
            }
            Some(pos) if pos - half_span < 0.0 => front,
            Some(pos) if pos + half_span > lane_length => back - lane_length,
            Some(pos) => center - pos,
        };

        Ok(positions
            .iter()
            .map(|&pos| GeometryPoint::Valid(Position::along_lane(pos - shift)))
            .collect())
    }

    /// Detect whether the cursor sits on a parallel lane and record the switch.
    ///
    /// When several lanes qualify the last one in lane order wins.
    pub fn calculate_new_lane<V, N>(
        &self,
        view: &V,
        network: &N,
        operation: &MoveOperation,
        lane: LaneId,
        result: &mut MoveResult,
    ) -> Result<(), MoveError>
    where
        V: ViewContext + ?Sized,
        N: LaneNetwork + ?Sized,
    {
        if !operation.allow_change_lane() {
            result.new_lane = None;
            result.lane_offset = 0.0;
            return Ok(());
        }
        let cursor = view.cursor_position();
        let current_shape = network.lane_shape(lane).ok_or(MoveError::UnknownLane(lane))?;

        for candidate in network.parallel_lanes(lane) {
            if candidate == lane {
                continue;
            }
            let Some(shape) = network.lane_shape(candidate) else {
                continue;
            };
            let Some(candidate_offset) = shape.nearest_offset(cursor, true) else {
                continue;
            };
            let pos_over_candidate = shape.position_at_offset(candidate_offset);
            let dist_sq = pos_over_candidate.distance_squared(cursor);
            if dist_sq >= self.config.lane_change_distance_squared {
                continue;
            }
            let current_offset = current_shape
                .nearest_offset(cursor, true)
                .or_else(|| current_shape.nearest_offset(cursor, false))
                .unwrap_or(0.0);
            let pos_over_current = current_shape.position_at_offset(current_offset);

            let mut lane_offset = pos_over_candidate.distance(pos_over_current);
            if lane.index < candidate.index {
                lane_offset = -lane_offset;
            }
            log::debug!("Lane change candidate {} (offset {:.2})", candidate, lane_offset);
            result.new_lane = Some(candidate);
            result.lane_offset = lane_offset;
        }
        Ok(())
    }
}

/// Offset the selected points of `shape` (all of them when `indices` is empty)
/// and snap each to the active grid.
fn offset_shape<V>(
    view: &V,
    shape: &[GeometryPoint],
    indices: &[usize],
    offset: &MoveOffset,
) -> Result<Vec<GeometryPoint>, MoveError>
where
    V: ViewContext + ?Sized,
{
    let mut shape = shape.to_vec();
    if indices.is_empty() {
        for (index, point) in shape.iter_mut().enumerate() {
            *point = offset_point(view, *point, index, offset)?;
        }
    } else {
        let len = shape.len();
        for &index in indices {
            let point = shape
                .get_mut(index)
                .ok_or(MoveError::GeometryIndexOutOfBounds { index, len })?;
            *point = offset_point(view, *point, index, offset)?;
        }
    }
    Ok(shape)
}

fn offset_point<V>(
    view: &V,
    point: GeometryPoint,
    index: usize,
    offset: &MoveOffset,
) -> Result<GeometryPoint, MoveError>
where
    V: ViewContext + ?Sized,
{
    let GeometryPoint::Valid(mut position) = point else {
        log::warn!("Trying to move an invalid position (geometry point {})", index);
        return Err(MoveError::InvalidGeometryPoint { index });
    };
    position.add(offset.x, offset.y, offset.z);
    position.point = view.snap_to_active_grid(position.point);
    Ok(GeometryPoint::Valid(position))
}

//! Free polyline/polygon element (e.g. a polygon or a taz border).

use super::ElementId;
use crate::geometry::{GeometryPoint, point_to_segment_dist, shape_from_points};
use crate::movement::{MoveOperation, MoveResult, MoveTarget};
use crate::undo::{ElementState, UndoEntry, UndoList};
use kurbo::{BezPath, Point, Shape as _};
use uuid::Uuid;

/// A shape made of free geometry points.
#[derive(Debug, Clone)]
pub struct FreeShape {
    pub(crate) id: ElementId,
    /// Shape points. May contain invalid points for shapes not yet placed.
    pub points: Vec<GeometryPoint>,
    /// Whether the last point connects back to the first.
    pub closed: bool,
}

impl FreeShape {
    /// Create an open polyline.
    pub fn new(points: &[Point]) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: shape_from_points(points),
            closed: false,
        }
    }

    /// Create a closed polygon.
    pub fn polygon(points: &[Point]) -> Self {
        Self {
            closed: true,
            ..Self::new(points)
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn state(&self) -> ElementState {
        ElementState::Shape(self.points.clone())
    }

    /// Segments as (start index, end index); includes the closing segment of a polygon.
    fn segments(&self) -> Vec<(usize, usize)> {
        let n = self.points.len();
        let mut segments: Vec<(usize, usize)> = (1..n).map(|i| (i - 1, i)).collect();
        if self.closed && n > 2 {
            segments.push((n - 1, 0));
        }
        segments
    }

    /// Index of the vertex within `radius` of `point`, nearest first.
    pub fn vertex_at(&self, point: Point, radius: f64) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.position().map(|p| (i, p.point.distance(point))))
            .filter(|&(_, d)| d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Segment within `radius` of `point`, nearest first.
    pub fn segment_at(&self, point: Point, radius: f64) -> Option<(usize, usize)> {
        self.segments()
            .into_iter()
            .filter_map(|(a, b)| {
                let pa = self.points[a].position()?;
                let pb = self.points[b].position()?;
                Some(((a, b), point_to_segment_dist(point, pa.point, pb.point)))
            })
            .filter(|&(_, d)| d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(segment, _)| segment)
    }

    /// Check if a point hits the outline, or the interior of a polygon.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.segment_at(point, tolerance).is_some()
            || self.vertex_at(point, tolerance).is_some()
        {
            return true;
        }
        self.closed && self.to_path().contains(point)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut valid = self.points.iter().filter_map(|p| p.position());
        if let Some(first) = valid.next() {
            path.move_to(first.point);
            for p in valid {
                path.line_to(p.point);
            }
            if self.closed {
                path.close_path();
            }
        }
        path
    }

    /// Pick the move operation for a drag starting at `point`.
    ///
    /// A vertex under the cursor is dragged alone; a segment under the cursor
    /// gets a new vertex which is then dragged. With `move_whole` set, or when
    /// the cursor is only inside a polygon, the whole shape moves.
    pub fn move_operation_at(
        &self,
        point: Point,
        radius: f64,
        move_whole: bool,
    ) -> Option<MoveOperation> {
        if move_whole {
            return self
                .hit_test(point, radius)
                .then(|| MoveOperation::whole_shape(self.id, self.points.clone()));
        }
        if let Some(index) = self.vertex_at(point, radius) {
            return Some(MoveOperation::partial_shape(
                self.id,
                self.points.clone(),
                vec![index],
                self.points.clone(),
                vec![index],
            ));
        }
        if let Some((a, b)) = self.segment_at(point, radius) {
            let insert_at = a + 1;
            let mut shape_to_move = self.points.clone();
            shape_to_move.insert(insert_at, GeometryPoint::from(point));
            return Some(MoveOperation::partial_shape(
                self.id,
                self.points.clone(),
                vec![a, b],
                shape_to_move,
                vec![insert_at],
            ));
        }
        self.hit_test(point, radius)
            .then(|| MoveOperation::whole_shape(self.id, self.points.clone()))
    }
}

impl MoveTarget for FreeShape {
    fn set_move_shape(&mut self, result: &MoveResult) {
        self.points = result.shape_to_update.clone();
    }

    fn commit_move_shape(&mut self, result: &MoveResult, undo_list: &mut UndoList) {
        let before = self.state();
        self.points = result.shape_to_update.clone();
        undo_list.push(UndoEntry {
            element: self.id,
            description: "move shape".to_string(),
            before,
            after: self.state(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> FreeShape {
        FreeShape::polygon(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(50.0, 80.0)])
    }

    #[test]
    fn test_vertex_operation() {
        let shape = triangle();
        let op = shape.move_operation_at(Point::new(99.0, 1.0), 5.0, false).unwrap();
        assert_eq!(op.geometry_points_to_move(), &[1]);
        assert_eq!(op.original_geometry_points(), &[1]);
        assert_eq!(op.shape_to_move(), op.original_shape());
    }

    #[test]
    fn test_segment_operation_inserts_point() {
        let shape = triangle();
        let op = shape.move_operation_at(Point::new(50.0, 2.0), 5.0, false).unwrap();
        assert_eq!(op.shape_to_move().len(), 4);
        assert_eq!(op.original_shape().len(), 3);
        assert_eq!(op.geometry_points_to_move(), &[1]);
        assert_eq!(op.original_geometry_points(), &[0, 1]);
        assert_eq!(op.shape_to_move()[1], GeometryPoint::from(Point::new(50.0, 2.0)));
    }

    #[test]
    fn test_closing_segment_operation() {
        let shape = triangle();
        // Midpoint of the closing segment (50,80) -> (0,0)
        let op = shape.move_operation_at(Point::new(25.0, 40.0), 1.0, false).unwrap();
        assert_eq!(op.original_geometry_points(), &[2, 0]);
        assert_eq!(op.geometry_points_to_move(), &[3]);
    }

    #[test]
    fn test_interior_moves_whole_polygon() {
        let shape = triangle();
        let op = shape.move_operation_at(Point::new(50.0, 30.0), 2.0, false).unwrap();
        assert!(!op.is_partial());
        assert_eq!(op.shape_to_move(), shape.points.as_slice());
    }

    #[test]
    fn test_move_whole_on_outline() {
        let shape = triangle();
        let op = shape.move_operation_at(Point::new(0.0, 0.0), 2.0, true).unwrap();
        assert!(!op.is_partial());
    }

    #[test]
    fn test_miss() {
        let shape = FreeShape::new(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        assert!(shape.move_operation_at(Point::new(50.0, 30.0), 2.0, false).is_none());
        assert!(shape.move_operation_at(Point::new(50.0, 30.0), 2.0, true).is_none());
    }

    #[test]
    fn test_commit_records_undo() {
        let mut shape = FreeShape::new(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        let original = shape.points.clone();
        let moved = shape_from_points(&[Point::new(1.0, 1.0), Point::new(11.0, 1.0)]);
        let mut undo = UndoList::new();
        shape.commit_move_shape(
            &MoveResult {
                shape_to_update: moved.clone(),
                ..Default::default()
            },
            &mut undo,
        );
        assert_eq!(shape.points, moved);
        let entry = undo.last().unwrap();
        assert_eq!(entry.element, shape.id());
        assert_eq!(entry.before, ElementState::Shape(original));
        assert_eq!(entry.after, ElementState::Shape(moved));
    }
}

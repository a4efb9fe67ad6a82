//! Editor document: element lookup, lane network and undo history.

use crate::config::MoveConfig;
use crate::elements::{Element, ElementId};
use crate::movement::{MoveEngine, MoveError, MoveOffset, MoveOperation, MoveResult};
use crate::network::Network;
use crate::undo::UndoList;
use crate::view::ViewContext;
use std::collections::HashMap;

/// Owns the elements being edited and resolves the handles move operations carry.
#[derive(Debug, Clone, Default)]
pub struct EditorDocument {
    elements: HashMap<ElementId, Element>,
    /// Lanes elements can be attached to.
    pub network: Network,
    undo_list: UndoList,
    engine: MoveEngine,
}

impl EditorDocument {
    pub fn new(network: Network, config: MoveConfig) -> Self {
        Self {
            elements: HashMap::new(),
            network,
            undo_list: UndoList::new(),
            engine: MoveEngine::new(config),
        }
    }

    /// Add an element to the document.
    pub fn add_element(&mut self, element: impl Into<Element>) -> ElementId {
        let element = element.into();
        let id = element.id();
        self.elements.insert(id, element);
        id
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn engine(&self) -> &MoveEngine {
        &self.engine
    }

    pub fn undo_list(&self) -> &UndoList {
        &self.undo_list
    }

    /// Show the element of `operation` moved by `offset`. Records no history.
    pub fn preview_move<V: ViewContext + ?Sized>(
        &mut self,
        view: &V,
        operation: &MoveOperation,
        offset: &MoveOffset,
    ) -> Result<MoveResult, MoveError> {
        let id = operation.element();
        let element = self.elements.get_mut(&id).ok_or(MoveError::UnknownElement(id))?;
        self.engine.move_element(view, &self.network, operation, offset, element)
    }

    /// Finish a drag: apply the final offset and record an undo entry.
    pub fn commit_move<V: ViewContext + ?Sized>(
        &mut self,
        view: &V,
        operation: &MoveOperation,
        offset: &MoveOffset,
    ) -> Result<MoveResult, MoveError> {
        let id = operation.element();
        let element = self.elements.get_mut(&id).ok_or(MoveError::UnknownElement(id))?;
        self.engine
            .commit_move(view, &self.network, operation, offset, element, &mut self.undo_list)
    }

    /// Undo the last committed move.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.undo_list.undo() else {
            return false;
        };
        log::info!("Undo: {} ({})", entry.description, entry.element);
        match self.elements.get_mut(&entry.element) {
            Some(element) => element.restore(&entry.before),
            None => {
                log::warn!("Undo entry refers to missing element {}", entry.element);
                false
            }
        }
    }

    /// Redo the last undone move.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.undo_list.redo() else {
            return false;
        };
        log::info!("Redo: {} ({})", entry.description, entry.element);
        match self.elements.get_mut(&entry.element) {
            Some(element) => element.restore(&entry.after),
            None => {
                log::warn!("Redo entry refers to missing element {}", entry.element);
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.undo_list.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo_list.can_redo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::MoveDrag;
    use crate::elements::{FreeShape, LaneMarker};
    use crate::geometry::{GeometryPoint, shape_from_points};
    use crate::network::{Edge, LaneId};
    use crate::snap::SnapMode;
    use crate::view::GridView;
    use kurbo::Point;
    use uuid::Uuid;

    fn network() -> (Network, LaneId, LaneId) {
        let mut network = Network::new();
        let edge = network.add_edge(Edge::new(
            100.0,
            vec![
                vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
                vec![Point::new(0.0, 3.2), Point::new(100.0, 3.2)],
            ],
        ));
        (network, LaneId::new(edge, 0), LaneId::new(edge, 1))
    }

    fn shape_points(doc: &EditorDocument, id: ElementId) -> Vec<GeometryPoint> {
        match doc.element(id) {
            Some(Element::Shape(s)) => s.points.clone(),
            _ => panic!("not a shape"),
        }
    }

    fn marker(doc: &EditorDocument, id: ElementId) -> LaneMarker {
        match doc.element(id) {
            Some(Element::LaneMarker(m)) => m.clone(),
            _ => panic!("not a lane marker"),
        }
    }

    #[test]
    fn test_drag_vertex_then_undo_redo() {
        let mut doc = EditorDocument::default();
        let shape = FreeShape::new(&[
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(100.0, 0.0),
        ]);
        let id = doc.add_element(shape.clone());
        let view = GridView::new(SnapMode::Grid, 10.0);

        let op = shape.move_operation_at(Point::new(50.0, 0.0), 5.0, false).unwrap();
        let mut drag = MoveDrag::new(op, Point::new(50.0, 0.0));
        for y in [3.0, 8.0, 14.0, 21.0] {
            drag.update(Point::new(50.0, y));
            doc.preview_move(&view, &drag.operation, &drag.offset()).unwrap();
        }
        assert!(!doc.can_undo());
        doc.commit_move(&view, &drag.operation, &drag.offset()).unwrap();

        let moved = shape_from_points(&[
            Point::new(0.0, 0.0),
            Point::new(50.0, 20.0),
            Point::new(100.0, 0.0),
        ]);
        assert_eq!(shape_points(&doc, id), moved);
        assert!(doc.can_undo());

        assert!(doc.undo());
        assert_eq!(shape_points(&doc, id), shape.points);
        assert!(doc.redo());
        assert_eq!(shape_points(&doc, id), moved);
        assert!(!doc.redo());
    }

    #[test]
    fn test_inserted_vertex_collapses_on_commit() {
        let mut doc = EditorDocument::default();
        let shape = FreeShape::new(&[
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(100.0, 0.0),
        ]);
        let id = doc.add_element(shape.clone());
        let view = GridView::default();

        // Insert a vertex on the first segment and drop it onto the middle vertex.
        let op = shape.move_operation_at(Point::new(25.0, 0.5), 1.0, false).unwrap();
        let offset = MoveOffset::planar(24.5, -0.5);
        let preview = doc.preview_move(&view, &op, &offset).unwrap();
        assert_eq!(preview.shape_to_update.len(), 4);

        doc.commit_move(&view, &op, &offset).unwrap();
        assert_eq!(shape_points(&doc, id).len(), 3);

        assert!(doc.undo());
        assert_eq!(shape_points(&doc, id), shape.points);
    }

    #[test]
    fn test_lane_marker_change_lane() {
        let (network, lane0, lane1) = network();
        let mut doc = EditorDocument::new(network, MoveConfig::default());
        let marker_el = LaneMarker::new(lane0, vec![40.0, 60.0]);
        let id = doc.add_element(marker_el.clone());

        let mut view = GridView::default();
        let op = marker_el.move_operation(true);
        let mut drag = MoveDrag::new(op, Point::new(50.0, 0.0));

        drag.update(Point::new(60.0, 3.2));
        view.set_cursor(drag.current_point);
        doc.preview_move(&view, &drag.operation, &drag.offset()).unwrap();
        let previewed = marker(&doc, id);
        assert_eq!(previewed.preview_lane(), Some(lane1));
        assert_eq!(previewed.lane, lane0);
        assert_eq!(previewed.positions, vec![50.0, 70.0]);

        let result = doc.commit_move(&view, &drag.operation, &drag.offset()).unwrap();
        assert_eq!(result.new_lane, Some(lane1));
        let committed = marker(&doc, id);
        assert_eq!(committed.lane, lane1);
        assert_eq!(committed.positions, vec![50.0, 70.0]);
        assert_eq!(committed.lateral_offset, 0.0);

        assert!(doc.undo());
        let restored = marker(&doc, id);
        assert_eq!(restored.lane, lane0);
        assert_eq!(restored.positions, vec![40.0, 60.0]);
    }

    #[test]
    fn test_lane_marker_end_only() {
        let (network, lane0, _) = network();
        let mut doc = EditorDocument::new(network, MoveConfig::default());
        let marker_el = LaneMarker::new(lane0, vec![40.0, 60.0]);
        let id = doc.add_element(marker_el.clone());

        let op = marker_el.move_operation_for_position(1).unwrap();
        doc.commit_move(&GridView::default(), &op, &MoveOffset::planar(55.0, 0.0))
            .unwrap();
        // A single position is a zero-length span, clamped to the lane end.
        assert_eq!(marker(&doc, id).positions, vec![40.0, 100.0]);
    }

    #[test]
    fn test_unknown_element() {
        let mut doc = EditorDocument::default();
        let op = MoveOperation::whole_shape(Uuid::new_v4(), vec![]);
        let err = doc
            .preview_move(&GridView::default(), &op, &MoveOffset::default())
            .unwrap_err();
        assert_eq!(err, MoveError::UnknownElement(op.element()));
        assert!(!doc.undo());
    }

    #[test]
    fn test_failed_commit_records_nothing() {
        let mut doc = EditorDocument::default();
        let mut shape = FreeShape::new(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        shape.points[0] = GeometryPoint::Invalid;
        doc.add_element(shape.clone());
        let op = MoveOperation::whole_shape(shape.id(), shape.points.clone());
        let err = doc
            .commit_move(&GridView::default(), &op, &MoveOffset::planar(1.0, 1.0))
            .unwrap_err();
        assert_eq!(err, MoveError::InvalidGeometryPoint { index: 0 });
        assert!(!doc.can_undo());
    }
}

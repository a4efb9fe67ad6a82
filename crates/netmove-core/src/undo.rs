//! Undo/redo log for committed moves.

use crate::elements::ElementId;
use crate::geometry::GeometryPoint;
use crate::network::LaneId;
use serde::{Deserialize, Serialize};

/// Maximum number of undo entries to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Snapshot of the part of an element a move changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementState {
    /// Free shape geometry.
    Shape(Vec<GeometryPoint>),
    /// Lane attachment and positions over the lane.
    OnLane { lane: LaneId, positions: Vec<f64> },
}

/// One undoable change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoEntry {
    pub element: ElementId,
    pub description: String,
    pub before: ElementState,
    pub after: ElementState,
}

/// Undo and redo stacks.
#[derive(Debug, Clone, Default)]
pub struct UndoList {
    undo_stack: Vec<UndoEntry>,
    redo_stack: Vec<UndoEntry>,
}

impl UndoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change. Clears the redo stack.
    pub fn push(&mut self, entry: UndoEntry) {
        log::debug!("Recording undo entry: {} ({})", entry.description, entry.element);
        self.undo_stack.push(entry);

        // Clear redo stack when new changes are made
        self.redo_stack.clear();

        // Limit undo history size
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the last change and move it to the redo stack.
    /// The caller restores `before` on the element.
    pub fn undo(&mut self) -> Option<&UndoEntry> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(entry);
        self.redo_stack.last()
    }

    /// Pop the last undone change and move it back to the undo stack.
    /// The caller restores `after` on the element.
    pub fn redo(&mut self) -> Option<&UndoEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry);
        self.undo_stack.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of entries that can be undone.
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Most recent undoable entry.
    pub fn last(&self) -> Option<&UndoEntry> {
        self.undo_stack.last()
    }
}

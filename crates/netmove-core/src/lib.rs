//! netmove Core Library
//!
//! Move engine for interactive network shape editing: dragging free shapes and
//! their points, sliding elements along lanes, and switching them to parallel
//! lanes, with a preview/commit protocol backed by an undo log.

pub mod config;
pub mod document;
pub mod drag;
pub mod elements;
pub mod geometry;
pub mod movement;
pub mod network;
pub mod snap;
pub mod undo;
pub mod view;

pub use config::{ConfigError, MoveConfig};
pub use document::EditorDocument;
pub use drag::{DragMode, MoveDrag};
pub use elements::{Element, ElementId, FreeShape, LaneMarker};
pub use geometry::{GeometryPoint, Polyline, Position};
pub use movement::{MoveEngine, MoveError, MoveOffset, MoveOperation, MoveResult, MoveTarget};
pub use network::{Edge, EdgeId, Lane, LaneId, LaneNetwork, Network};
pub use snap::{GRID_SIZE, SnapMode, snap_to_grid};
pub use undo::{ElementState, UndoEntry, UndoList};
pub use view::{GridView, ViewContext};

//! Lane lookup: edges, lanes and the queries the move engine makes on them.
//!
//! Elements refer to lanes through [`LaneId`] handles resolved by a
//! [`LaneNetwork`]; nothing here owns or outlives the elements that use it.

use crate::geometry::Polyline;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Smallest geometric length used when deriving the length factor.
pub const POSITION_EPS: f64 = 0.1;

/// Unique identifier for edges.
pub type EdgeId = Uuid;

/// A lane handle: parent edge plus the lane index within that edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaneId {
    pub edge: EdgeId,
    pub index: usize,
}

impl LaneId {
    pub fn new(edge: EdgeId, index: usize) -> Self {
        Self { edge, index }
    }
}

impl std::fmt::Display for LaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.edge, self.index)
    }
}

/// Lane queries consumed by the move engine.
pub trait LaneNetwork {
    /// Center line of a lane.
    fn lane_shape(&self, lane: LaneId) -> Option<&Polyline>;

    /// Lane length in lane coordinates (the range positions over the lane live in).
    fn lane_length(&self, lane: LaneId) -> Option<f64>;

    /// All lanes of the lane's parent edge in index order, the lane itself included.
    fn parallel_lanes(&self, lane: LaneId) -> Vec<LaneId>;
}

/// A single lane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lane {
    pub shape: Polyline,
}

/// A directed edge holding parallel lanes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub(crate) id: EdgeId,
    /// Declared edge length. May differ from the geometric length of its lanes.
    pub length: f64,
    pub lanes: Vec<Lane>,
}

impl Edge {
    /// Create an edge with an explicit declared length.
    pub fn new(length: f64, lane_shapes: Vec<Vec<Point>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            length,
            lanes: lane_shapes
                .into_iter()
                .map(|points| Lane { shape: Polyline::new(points) })
                .collect(),
        }
    }

    /// Ratio between a lane's geometric length and the declared edge length.
    pub fn length_geometry_factor(&self, lane_index: usize) -> f64 {
        let Some(lane) = self.lanes.get(lane_index) else {
            return 1.0;
        };
        if self.length <= 0.0 {
            return 1.0;
        }
        lane.shape.length().max(POSITION_EPS) / self.length
    }

    pub fn lane_id(&self, index: usize) -> LaneId {
        LaneId::new(self.id, index)
    }
}

/// In-memory lane lookup table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Network {
    edges: HashMap<EdgeId, Edge>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge and return its id.
    pub fn add_edge(&mut self, edge: Edge) -> EdgeId {
        let id = edge.id;
        self.edges.insert(id, edge);
        id
    }

    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.edges.get(&id.edge).and_then(|e| e.lanes.get(id.index))
    }
}

impl LaneNetwork for Network {
    fn lane_shape(&self, lane: LaneId) -> Option<&Polyline> {
        self.lane(lane).map(|l| &l.shape)
    }

    fn lane_length(&self, lane: LaneId) -> Option<f64> {
        let edge = self.edges.get(&lane.edge)?;
        edge.lanes.get(lane.index)?;
        Some(edge.length * edge.length_geometry_factor(lane.index))
    }

    fn parallel_lanes(&self, lane: LaneId) -> Vec<LaneId> {
        self.edges
            .get(&lane.edge)
            .map(|e| (0..e.lanes.len()).map(|i| e.lane_id(i)).collect())
            .unwrap_or_default()
    }
}

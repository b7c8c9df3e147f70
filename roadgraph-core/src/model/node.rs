//! Intersection and terminus nodes

use geo::Coord;

use crate::SegmentIdx;

/// Road graph node, created from one cluster of segment endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Stable identifier, `node_0000` style
    pub id: String,
    /// Centroid of the clustered endpoints; `y` carries the source z axis
    pub position: Coord<f64>,
    /// Segments starting at this node
    pub outgoing: Vec<SegmentIdx>,
    /// Segments ending at this node
    pub incoming: Vec<SegmentIdx>,
    /// Whether the node lies within the buffer of the data extent
    pub is_boundary: bool,
}

impl Node {
    pub fn degree(&self) -> usize {
        self.outgoing.len() + self.incoming.len()
    }
}

//! Road segments: validated input records and finished graph edges

use geo::Coord;
use serde_json::{Map, Value};

use crate::algo::metrics::SegmentMetrics;
use crate::{NodeIdx, SegmentIdx};

/// Polyline vertex `[x, y, z]`; `y` is elevation and ignored by graph logic
pub type Point3 = [f64; 3];

/// Input road segment that passed record validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSegment {
    pub id: String,
    /// Ordered polyline, at least two vertices
    pub points: Vec<Point3>,
    pub road_type: String,
    pub avg_speed_mph: f64,
    pub free_flow_speed_mph: f64,
    pub spawn_rates: Vec<f64>,
    /// Unrecognised record fields, written back untouched
    pub extra: Map<String, Value>,
}

impl RawSegment {
    /// Planar position of the first vertex
    pub fn start(&self) -> Coord<f64> {
        planar(self.points[0])
    }

    /// Planar position of the last vertex
    pub fn end(&self) -> Coord<f64> {
        planar(self.points[self.points.len() - 1])
    }

    /// Largest spawn-rate sample, zero when there are none
    pub fn max_spawn_rate(&self) -> f64 {
        self.spawn_rates.iter().copied().fold(0.0, f64::max)
    }

    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }
}

/// Project a polyline vertex on the ground plane
pub fn planar(point: Point3) -> Coord<f64> {
    Coord {
        x: point[0],
        y: point[2],
    }
}

/// Directed edge of the finished road graph
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub raw: RawSegment,
    pub metrics: SegmentMetrics,
    pub start_node: NodeIdx,
    pub end_node: NodeIdx,
    pub is_major: bool,
    pub is_entry: bool,
    /// Segments a vehicle can continue onto at the end node
    pub successors: Vec<SegmentIdx>,
    /// Exact inverse of `successors` across the graph
    pub predecessors: Vec<SegmentIdx>,
}

impl Segment {
    pub fn id(&self) -> &str {
        &self.raw.id
    }

    pub fn is_dead_end(&self) -> bool {
        self.successors.is_empty()
    }

    pub fn is_orphan(&self) -> bool {
        self.successors.is_empty() && self.predecessors.is_empty()
    }
}

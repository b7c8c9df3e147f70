//! Serde records of the nodes, graph and report files

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::algo::metrics::round_to;
use crate::model::{Node, Point3, RoadGraph, Segment};

/// Segment fields computed by the pipeline; never passed through from input
pub const DERIVED_SEGMENT_FIELDS: &[&str] = &[
    "startNodeId",
    "endNodeId",
    "speedRatio",
    "lengthMeters",
    "isMajor",
    "isEntry",
    "successors",
    "predecessors",
    "startHeadingDeg",
    "endHeadingDeg",
];

/// Graph metadata fields computed by the pipeline
pub const DERIVED_META_FIELDS: &[&str] = &[
    "majorSegmentCount",
    "entryPointCount",
    "totalSuccessorLinks",
    "graphVersion",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodesMeta {
    pub node_count: usize,
    pub snap_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    /// `[x, z]`, rounded to centimetres
    pub position: [f64; 2],
    pub outgoing: Vec<String>,
    pub incoming: Vec<String>,
    pub is_boundary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodesFile {
    pub meta: NodesMeta,
    pub nodes: Vec<NodeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMeta {
    pub major_segment_count: usize,
    pub entry_point_count: usize,
    pub total_successor_links: usize,
    pub graph_version: String,
    /// Input metadata, passed through
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub road_type: String,
    pub points: Vec<Point3>,
    pub avg_speed_mph: f64,
    pub free_flow_speed_mph: f64,
    pub spawn_rates: Vec<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub start_node_id: String,
    pub end_node_id: String,
    pub speed_ratio: f64,
    pub length_meters: f64,
    pub is_major: bool,
    pub is_entry: bool,
    pub successors: Vec<String>,
    pub predecessors: Vec<String>,
    pub start_heading_deg: f64,
    pub end_heading_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphFile {
    pub meta: GraphMeta,
    pub segments: Vec<SegmentRecord>,
}

fn segment_ids(graph: &RoadGraph, indices: &[usize]) -> Vec<String> {
    indices
        .iter()
        .map(|&idx| graph.segments[idx].id().to_string())
        .collect()
}

impl NodesFile {
    pub fn from_graph(graph: &RoadGraph) -> Self {
        Self {
            meta: NodesMeta {
                node_count: graph.node_count(),
                snap_radius: graph.snap_radius,
            },
            nodes: graph
                .nodes
                .iter()
                .map(|node| NodeRecord::from_node(graph, node))
                .collect(),
        }
    }
}

impl NodeRecord {
    fn from_node(graph: &RoadGraph, node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            position: [round_to(node.position.x, 2), round_to(node.position.y, 2)],
            outgoing: segment_ids(graph, &node.outgoing),
            incoming: segment_ids(graph, &node.incoming),
            is_boundary: node.is_boundary,
        }
    }
}

impl GraphFile {
    pub fn from_graph(graph: &RoadGraph) -> Self {
        let summary = graph.summary();
        Self {
            meta: GraphMeta {
                major_segment_count: summary.major_segment_count,
                entry_point_count: summary.entry_point_count,
                total_successor_links: summary.total_successor_links,
                graph_version: graph.graph_version.clone(),
                extra: graph.meta.clone(),
            },
            segments: graph
                .segments
                .iter()
                .map(|segment| SegmentRecord::from_segment(graph, segment))
                .collect(),
        }
    }
}

impl SegmentRecord {
    fn from_segment(graph: &RoadGraph, segment: &Segment) -> Self {
        let raw = &segment.raw;
        Self {
            id: raw.id.clone(),
            road_type: raw.road_type.clone(),
            points: raw.points.clone(),
            avg_speed_mph: raw.avg_speed_mph,
            free_flow_speed_mph: raw.free_flow_speed_mph,
            spawn_rates: raw.spawn_rates.clone(),
            extra: raw.extra.clone(),
            start_node_id: graph.nodes[segment.start_node].id.clone(),
            end_node_id: graph.nodes[segment.end_node].id.clone(),
            speed_ratio: segment.metrics.speed_ratio,
            length_meters: segment.metrics.length_meters,
            is_major: segment.is_major,
            is_entry: segment.is_entry,
            successors: segment_ids(graph, &segment.successors),
            predecessors: segment_ids(graph, &segment.predecessors),
            start_heading_deg: segment.metrics.start_heading_deg,
            end_heading_deg: segment.metrics.end_heading_deg,
        }
    }
}

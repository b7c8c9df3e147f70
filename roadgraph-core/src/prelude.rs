// Re-export key components
pub use crate::algo::{
    Adjacency, Classification, Clustering, SegmentClassifier, SegmentFeatures, SegmentMetrics,
    build_adjacency, cluster_endpoints, graph_version,
};
pub use crate::loading::{
    GraphBuildConfig, LoadedSegments, SkippedRecord, create_road_graph, parse_segments,
    read_segments,
};
pub use crate::model::{DataBounds, GraphSummary, Node, RawSegment, RoadGraph, Segment};
pub use crate::output::{read_graph_files, write_graph_files, write_report};
pub use crate::validation::{ValidationReport, ValidationThresholds, validate_graph};
pub use crate::{ConsistencyError, Error};

// Core index types
pub use crate::Heading;
pub use crate::NodeIdx;
pub use crate::SegmentIdx;

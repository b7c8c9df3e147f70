//! Road graph construction and certification.
//!
//! Turns independently digitized road polylines into a directed road graph:
//! endpoints are snapped into intersection nodes, segments are linked through
//! heading-compatible turns, classified, fingerprinted and finally checked
//! against connectivity thresholds before the graph is handed to a traffic
//! simulation.

pub mod algo;
pub mod error;
pub mod loading;
pub mod model;
pub mod output;
pub mod prelude;
pub mod validation;

pub use error::{ConsistencyError, Error};
pub use loading::{GraphBuildConfig, LoadedSegments, SkippedRecord, create_road_graph};
pub use model::{DataBounds, GraphSummary, Node, RawSegment, RoadGraph, Segment};
pub use validation::{ValidationReport, ValidationThresholds, validate_graph};

/// Index of a segment in [`RoadGraph::segments`]
pub type SegmentIdx = usize;
/// Index of a node in [`RoadGraph::nodes`]
pub type NodeIdx = usize;
/// Compass bearing in degrees, 0 = north, clockwise
pub type Heading = f64;

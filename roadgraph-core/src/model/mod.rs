//! Data model of the road graph
//!
//! Input records, the intersection nodes derived from them and the finished
//! directed graph handed to downstream consumers.

pub mod bounds;
pub mod graph;
pub mod node;
pub mod segment;

pub use bounds::DataBounds;
pub use graph::{GraphSummary, RoadGraph};
pub use node::Node;
pub use segment::{Point3, RawSegment, Segment};

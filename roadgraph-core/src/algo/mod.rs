//! Graph construction stages.
//!
//! Each stage is a pure function from the previous stages' outputs to a new,
//! fully populated value; nothing here mutates the input records.

pub mod adjacency;
pub mod classify;
pub mod cluster;
pub mod metrics;
pub mod version;

pub use adjacency::{Adjacency, build_adjacency};
pub use classify::{Classification, SegmentClassifier, SegmentFeatures};
pub use cluster::{Clustering, Endpoint, cluster_endpoints};
pub use metrics::SegmentMetrics;
pub use version::graph_version;

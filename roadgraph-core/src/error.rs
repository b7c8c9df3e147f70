use thiserror::Error;

/// Errors raised while building, loading or writing a road graph
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Internal consistency violation: {0}")]
    Consistency(#[from] ConsistencyError),
}

/// Broken graph invariant.
///
/// Never caused by bad input: the clustering and adjacency passes are expected
/// to produce a graph that satisfies all of these, so any of them means a
/// defect in the pipeline itself (or a hand-edited graph file).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("predecessor count {predecessors} != successor count {successors}")]
    LinkCountMismatch {
        successors: usize,
        predecessors: usize,
    },
    #[error("segment {segment} links to {neighbour}, but the inverse link is missing")]
    MissingInverse { segment: String, neighbour: String },
    #[error("segment {segment} lists itself as a neighbour")]
    SelfLink { segment: String },
    #[error("segment {segment} references unknown node {node}")]
    UnknownNode { segment: String, node: String },
    #[error("segment {segment} references unknown segment {reference}")]
    UnknownSegment { segment: String, reference: String },
    #[error("node {node} lists unknown segment {reference}")]
    DanglingNodeLink { node: String, reference: String },
    #[error("node {node} lists segment {segment}, which does not touch it")]
    IncidenceMismatch { node: String, segment: String },
    #[error("segment {segment} is missing from the incidence list of node {node}")]
    UnlistedSegment { segment: String, node: String },
}

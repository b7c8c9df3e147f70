//! This module is responsible for reading raw road segment records and
//! running the graph building pipeline over them.

mod builder;
mod config;
mod reader;

pub use builder::create_road_graph;
pub use config::GraphBuildConfig;
pub use reader::{LoadedSegments, SkippedRecord, parse_segments, read_segments};

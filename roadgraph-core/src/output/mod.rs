//! Writing the graph as flat records, and reading it back for validation

mod records;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use geo::Coord;
use hashbrown::HashMap;
use log::{info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use records::{
    DERIVED_META_FIELDS, DERIVED_SEGMENT_FIELDS, GraphFile, GraphMeta, NodeRecord, NodesFile,
    NodesMeta, SegmentRecord,
};

use crate::algo::{SegmentMetrics, graph_version};
use crate::model::{Node, RawSegment, RoadGraph, Segment};
use crate::{ConsistencyError, Error, NodeIdx, SegmentIdx, ValidationReport};

fn create_file(path: &Path) -> Result<BufWriter<File>, Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to create file '{}': {}", path.display(), e),
        )
    })?;
    Ok(BufWriter::new(file))
}

fn write_json<T: Serialize>(value: &T, path: &Path, pretty: bool) -> Result<(), Error> {
    info!("Writing {}", path.display());
    let mut writer = create_file(path)?;
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    info!("Reading {}", path.display());
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Write the segments/graph file and the nodes file
///
/// # Errors
///
/// Fails on I/O or serialisation errors
pub fn write_graph_files(graph: &RoadGraph, graph_path: &Path, nodes_path: &Path) -> Result<(), Error> {
    write_json(&GraphFile::from_graph(graph), graph_path, false)?;
    write_json(&NodesFile::from_graph(graph), nodes_path, false)
}

/// Write a validation report as indented JSON
///
/// # Errors
///
/// Fails on I/O or serialisation errors
pub fn write_report(report: &ValidationReport, path: &Path) -> Result<(), Error> {
    write_json(report, path, true)
}

/// Load a graph previously written by [`write_graph_files`].
///
/// # Errors
///
/// Fails on I/O or parse errors, and with [`Error::Consistency`] if the files
/// reference unknown nodes or segments or otherwise break graph invariants.
pub fn read_graph_files(graph_path: &Path, nodes_path: &Path) -> Result<RoadGraph, Error> {
    let graph_file: GraphFile = read_json(graph_path)?;
    let nodes_file: NodesFile = read_json(nodes_path)?;
    let graph = graph_from_records(graph_file, nodes_file)?;
    info!(
        "Loaded {} segments, {} nodes",
        graph.segment_count(),
        graph.node_count()
    );
    Ok(graph)
}

fn index_by_id<'a, I>(ids: I, kind: &str) -> Result<HashMap<String, usize>, Error>
where
    I: Iterator<Item = &'a String>,
{
    let mut index = HashMap::new();
    for (idx, id) in ids.enumerate() {
        if index.insert(id.clone(), idx).is_some() {
            return Err(Error::InvalidData(format!("duplicate {kind} id '{id}'")));
        }
    }
    Ok(index)
}

/// Rebuild a [`RoadGraph`] from its file records and check its invariants
///
/// # Errors
///
/// See [`read_graph_files`]
pub fn graph_from_records(graph_file: GraphFile, nodes_file: NodesFile) -> Result<RoadGraph, Error> {
    let node_index = index_by_id(nodes_file.nodes.iter().map(|n| &n.id), "node")?;
    let segment_index = index_by_id(graph_file.segments.iter().map(|s| &s.id), "segment")?;

    let resolve_node = |segment: &str, node: &str| -> Result<NodeIdx, ConsistencyError> {
        node_index
            .get(node)
            .copied()
            .ok_or_else(|| ConsistencyError::UnknownNode {
                segment: segment.to_string(),
                node: node.to_string(),
            })
    };
    let resolve_segments = |owner: &str, ids: &[String]| -> Result<Vec<SegmentIdx>, ConsistencyError> {
        ids.iter()
            .map(|id| {
                segment_index
                    .get(id)
                    .copied()
                    .ok_or_else(|| ConsistencyError::UnknownSegment {
                        segment: owner.to_string(),
                        reference: id.clone(),
                    })
            })
            .collect()
    };
    let resolve_listed = |node: &str, ids: &[String]| -> Result<Vec<SegmentIdx>, ConsistencyError> {
        ids.iter()
            .map(|id| {
                segment_index
                    .get(id)
                    .copied()
                    .ok_or_else(|| ConsistencyError::DanglingNodeLink {
                        node: node.to_string(),
                        reference: id.clone(),
                    })
            })
            .collect()
    };

    let nodes = nodes_file
        .nodes
        .into_iter()
        .map(|record| {
            Ok(Node {
                outgoing: resolve_listed(&record.id, &record.outgoing)?,
                incoming: resolve_listed(&record.id, &record.incoming)?,
                position: Coord {
                    x: record.position[0],
                    y: record.position[1],
                },
                is_boundary: record.is_boundary,
                id: record.id,
            })
        })
        .collect::<Result<Vec<_>, ConsistencyError>>()?;

    let segments = graph_file
        .segments
        .into_iter()
        .map(|record| {
            Ok(Segment {
                start_node: resolve_node(&record.id, &record.start_node_id)?,
                end_node: resolve_node(&record.id, &record.end_node_id)?,
                successors: resolve_segments(&record.id, &record.successors)?,
                predecessors: resolve_segments(&record.id, &record.predecessors)?,
                metrics: SegmentMetrics {
                    start_heading_deg: record.start_heading_deg,
                    end_heading_deg: record.end_heading_deg,
                    length_meters: record.length_meters,
                    speed_ratio: record.speed_ratio,
                },
                is_major: record.is_major,
                is_entry: record.is_entry,
                raw: RawSegment {
                    id: record.id,
                    points: record.points,
                    road_type: record.road_type,
                    avg_speed_mph: record.avg_speed_mph,
                    free_flow_speed_mph: record.free_flow_speed_mph,
                    spawn_rates: record.spawn_rates,
                    extra: record.extra,
                },
            })
        })
        .collect::<Result<Vec<_>, ConsistencyError>>()?;

    let GraphMeta {
        graph_version: stored_version,
        extra: meta,
        ..
    } = graph_file.meta;

    let graph = RoadGraph {
        nodes,
        segments,
        graph_version: stored_version,
        snap_radius: nodes_file.meta.snap_radius,
        meta,
    };
    graph.verify()?;

    let recomputed = graph_version(
        graph
            .segments
            .iter()
            .map(|s| (s.id(), s.raw.points.len())),
    );
    if recomputed != graph.graph_version {
        warn!(
            "Stored graph version {} does not match segment content ({recomputed})",
            graph.graph_version
        );
    }
    if nodes_file.meta.node_count != graph.node_count() {
        warn!(
            "Nodes file declares {} nodes but lists {}",
            nodes_file.meta.node_count,
            graph.node_count()
        );
    }

    Ok(graph)
}

use itertools::izip;
use log::{info, warn};
use rayon::prelude::*;
use serde_json::{Map, Value};

use super::config::GraphBuildConfig;
use super::reader::LoadedSegments;
use crate::algo::{
    Adjacency, Classification, Clustering, SegmentClassifier, SegmentFeatures, SegmentMetrics,
    build_adjacency, cluster_endpoints, graph_version,
};
use crate::model::{DataBounds, RawSegment, RoadGraph, Segment};
use crate::Error;

/// Share of orphan segments above which the build warns
const ORPHAN_WARNING_SHARE: f64 = 0.10;

/// Builds the directed road graph from validated segment records
///
/// Runs clustering, adjacency, classification and versioning in order and
/// checks every graph invariant before returning.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] for an invalid configuration or when no
/// usable segment remains, and [`Error::Consistency`] if the finished graph
/// breaks one of its structural invariants.
pub fn create_road_graph(
    input: LoadedSegments,
    config: &GraphBuildConfig,
) -> Result<RoadGraph, Error> {
    config.validate()?;

    let LoadedSegments { meta, segments, .. } = input;
    let segments = drop_degenerate(segments);
    if segments.is_empty() {
        return Err(Error::InvalidData(
            "No valid road segments to build a graph from".to_string(),
        ));
    }

    info!("Computing data bounds");
    let bounds = DataBounds::from_segments(&segments, config.boundary_buffer)
        .ok_or_else(|| Error::InvalidData("Road segments have no points".to_string()))?;
    let (min, max) = (bounds.rect().min(), bounds.rect().max());
    info!(
        "Data bounds: X [{:.0}, {:.0}], Z [{:.0}, {:.0}]",
        min.x, max.x, min.y, max.y
    );

    let metrics: Vec<SegmentMetrics> = segments.par_iter().map(SegmentMetrics::of).collect();

    info!("Building node set");
    let clustering = cluster_endpoints(&segments, &bounds, config.snap_radius);

    info!("Building adjacency");
    let adjacency = build_adjacency(&clustering, &metrics, config.angle_threshold_deg)?;

    info!("Classifying segments");
    let features: Vec<SegmentFeatures> = izip!(&segments, &metrics, &adjacency.predecessors)
        .enumerate()
        .map(|(idx, (raw, m, predecessors))| SegmentFeatures {
            max_spawn_rate: raw.max_spawn_rate(),
            speed_ratio: m.speed_ratio,
            length_meters: m.length_meters,
            starts_at_boundary: clustering.nodes[clustering.start_node[idx]].is_boundary,
            predecessor_count: predecessors.len(),
        })
        .collect();
    let classes = SegmentClassifier::from(config).classify_all(&features);

    let version = graph_version(segments.iter().map(|s| (s.id.as_str(), s.points.len())));

    let graph = assemble(
        segments,
        metrics,
        clustering,
        adjacency,
        &classes,
        version,
        config.snap_radius,
        meta,
    );
    graph.verify()?;

    log_summary(&graph);
    Ok(graph)
}

fn drop_degenerate(segments: Vec<RawSegment>) -> Vec<RawSegment> {
    segments
        .into_iter()
        .filter(|segment| {
            if segment.is_degenerate() {
                warn!(
                    "Skipping segment {}: needs at least 2 points, has {}",
                    segment.id,
                    segment.points.len()
                );
                false
            } else {
                true
            }
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn assemble(
    segments: Vec<RawSegment>,
    metrics: Vec<SegmentMetrics>,
    clustering: Clustering,
    adjacency: Adjacency,
    classes: &[Classification],
    graph_version: String,
    snap_radius: f64,
    meta: Map<String, Value>,
) -> RoadGraph {
    let Clustering {
        nodes,
        start_node,
        end_node,
        ..
    } = clustering;
    let Adjacency {
        successors,
        predecessors,
    } = adjacency;

    let segments = izip!(
        segments,
        metrics,
        start_node,
        end_node,
        successors,
        predecessors,
        classes
    )
    .map(
        |(raw, metrics, start_node, end_node, successors, predecessors, class)| Segment {
            raw,
            metrics,
            start_node,
            end_node,
            is_major: class.is_major,
            is_entry: class.is_entry,
            successors,
            predecessors,
        },
    )
    .collect();

    RoadGraph {
        nodes,
        segments,
        graph_version,
        snap_radius,
        meta,
    }
}

#[allow(clippy::cast_precision_loss)]
fn log_summary(graph: &RoadGraph) {
    let summary = graph.summary();
    let share = |count: usize| count as f64 / summary.segment_count as f64 * 100.0;

    info!(
        "{} major segments ({:.1}%)",
        summary.major_segment_count,
        share(summary.major_segment_count)
    );
    info!(
        "{} entry points ({:.1}%)",
        summary.entry_point_count,
        share(summary.entry_point_count)
    );
    info!(
        "Road graph built: {} segments, {} nodes, {} successor links, version {}",
        summary.segment_count, summary.node_count, summary.total_successor_links, graph.graph_version
    );

    if summary.avg_successors() < 1.0 {
        warn!(
            "Low average successors ({:.2}) - many dead ends",
            summary.avg_successors()
        );
    }
    if summary.orphan_segment_count as f64 > summary.segment_count as f64 * ORPHAN_WARNING_SHARE {
        warn!(
            "{} orphan segments (no connections)",
            summary.orphan_segment_count
        );
    }
}

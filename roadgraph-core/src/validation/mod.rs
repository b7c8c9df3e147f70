//! Structural quality checks of a finished road graph.
//!
//! Three independent traversals (undirected components, forward reachability
//! from entry segments, dead-end partition) are combined into a pass/fail
//! report. Validation only reads the graph.

mod components;
mod dead_ends;
mod reachability;
mod report;
mod thresholds;

pub use components::component_sizes;
pub use dead_ends::{DeadEnds, count_dead_ends};
pub use reachability::reachable_from_entries;
pub use report::{ThresholdCheck, ValidationReport};
pub use thresholds::ValidationThresholds;

use log::{info, warn};

use crate::RoadGraph;

/// Analyse `graph` and certify it against `thresholds`
pub fn validate_graph(graph: &RoadGraph, thresholds: &ValidationThresholds) -> ValidationReport {
    info!(
        "Validating {} segments, {} nodes",
        graph.segment_count(),
        graph.node_count()
    );

    let (components, (reachable, dead_ends)) = rayon::join(
        || component_sizes(graph),
        || {
            rayon::join(
                || reachable_from_entries(graph),
                || count_dead_ends(graph),
            )
        },
    );

    info!("Found {} components", components.len());
    if components.len() > 1 {
        let largest: Vec<usize> = components.iter().take(5).copied().collect();
        info!("Largest component sizes: {largest:?}");
    }
    info!("Reachable from entries: {reachable} segments");
    info!(
        "Dead ends: {} interior, {} boundary",
        dead_ends.interior, dead_ends.boundary
    );

    let report = ValidationReport::new(graph, &components, reachable, dead_ends, thresholds);
    for check in &report.checks {
        if check.passed {
            info!("{check}");
        } else {
            warn!("{check}");
        }
    }
    report
}

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DeadEnds, ValidationThresholds};
use crate::RoadGraph;
use crate::algo::metrics::round_to;

/// Outcome of one threshold comparison
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdCheck {
    pub name: &'static str,
    /// Measured value, percent
    pub actual_pct: f64,
    /// Threshold, percent
    pub threshold_pct: f64,
    /// True when the threshold is a minimum, false when it is a maximum
    pub is_minimum: bool,
    pub passed: bool,
}

impl ThresholdCheck {
    fn new(name: &'static str, actual: f64, threshold: f64, is_minimum: bool) -> Self {
        let passed = if is_minimum {
            actual >= threshold
        } else {
            actual <= threshold
        };
        Self {
            name,
            actual_pct: actual * 100.0,
            threshold_pct: threshold * 100.0,
            is_minimum,
            passed,
        }
    }

    /// Human readable reason, used when the check failed
    pub fn failure_reason(&self) -> String {
        let op = if self.is_minimum { '<' } else { '>' };
        format!(
            "{} {:.1}% {op} {:.1}% threshold",
            self.name, self.actual_pct, self.threshold_pct
        )
    }
}

impl fmt::Display for ThresholdCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.passed { '✓' } else { '✗' };
        let op = if self.is_minimum { ">=" } else { "<=" };
        write!(
            f,
            "{mark} {} {:.1}% ({op} {:.1}%)",
            self.name, self.actual_pct, self.threshold_pct
        )
    }
}

/// Validation report written next to the graph files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub total_segments: usize,
    pub total_nodes: usize,
    pub component_count: usize,
    pub largest_component_size: usize,
    pub largest_component_pct: f64,
    pub reachable_from_entries: usize,
    pub reachable_from_entries_pct: f64,
    pub interior_dead_ends: usize,
    pub interior_dead_end_pct: f64,
    pub boundary_dead_ends: usize,
    pub entry_point_count: usize,
    pub major_segment_count: usize,
    pub avg_successors: f64,
    pub avg_predecessors: f64,
    pub passed: bool,
    pub failures: Vec<String>,
    /// Per-threshold breakdown, in the order the failures are listed
    #[serde(skip)]
    pub checks: Vec<ThresholdCheck>,
}

#[allow(clippy::cast_precision_loss)]
fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

impl ValidationReport {
    /// Combine analysis results; `components` must be sorted largest first
    pub fn new(
        graph: &RoadGraph,
        components: &[usize],
        reachable: usize,
        dead_ends: DeadEnds,
        thresholds: &ValidationThresholds,
    ) -> Self {
        let total = graph.segment_count();
        let summary = graph.summary();
        let largest = components.first().copied().unwrap_or(0);

        let largest_fraction = fraction(largest, total);
        let reachable_fraction = fraction(reachable, total);
        let interior_fraction = fraction(dead_ends.interior, total);

        let checks = vec![
            ThresholdCheck::new(
                "Largest component",
                largest_fraction,
                thresholds.min_largest_component,
                true,
            ),
            ThresholdCheck::new(
                "Interior dead ends",
                interior_fraction,
                thresholds.max_interior_dead_end,
                false,
            ),
            ThresholdCheck::new(
                "Entry reachability",
                reachable_fraction,
                thresholds.min_entry_reachability,
                true,
            ),
        ];
        let failures: Vec<String> = checks
            .iter()
            .filter(|check| !check.passed)
            .map(ThresholdCheck::failure_reason)
            .collect();

        Self {
            total_segments: total,
            total_nodes: graph.node_count(),
            component_count: components.len(),
            largest_component_size: largest,
            largest_component_pct: round_to(largest_fraction * 100.0, 2),
            reachable_from_entries: reachable,
            reachable_from_entries_pct: round_to(reachable_fraction * 100.0, 2),
            interior_dead_ends: dead_ends.interior,
            interior_dead_end_pct: round_to(interior_fraction * 100.0, 2),
            boundary_dead_ends: dead_ends.boundary,
            entry_point_count: summary.entry_point_count,
            major_segment_count: summary.major_segment_count,
            avg_successors: round_to(summary.avg_successors(), 2),
            avg_predecessors: round_to(summary.avg_predecessors(), 2),
            passed: failures.is_empty(),
            failures,
            checks,
        }
    }
}

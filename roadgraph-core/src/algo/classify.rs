//! Major/minor and entry/interior labelling of segments

use rayon::prelude::*;

use crate::loading::GraphBuildConfig;
use crate::model::{Node, RoadGraph, Segment};

/// Labels assigned to one segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_major: bool,
    pub is_entry: bool,
}

/// Everything classification looks at for one segment
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SegmentFeatures {
    pub max_spawn_rate: f64,
    pub speed_ratio: f64,
    pub length_meters: f64,
    pub starts_at_boundary: bool,
    pub predecessor_count: usize,
}

impl SegmentFeatures {
    /// Features of a segment that is already part of a graph
    pub fn of(segment: &Segment, nodes: &[Node]) -> Self {
        Self {
            max_spawn_rate: segment.raw.max_spawn_rate(),
            speed_ratio: segment.metrics.speed_ratio,
            length_meters: segment.metrics.length_meters,
            starts_at_boundary: nodes
                .get(segment.start_node)
                .is_some_and(|node| node.is_boundary),
            predecessor_count: segment.predecessors.len(),
        }
    }
}

/// Threshold classifier; every segment is judged on its own features only
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentClassifier {
    pub spawn_rate_threshold: f64,
    pub speed_ratio_threshold: f64,
    pub length_threshold: f64,
}

impl From<&GraphBuildConfig> for SegmentClassifier {
    fn from(config: &GraphBuildConfig) -> Self {
        Self {
            spawn_rate_threshold: config.spawn_rate_threshold,
            speed_ratio_threshold: config.speed_ratio_threshold,
            length_threshold: config.length_threshold,
        }
    }
}

impl Default for SegmentClassifier {
    fn default() -> Self {
        Self::from(&GraphBuildConfig::default())
    }
}

impl SegmentClassifier {
    /// Busy, fast or long
    pub fn is_major(&self, features: &SegmentFeatures) -> bool {
        features.max_spawn_rate > self.spawn_rate_threshold
            || features.speed_ratio > self.speed_ratio_threshold
            || features.length_meters > self.length_threshold
    }

    /// Starts at the data boundary, or has nothing feeding into it
    pub fn is_entry(features: &SegmentFeatures) -> bool {
        features.starts_at_boundary || features.predecessor_count == 0
    }

    pub fn classify(&self, features: &SegmentFeatures) -> Classification {
        Classification {
            is_major: self.is_major(features),
            is_entry: Self::is_entry(features),
        }
    }

    /// Classify every segment of `features` in parallel
    pub fn classify_all(&self, features: &[SegmentFeatures]) -> Vec<Classification> {
        features.par_iter().map(|f| self.classify(f)).collect()
    }

    /// Classify the segments of a finished graph, in segment order
    pub fn classify_graph(&self, graph: &RoadGraph) -> Vec<Classification> {
        graph
            .segments
            .par_iter()
            .map(|segment| self.classify(&SegmentFeatures::of(segment, &graph.nodes)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph::test_support::linked_graph;

    #[test]
    fn length_alone_makes_a_segment_major() {
        let features = SegmentFeatures {
            max_spawn_rate: 0.05,
            speed_ratio: 0.10,
            length_meters: 200.0,
            starts_at_boundary: false,
            predecessor_count: 1,
        };
        let classifier = SegmentClassifier::default();

        assert!(classifier.is_major(&features));
        assert!(!classifier.is_major(&SegmentFeatures {
            length_meters: 150.0,
            ..features
        }));
    }

    #[test]
    fn spawn_rate_or_speed_alone_makes_a_segment_major() {
        let classifier = SegmentClassifier::default();
        let quiet = SegmentFeatures {
            predecessor_count: 1,
            ..SegmentFeatures::default()
        };

        assert!(!classifier.is_major(&quiet));
        assert!(classifier.is_major(&SegmentFeatures {
            max_spawn_rate: 0.31,
            ..quiet
        }));
        assert!(classifier.is_major(&SegmentFeatures {
            speed_ratio: 0.51,
            ..quiet
        }));
    }

    #[test]
    fn boundary_start_is_an_entry_despite_predecessors() {
        let features = SegmentFeatures {
            starts_at_boundary: true,
            predecessor_count: 3,
            ..SegmentFeatures::default()
        };
        assert!(SegmentClassifier::is_entry(&features));
    }

    #[test]
    fn unfed_interior_segment_is_an_entry() {
        let fed = SegmentFeatures {
            predecessor_count: 1,
            ..SegmentFeatures::default()
        };
        assert!(!SegmentClassifier::is_entry(&fed));
        assert!(SegmentClassifier::is_entry(&SegmentFeatures {
            predecessor_count: 0,
            ..fed
        }));
    }

    #[test]
    fn reclassifying_a_classified_graph_is_stable() {
        let mut graph = linked_graph(4, &[(0, 1), (1, 2), (2, 3)]);
        graph.segments[1].metrics.length_meters = 400.0;
        graph.segments[3].raw.spawn_rates = vec![0.1, 0.9];
        graph.nodes[graph.segments[2].start_node].is_boundary = true;

        let classifier = SegmentClassifier::default();
        let first = classifier.classify_graph(&graph);
        for (segment, class) in graph.segments.iter_mut().zip(&first) {
            segment.is_major = class.is_major;
            segment.is_entry = class.is_entry;
        }
        let second = classifier.classify_graph(&graph);

        assert_eq!(first, second);
        assert_eq!(
            first
                .iter()
                .map(|c| (c.is_major, c.is_entry))
                .collect::<Vec<_>>(),
            vec![(false, true), (true, false), (false, true), (true, false)]
        );
    }
}

//! The finished road graph and its invariant checks

use hashbrown::HashMap;
use serde_json::{Map, Value};

use super::{Node, Segment};
use crate::{ConsistencyError, NodeIdx, SegmentIdx};

/// Directed road graph: intersection nodes plus classified, linked segments
#[derive(Debug, Clone, PartialEq)]
pub struct RoadGraph {
    pub nodes: Vec<Node>,
    pub segments: Vec<Segment>,
    /// Fingerprint of the segment set, see [`crate::algo::version`]
    pub graph_version: String,
    /// Snap radius the nodes were clustered with
    pub snap_radius: f64,
    /// Input metadata carried through to the graph file
    pub meta: Map<String, Value>,
}

/// Aggregate counts written into the graph file metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphSummary {
    pub segment_count: usize,
    pub node_count: usize,
    pub boundary_node_count: usize,
    pub major_segment_count: usize,
    pub entry_point_count: usize,
    pub total_successor_links: usize,
    pub total_predecessor_links: usize,
    pub orphan_segment_count: usize,
}

impl GraphSummary {
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_successors(&self) -> f64 {
        if self.segment_count == 0 {
            0.0
        } else {
            self.total_successor_links as f64 / self.segment_count as f64
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn avg_predecessors(&self) -> f64 {
        if self.segment_count == 0 {
            0.0
        } else {
            self.total_predecessor_links as f64 / self.segment_count as f64
        }
    }
}

impl RoadGraph {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn summary(&self) -> GraphSummary {
        self.segments.iter().fold(
            GraphSummary {
                segment_count: self.segments.len(),
                node_count: self.nodes.len(),
                boundary_node_count: self.nodes.iter().filter(|n| n.is_boundary).count(),
                ..GraphSummary::default()
            },
            |mut acc, segment| {
                acc.major_segment_count += usize::from(segment.is_major);
                acc.entry_point_count += usize::from(segment.is_entry);
                acc.total_successor_links += segment.successors.len();
                acc.total_predecessor_links += segment.predecessors.len();
                acc.orphan_segment_count += usize::from(segment.is_orphan());
                acc
            },
        )
    }

    /// Lookup from segment id to its index
    pub fn segment_index(&self) -> HashMap<&str, SegmentIdx> {
        self.segments
            .iter()
            .enumerate()
            .map(|(idx, segment)| (segment.id(), idx))
            .collect()
    }

    /// Whether the end node of `segment` is a boundary node
    pub fn ends_at_boundary(&self, segment: &Segment) -> bool {
        self.nodes
            .get(segment.end_node)
            .is_some_and(|node| node.is_boundary)
    }

    /// Check every structural invariant of the graph.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: a dangling node or segment
    /// reference, a self link, a successor link without its predecessor
    /// counterpart (or vice versa), a node listing a segment that does not
    /// start or end there, a segment missing from its own nodes' lists, or
    /// unequal link totals.
    pub fn verify(&self) -> Result<(), ConsistencyError> {
        let segment_count = self.segments.len();
        let mut successors = 0;
        let mut predecessors = 0;

        for (idx, segment) in self.segments.iter().enumerate() {
            for node in [segment.start_node, segment.end_node] {
                if node >= self.nodes.len() {
                    return Err(ConsistencyError::UnknownNode {
                        segment: segment.id().to_string(),
                        node: node.to_string(),
                    });
                }
            }
            if !self.nodes[segment.start_node].outgoing.contains(&idx) {
                return Err(self.unlisted(segment, segment.start_node));
            }
            if !self.nodes[segment.end_node].incoming.contains(&idx) {
                return Err(self.unlisted(segment, segment.end_node));
            }

            for &succ in &segment.successors {
                self.check_link(idx, succ, segment_count)?;
                if !self.segments[succ].predecessors.contains(&idx) {
                    return Err(ConsistencyError::MissingInverse {
                        segment: segment.id().to_string(),
                        neighbour: self.segments[succ].id().to_string(),
                    });
                }
            }

            for &pred in &segment.predecessors {
                self.check_link(idx, pred, segment_count)?;
                if !self.segments[pred].successors.contains(&idx) {
                    return Err(ConsistencyError::MissingInverse {
                        segment: segment.id().to_string(),
                        neighbour: self.segments[pred].id().to_string(),
                    });
                }
            }

            successors += segment.successors.len();
            predecessors += segment.predecessors.len();
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            self.check_incidence(idx, node, &node.outgoing, |s| s.start_node)?;
            self.check_incidence(idx, node, &node.incoming, |s| s.end_node)?;
        }

        if successors == predecessors {
            Ok(())
        } else {
            Err(ConsistencyError::LinkCountMismatch {
                successors,
                predecessors,
            })
        }
    }

    fn unlisted(&self, segment: &Segment, node: NodeIdx) -> ConsistencyError {
        ConsistencyError::UnlistedSegment {
            segment: segment.id().to_string(),
            node: self.nodes[node].id.clone(),
        }
    }

    fn check_incidence(
        &self,
        idx: NodeIdx,
        node: &Node,
        listed: &[SegmentIdx],
        endpoint: impl Fn(&Segment) -> NodeIdx,
    ) -> Result<(), ConsistencyError> {
        for &segment in listed {
            let Some(segment) = self.segments.get(segment) else {
                return Err(ConsistencyError::DanglingNodeLink {
                    node: node.id.clone(),
                    reference: segment.to_string(),
                });
            };
            if endpoint(segment) != idx {
                return Err(ConsistencyError::IncidenceMismatch {
                    node: node.id.clone(),
                    segment: segment.id().to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_link(
        &self,
        from: SegmentIdx,
        to: SegmentIdx,
        segment_count: usize,
    ) -> Result<(), ConsistencyError> {
        let segment = self.segments[from].id();
        if to >= segment_count {
            return Err(ConsistencyError::UnknownSegment {
                segment: segment.to_string(),
                reference: to.to_string(),
            });
        }
        if to == from {
            return Err(ConsistencyError::SelfLink {
                segment: segment.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use geo::Coord;

    use super::*;
    use crate::algo::metrics::SegmentMetrics;
    use crate::model::RawSegment;

    /// Graph with `segment_count` segments, each between its own pair of
    /// non-boundary nodes, with the given successor links and matching
    /// predecessors.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn linked_graph(segment_count: usize, links: &[(usize, usize)]) -> RoadGraph {
        let nodes = (0..segment_count * 2)
            .map(|idx| Node {
                id: format!("node_{idx:04}"),
                position: Coord {
                    x: (idx / 2) as f64 * 100.0,
                    y: (idx % 2) as f64 * 50.0,
                },
                outgoing: if idx % 2 == 0 { vec![idx / 2] } else { Vec::new() },
                incoming: if idx % 2 == 1 { vec![idx / 2] } else { Vec::new() },
                is_boundary: false,
            })
            .collect();

        let mut segments: Vec<Segment> = (0..segment_count)
            .map(|idx| Segment {
                raw: RawSegment {
                    id: format!("road_{idx:04}"),
                    points: vec![[0.0; 3], [1.0, 0.0, 0.0]],
                    road_type: "street".to_string(),
                    ..RawSegment::default()
                },
                metrics: SegmentMetrics::default(),
                start_node: idx * 2,
                end_node: idx * 2 + 1,
                is_major: false,
                is_entry: false,
                successors: Vec::new(),
                predecessors: Vec::new(),
            })
            .collect();

        for &(from, to) in links {
            segments[from].successors.push(to);
            segments[to].predecessors.push(from);
        }

        RoadGraph {
            nodes,
            segments,
            graph_version: String::new(),
            snap_radius: 10.0,
            meta: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::linked_graph;
    use super::*;

    #[test]
    fn consistent_graph_verifies() {
        let graph = linked_graph(3, &[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(graph.verify(), Ok(()));
    }

    #[test]
    fn missing_predecessor_is_reported() {
        let mut graph = linked_graph(3, &[(0, 1), (1, 2)]);
        graph.segments[2].predecessors.clear();

        assert_eq!(
            graph.verify(),
            Err(ConsistencyError::MissingInverse {
                segment: "road_0001".to_string(),
                neighbour: "road_0002".to_string(),
            })
        );
    }

    #[test]
    fn self_link_is_reported() {
        let mut graph = linked_graph(2, &[]);
        graph.segments[1].successors.push(1);
        graph.segments[1].predecessors.push(1);

        assert_eq!(
            graph.verify(),
            Err(ConsistencyError::SelfLink {
                segment: "road_0001".to_string()
            })
        );
    }

    #[test]
    fn dangling_node_is_reported() {
        let mut graph = linked_graph(2, &[(0, 1)]);
        graph.segments[0].end_node = 42;

        assert!(matches!(
            graph.verify(),
            Err(ConsistencyError::UnknownNode { .. })
        ));
    }

    #[test]
    fn node_listing_a_foreign_segment_is_reported() {
        let mut graph = linked_graph(2, &[(0, 1)]);
        graph.nodes[0].outgoing.push(1);

        assert_eq!(
            graph.verify(),
            Err(ConsistencyError::IncidenceMismatch {
                node: "node_0000".to_string(),
                segment: "road_0001".to_string(),
            })
        );
    }

    #[test]
    fn segment_left_out_of_its_start_node_is_reported() {
        let mut graph = linked_graph(2, &[(0, 1)]);
        graph.nodes[2].outgoing.clear();

        assert_eq!(
            graph.verify(),
            Err(ConsistencyError::UnlistedSegment {
                segment: "road_0001".to_string(),
                node: "node_0002".to_string(),
            })
        );
    }

    #[test]
    fn segment_left_out_of_its_end_node_is_reported() {
        let mut graph = linked_graph(2, &[(0, 1)]);
        graph.nodes[1].incoming.clear();

        assert_eq!(
            graph.verify(),
            Err(ConsistencyError::UnlistedSegment {
                segment: "road_0000".to_string(),
                node: "node_0001".to_string(),
            })
        );
    }

    #[test]
    fn summary_counts_links_and_orphans() {
        let mut graph = linked_graph(4, &[(0, 1), (1, 2)]);
        graph.segments[0].is_entry = true;
        graph.segments[2].is_major = true;
        graph.nodes[5].is_boundary = true;

        let summary = graph.summary();
        assert_eq!(summary.total_successor_links, 2);
        assert_eq!(summary.total_predecessor_links, 2);
        assert_eq!(summary.orphan_segment_count, 1);
        assert_eq!(summary.entry_point_count, 1);
        assert_eq!(summary.major_segment_count, 1);
        assert_eq!(summary.boundary_node_count, 1);
        assert!((summary.avg_successors() - 0.5).abs() < 1e-12);
        assert!(graph.ends_at_boundary(&graph.segments[2]));
    }
}

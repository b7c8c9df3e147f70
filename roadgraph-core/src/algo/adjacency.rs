//! Directed successor/predecessor links between segments sharing a node

use log::info;
use rayon::prelude::*;

use super::cluster::Clustering;
use super::metrics::{SegmentMetrics, angle_difference};
use crate::{ConsistencyError, SegmentIdx};

/// Successor and predecessor lists, indexed by segment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    pub successors: Vec<Vec<SegmentIdx>>,
    pub predecessors: Vec<Vec<SegmentIdx>>,
}

impl Adjacency {
    pub fn successor_links(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    pub fn predecessor_links(&self) -> usize {
        self.predecessors.iter().map(Vec::len).sum()
    }
}

/// Link every segment to the segments leaving its end node whose start
/// heading is within `angle_threshold` degrees of its end heading.
///
/// Predecessors are derived as the exact inverse of the successor relation.
///
/// # Errors
///
/// Returns [`ConsistencyError::LinkCountMismatch`] if the derived predecessor
/// total differs from the successor total.
pub fn build_adjacency(
    clustering: &Clustering,
    metrics: &[SegmentMetrics],
    angle_threshold: f64,
) -> Result<Adjacency, ConsistencyError> {
    let successors: Vec<Vec<SegmentIdx>> = (0..metrics.len())
        .into_par_iter()
        .map(|segment| {
            let end_heading = metrics[segment].end_heading_deg;
            clustering.nodes[clustering.end_node[segment]]
                .outgoing
                .iter()
                .copied()
                .filter(|&candidate| candidate != segment)
                .filter(|&candidate| {
                    angle_difference(end_heading, metrics[candidate].start_heading_deg)
                        <= angle_threshold
                })
                .collect()
        })
        .collect();

    let mut predecessors = vec![Vec::new(); successors.len()];
    for (segment, links) in successors.iter().enumerate() {
        for &succ in links {
            predecessors[succ].push(segment);
        }
    }

    let adjacency = Adjacency {
        successors,
        predecessors,
    };
    let successor_links = adjacency.successor_links();
    let predecessor_links = adjacency.predecessor_links();
    info!("Created {successor_links} successor links");

    if successor_links != predecessor_links {
        return Err(ConsistencyError::LinkCountMismatch {
            successors: successor_links,
            predecessors: predecessor_links,
        });
    }
    info!("Verified {predecessor_links} predecessor links (inverse of successors)");
    Ok(adjacency)
}

#[cfg(test)]
mod tests {
    use geo::Coord;

    use super::*;
    use crate::model::Node;

    fn node(outgoing: Vec<SegmentIdx>, incoming: Vec<SegmentIdx>) -> Node {
        Node {
            id: String::new(),
            position: Coord { x: 0.0, y: 0.0 },
            outgoing,
            incoming,
            is_boundary: false,
        }
    }

    fn headings(start: f64, end: f64) -> SegmentMetrics {
        SegmentMetrics {
            start_heading_deg: start,
            end_heading_deg: end,
            ..SegmentMetrics::default()
        }
    }

    /// Segment 0 ends at node 1, where segments 1.. start
    fn junction(candidates: usize) -> Clustering {
        let outgoing: Vec<SegmentIdx> = (1..=candidates).collect();
        let mut nodes = vec![node(vec![0], vec![]), node(outgoing, vec![0])];
        for candidate in 1..=candidates {
            nodes.push(node(vec![], vec![candidate]));
        }
        Clustering {
            start_node: std::iter::once(0).chain(std::iter::repeat_n(1, candidates)).collect(),
            end_node: std::iter::once(1).chain(2..2 + candidates).collect(),
            nodes,
            merged_pairs: 0,
        }
    }

    #[test]
    fn angle_threshold_is_inclusive() {
        let clustering = junction(2);
        let metrics = vec![headings(0.0, 0.0), headings(60.0, 60.0), headings(60.01, 60.01)];

        let adjacency = build_adjacency(&clustering, &metrics, 60.0).unwrap();
        assert_eq!(adjacency.successors[0], vec![1]);
        assert_eq!(adjacency.predecessors[1], vec![0]);
        assert!(adjacency.predecessors[2].is_empty());
    }

    #[test]
    fn threshold_wraps_across_north() {
        let clustering = junction(1);
        let metrics = vec![headings(0.0, 340.0), headings(30.0, 30.0)];

        let adjacency = build_adjacency(&clustering, &metrics, 60.0).unwrap();
        assert_eq!(adjacency.successors[0], vec![1]);
    }

    #[test]
    fn segment_never_succeeds_itself() {
        // Loop road: starts and ends at the same node
        let clustering = Clustering {
            nodes: vec![node(vec![0], vec![0])],
            start_node: vec![0],
            end_node: vec![0],
            merged_pairs: 1,
        };
        let metrics = vec![headings(90.0, 90.0)];

        let adjacency = build_adjacency(&clustering, &metrics, 60.0).unwrap();
        assert!(adjacency.successors[0].is_empty());
        assert!(adjacency.predecessors[0].is_empty());
    }

    #[test]
    fn sharp_turns_leave_a_dead_end() {
        let clustering = junction(2);
        let metrics = vec![headings(0.0, 0.0), headings(90.0, 90.0), headings(180.0, 180.0)];

        let adjacency = build_adjacency(&clustering, &metrics, 60.0).unwrap();
        assert!(adjacency.successors[0].is_empty());
        assert_eq!(adjacency.successor_links(), 0);
    }

    #[test]
    fn predecessors_are_the_inverse_of_successors() {
        let clustering = junction(3);
        let metrics = vec![
            headings(0.0, 10.0),
            headings(0.0, 0.0),
            headings(50.0, 0.0),
            headings(330.0, 0.0),
        ];

        let adjacency = build_adjacency(&clustering, &metrics, 60.0).unwrap();
        for (segment, links) in adjacency.successors.iter().enumerate() {
            for &succ in links {
                assert!(adjacency.predecessors[succ].contains(&segment));
            }
        }
        for (segment, links) in adjacency.predecessors.iter().enumerate() {
            for &pred in links {
                assert!(adjacency.successors[pred].contains(&segment));
            }
        }
        assert_eq!(adjacency.successors[0], vec![1, 2, 3]);
        assert_eq!(adjacency.successor_links(), adjacency.predecessor_links());
    }
}

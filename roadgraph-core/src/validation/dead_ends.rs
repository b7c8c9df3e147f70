use crate::RoadGraph;

/// Segments without successors, split by where they end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeadEnds {
    /// Ending away from the data boundary; a modelling defect
    pub interior: usize,
    /// Ending at a boundary node, where the data simply stops
    pub boundary: usize,
}

impl DeadEnds {
    pub fn total(&self) -> usize {
        self.interior + self.boundary
    }
}

pub fn count_dead_ends(graph: &RoadGraph) -> DeadEnds {
    graph
        .segments
        .iter()
        .filter(|segment| segment.is_dead_end())
        .fold(DeadEnds::default(), |mut acc, segment| {
            if graph.ends_at_boundary(segment) {
                acc.boundary += 1;
            } else {
                acc.interior += 1;
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph::test_support::linked_graph;

    #[test]
    fn dead_ends_are_split_by_end_node() {
        let mut graph = linked_graph(4, &[(0, 1), (1, 2)]);
        let end = graph.segments[3].end_node;
        graph.nodes[end].is_boundary = true;

        let dead_ends = count_dead_ends(&graph);
        assert_eq!(dead_ends, DeadEnds { interior: 1, boundary: 1 });
        assert_eq!(dead_ends.total(), 2);
    }
}

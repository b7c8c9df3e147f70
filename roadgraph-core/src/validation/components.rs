use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::RoadGraph;

/// Sizes of the undirected connected components, largest first.
///
/// Successor and predecessor links are both followed, so two segments are in
/// the same component whenever some chain of links joins them, ignoring
/// direction.
pub fn component_sizes(graph: &RoadGraph) -> Vec<usize> {
    let count = graph.segment_count();
    let mut visited = FixedBitSet::with_capacity(count);
    let mut queue = VecDeque::new();
    let mut sizes = Vec::new();

    for seed in 0..count {
        if visited.put(seed) {
            continue;
        }
        queue.push_back(seed);
        let mut size = 0;

        while let Some(current) = queue.pop_front() {
            size += 1;
            let segment = &graph.segments[current];
            for &next in segment.successors.iter().chain(&segment.predecessors) {
                if !visited.put(next) {
                    queue.push_back(next);
                }
            }
        }
        sizes.push(size);
    }

    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes
}

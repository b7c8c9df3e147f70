use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::RoadGraph;

/// Number of segments reachable from any entry segment along successor links.
///
/// Entry segments count as reached themselves.
pub fn reachable_from_entries(graph: &RoadGraph) -> usize {
    let mut reached = FixedBitSet::with_capacity(graph.segment_count());
    let mut queue: VecDeque<usize> = graph
        .segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| segment.is_entry)
        .map(|(idx, _)| idx)
        .collect();

    while let Some(current) = queue.pop_front() {
        if reached.put(current) {
            continue;
        }
        for &next in &graph.segments[current].successors {
            if !reached.contains(next) {
                queue.push_back(next);
            }
        }
    }

    reached.count_ones(..)
}

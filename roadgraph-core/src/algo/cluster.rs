//! Spatial clustering of segment endpoints into intersection nodes.
//!
//! Two endpoints belong to the same node when they are closer than the snap
//! radius, and the relation is closed transitively: a chain of close
//! endpoints collapses into a single node even if its ends are far apart.
//! Candidate pairs come from an R-tree query instead of a full pairwise scan;
//! the pairs found are exactly the pairwise ones, so membership is unchanged.

use geo::Coord;
use hashbrown::HashMap;
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use rayon::prelude::*;
use rstar::{RTree, primitives::GeomWithData};

use crate::model::{DataBounds, Node, RawSegment};
use crate::{NodeIdx, SegmentIdx};

/// Segment start or end, only alive while clustering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    pub position: Coord<f64>,
    pub segment: SegmentIdx,
    pub is_start: bool,
}

/// Nodes plus the node assignment of every segment endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub nodes: Vec<Node>,
    /// Node of each segment's first point, indexed by segment
    pub start_node: Vec<NodeIdx>,
    /// Node of each segment's last point, indexed by segment
    pub end_node: Vec<NodeIdx>,
    /// Number of endpoint pairs found within the snap radius
    pub merged_pairs: usize,
}

type IndexedEndpoint = GeomWithData<[f64; 2], usize>;

/// Two endpoints per segment, start first: endpoint `2i` starts segment `i`
pub fn collect_endpoints(segments: &[RawSegment]) -> Vec<Endpoint> {
    segments
        .iter()
        .enumerate()
        .flat_map(|(segment, raw)| {
            [
                Endpoint {
                    position: raw.start(),
                    segment,
                    is_start: true,
                },
                Endpoint {
                    position: raw.end(),
                    segment,
                    is_start: false,
                },
            ]
        })
        .collect()
}

pub(crate) fn build_rtree(endpoints: &[Endpoint]) -> RTree<IndexedEndpoint> {
    let items = endpoints
        .iter()
        .enumerate()
        .map(|(idx, endpoint)| IndexedEndpoint::new([endpoint.position.x, endpoint.position.y], idx))
        .collect();
    RTree::bulk_load(items)
}

fn within_snap_radius(a: Coord<f64>, b: Coord<f64>, snap_radius: f64) -> bool {
    let dx = a.x - b.x;
    let dz = a.y - b.y;
    (dx * dx + dz * dz).sqrt() < snap_radius
}

/// All endpoint pairs `(i, j)`, `i < j`, strictly closer than `snap_radius`
pub fn snap_pairs(endpoints: &[Endpoint], snap_radius: f64) -> Vec<(usize, usize)> {
    let tree = build_rtree(endpoints);
    // The tree compares squared distances; query a hair wider and let the
    // exact predicate decide.
    let query_radius = snap_radius * (1.0 + 1e-9);
    let query_radius_2 = query_radius * query_radius;

    (0..endpoints.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let position = endpoints[i].position;
            tree.locate_within_distance([position.x, position.y], query_radius_2)
                .filter(|candidate| candidate.data > i)
                .filter(|candidate| {
                    within_snap_radius(position, endpoints[candidate.data].position, snap_radius)
                })
                .map(|candidate| (i, candidate.data))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Cluster the endpoints of `segments` into nodes.
///
/// Every segment must have at least two points. Nodes are numbered in the
/// order of their first endpoint; their `outgoing`/`incoming` lists follow
/// segment order. Boundary flags are evaluated on the node centroid against
/// `bounds`.
pub fn cluster_endpoints(segments: &[RawSegment], bounds: &DataBounds, snap_radius: f64) -> Clustering {
    let endpoints = collect_endpoints(segments);
    info!(
        "Collected {} endpoints from {} segments",
        endpoints.len(),
        segments.len()
    );

    let pairs = snap_pairs(&endpoints, snap_radius);
    let mut sets = UnionFind::<usize>::new(endpoints.len());
    for &(a, b) in &pairs {
        sets.union(a, b);
    }
    info!("Merged {} endpoint pairs", pairs.len());

    let groups = group_by_root(&sets.into_labeling());
    let clustering = build_nodes(segments.len(), &endpoints, &groups, bounds, pairs.len());

    info!(
        "Created {} nodes from {} endpoints",
        clustering.nodes.len(),
        endpoints.len()
    );
    info!(
        "{} boundary nodes",
        clustering.nodes.iter().filter(|n| n.is_boundary).count()
    );
    clustering
}

/// Endpoint indices grouped by set representative, groups ordered by their
/// first member
fn group_by_root(labels: &[usize]) -> Vec<Vec<usize>> {
    let mut group_of_root: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (endpoint, &root) in labels.iter().enumerate() {
        let group = *group_of_root.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[group].push(endpoint);
    }
    groups
}

#[allow(clippy::cast_precision_loss)]
fn build_nodes(
    segment_count: usize,
    endpoints: &[Endpoint],
    groups: &[Vec<usize>],
    bounds: &DataBounds,
    merged_pairs: usize,
) -> Clustering {
    let mut start_node = vec![0; segment_count];
    let mut end_node = vec![0; segment_count];

    let nodes = groups
        .iter()
        .enumerate()
        .map(|(node_idx, members)| {
            let count = members.len() as f64;
            let (sum_x, sum_z) = members.iter().fold((0.0, 0.0), |(x, z), &m| {
                (x + endpoints[m].position.x, z + endpoints[m].position.y)
            });
            let position = Coord {
                x: sum_x / count,
                y: sum_z / count,
            };

            let mut node = Node {
                id: format!("node_{node_idx:04}"),
                position,
                outgoing: Vec::new(),
                incoming: Vec::new(),
                is_boundary: bounds.is_near_boundary(position),
            };

            for &member in members {
                let endpoint = endpoints[member];
                if endpoint.is_start {
                    start_node[endpoint.segment] = node_idx;
                    node.outgoing.push(endpoint.segment);
                } else {
                    end_node[endpoint.segment] = node_idx;
                    node.incoming.push(endpoint.segment);
                }
            }

            if members.len() > 1 {
                debug!("{} joins {} endpoints", node.id, members.len());
            }
            node
        })
        .collect();

    Clustering {
        nodes,
        start_node,
        end_node,
        merged_pairs,
    }
}

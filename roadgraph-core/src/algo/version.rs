//! Content fingerprint of a segment set.
//!
//! Lets downstream caches notice changed road geometry without comparing full
//! payloads. Only segment ids and point counts are hashed.

use itertools::Itertools;
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest
pub const GRAPH_VERSION_LEN: usize = 12;

/// Fingerprint of `(segment id, point count)` pairs, independent of order
pub fn graph_version<'a, I>(segments: I) -> String
where
    I: IntoIterator<Item = (&'a str, usize)>,
{
    let payload = segments
        .into_iter()
        .sorted()
        .map(|(id, points)| format!("{id}:{points}"))
        .join("|");

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..GRAPH_VERSION_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_does_not_matter() {
        let a = graph_version([("road_0001", 4), ("road_0002", 2), ("road_0003", 9)]);
        let b = graph_version([("road_0003", 9), ("road_0001", 4), ("road_0002", 2)]);

        assert_eq!(a, b);
        assert_eq!(a.len(), GRAPH_VERSION_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn point_count_changes_the_version() {
        let a = graph_version([("road_0001", 4), ("road_0002", 2)]);
        let b = graph_version([("road_0001", 4), ("road_0002", 3)]);
        assert_ne!(a, b);
    }

    #[test]
    fn ids_change_the_version() {
        let a = graph_version([("road_0001", 4)]);
        let b = graph_version([("road_0009", 4)]);
        assert_ne!(a, b);
    }
}

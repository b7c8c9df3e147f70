use serde::{Deserialize, Serialize};

use crate::Error;

/// Pass thresholds, all expressed as fractions of the segment count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationThresholds {
    /// Minimum share of segments in the largest undirected component
    pub min_largest_component: f64,
    /// Minimum share of segments reachable forward from entry segments
    pub min_entry_reachability: f64,
    /// Maximum share of dead ends away from the data boundary
    pub max_interior_dead_end: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            min_largest_component: 0.90,
            min_entry_reachability: 0.85,
            max_interior_dead_end: 0.05,
        }
    }
}

impl ValidationThresholds {
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] when a threshold is outside `[0, 1]`
    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("min_largest_component", self.min_largest_component),
            ("min_entry_reachability", self.min_entry_reachability),
            ("max_interior_dead_end", self.max_interior_dead_end),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidData(format!(
                    "{name} must be a fraction within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

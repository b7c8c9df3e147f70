use serde::{Deserialize, Serialize};

use crate::Error;

/// Tunables of the graph building pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphBuildConfig {
    /// Endpoints strictly closer than this are snapped into one node
    pub snap_radius: f64,
    /// Largest turn, in degrees, that still links two segments
    pub angle_threshold_deg: f64,
    /// A segment whose peak spawn rate exceeds this is major
    pub spawn_rate_threshold: f64,
    /// A segment whose speed ratio exceeds this is major
    pub speed_ratio_threshold: f64,
    /// A segment longer than this (meters) is major
    pub length_threshold: f64,
    /// Distance from the data extent within which nodes are boundary nodes
    pub boundary_buffer: f64,
}

impl Default for GraphBuildConfig {
    fn default() -> Self {
        Self {
            snap_radius: 10.0,
            angle_threshold_deg: 60.0,
            spawn_rate_threshold: 0.30,
            speed_ratio_threshold: 0.50,
            length_threshold: 150.0,
            boundary_buffer: 50.0,
        }
    }
}

impl GraphBuildConfig {
    /// Reject values the pipeline cannot work with
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] naming the offending parameter
    pub fn validate(&self) -> Result<(), Error> {
        if !self.snap_radius.is_finite() || self.snap_radius <= 0.0 {
            return Err(Error::InvalidData(format!(
                "snap_radius must be a positive number, got {}",
                self.snap_radius
            )));
        }

        if !(self.angle_threshold_deg > 0.0 && self.angle_threshold_deg <= 180.0) {
            return Err(Error::InvalidData(format!(
                "angle_threshold_deg must be within (0, 180], got {}",
                self.angle_threshold_deg
            )));
        }

        if !self.boundary_buffer.is_finite() || self.boundary_buffer < 0.0 {
            return Err(Error::InvalidData(format!(
                "boundary_buffer must be a non-negative number, got {}",
                self.boundary_buffer
            )));
        }

        for (name, value) in [
            ("spawn_rate_threshold", self.spawn_rate_threshold),
            ("speed_ratio_threshold", self.speed_ratio_threshold),
            ("length_threshold", self.length_threshold),
        ] {
            if value.is_nan() {
                return Err(Error::InvalidData(format!("{name} must be a number")));
            }
        }

        Ok(())
    }
}

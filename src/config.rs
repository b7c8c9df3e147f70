//! Pipeline configuration: TOML file plus command-line overrides

use std::path::Path;

use roadgraph_core::{GraphBuildConfig, ValidationThresholds};
use serde::{Deserialize, Serialize};

use crate::cli::{BuildOverrides, ThresholdOverrides};
use crate::error::CliError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub build: GraphBuildConfig,
    pub validation: ValidationThresholds,
}

impl PipelineConfig {
    /// Defaults, or the contents of `path` on top of the defaults
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| CliError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn apply_build(&mut self, overrides: &BuildOverrides) {
        let build = &mut self.build;
        set(&mut build.snap_radius, overrides.snap_radius);
        set(&mut build.angle_threshold_deg, overrides.angle_threshold);
        set(&mut build.spawn_rate_threshold, overrides.spawn_rate_threshold);
        set(&mut build.speed_ratio_threshold, overrides.speed_ratio_threshold);
        set(&mut build.length_threshold, overrides.length_threshold);
        set(&mut build.boundary_buffer, overrides.boundary_buffer);
    }

    pub fn apply_thresholds(&mut self, overrides: &ThresholdOverrides) {
        let validation = &mut self.validation;
        set(
            &mut validation.min_largest_component,
            overrides.min_largest_component,
        );
        set(
            &mut validation.min_entry_reachability,
            overrides.min_entry_reachability,
        );
        set(
            &mut validation.max_interior_dead_end,
            overrides.max_interior_dead_end,
        );
    }

    pub fn validate(&self) -> Result<(), CliError> {
        self.build.validate()?;
        self.validation.validate()?;
        Ok(())
    }
}

fn set(target: &mut f64, value: Option<f64>) {
    if let Some(value) = value {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_sit_on_top_of_defaults() {
        let config: PipelineConfig = toml::from_str(
            r"
            [build]
            snap_radius = 12.5

            [validation]
            max_interior_dead_end = 0.1
            ",
        )
        .unwrap();

        assert!((config.build.snap_radius - 12.5).abs() < f64::EPSILON);
        assert!((config.build.angle_threshold_deg - 60.0).abs() < f64::EPSILON);
        assert!((config.validation.max_interior_dead_end - 0.1).abs() < f64::EPSILON);
        assert!((config.validation.min_largest_component - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_tables_are_rejected() {
        assert!(toml::from_str::<PipelineConfig>("[render]\nscale = 2").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let mut config = PipelineConfig::default();
        config.apply_build(&BuildOverrides {
            snap_radius: Some(4.0),
            ..BuildOverrides::default()
        });
        config.apply_thresholds(&ThresholdOverrides {
            min_entry_reachability: Some(0.5),
            ..ThresholdOverrides::default()
        });

        assert!((config.build.snap_radius - 4.0).abs() < f64::EPSILON);
        assert!((config.build.boundary_buffer - 50.0).abs() < f64::EPSILON);
        assert!((config.validation.min_entry_reachability - 0.5).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_threshold_fails_validation() {
        let mut config = PipelineConfig::default();
        config.validation.min_largest_component = 90.0;
        assert!(config.validate().is_err());
    }
}

//! Submap configuration.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigValidationError, defaults};
use crate::grid::{GridConfig, ProbabilityInserterConfig, TsdfInserterConfig};

/// Configuration for submap creation and lifecycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmapConfig {
    /// Insertions into the older live submap before it is finished and
    /// replaced.
    /// Default: 90
    #[serde(default = "defaults::num_range_data")]
    pub num_range_data: usize,

    /// Grid created for each submap.
    #[serde(default)]
    pub grid: GridConfig,

    /// Used when `grid.grid_type` is `probability`.
    #[serde(default)]
    pub probability_inserter: ProbabilityInserterConfig,

    /// Used when `grid.grid_type` is `tsdf`.
    #[serde(default)]
    pub tsdf_inserter: TsdfInserterConfig,
}

impl Default for SubmapConfig {
    fn default() -> Self {
        Self {
            num_range_data: defaults::num_range_data(),
            grid: GridConfig::default(),
            probability_inserter: ProbabilityInserterConfig::default(),
            tsdf_inserter: TsdfInserterConfig::default(),
        }
    }
}

impl SubmapConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.num_range_data == 0 {
            return Err(ConfigValidationError::invalid(
                "num_range_data must be > 0",
            ));
        }
        self.grid.validate()?;
        self.probability_inserter.validate()?;
        self.tsdf_inserter.validate()?;
        Ok(())
    }

    /// Side length of a fresh submap grid in meters.
    #[inline]
    pub fn initial_extent(&self) -> f32 {
        self.grid.initial_size as f32 * self.grid.resolution
    }
}

//! Configuration types for grids and range data inserters.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigValidationError, defaults};
use crate::core::WorldPoint;

use super::limits::MapLimits;
use super::storage::GridType;

/// Grid configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Meters per cell (e.g., 0.05 = 5cm cells)
    #[serde(default = "defaults::resolution")]
    pub resolution: f32,

    /// Initial cells per side. Grids grow on demand.
    #[serde(default = "defaults::initial_size")]
    pub initial_size: usize,

    /// Grid kind created for each submap
    #[serde(default = "defaults::grid_type")]
    pub grid_type: GridType,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution: defaults::resolution(),
            initial_size: defaults::initial_size(),
            grid_type: defaults::grid_type(),
        }
    }
}

impl GridConfig {
    /// Square limits of `initial_size` cells centered on `origin`.
    pub fn initial_limits(&self, origin: WorldPoint) -> MapLimits {
        MapLimits::centered(self.resolution, origin, self.initial_size)
    }

    /// Check ranges.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.resolution <= 0.0 {
            return Err(ConfigValidationError::invalid("resolution must be > 0"));
        }
        if self.initial_size == 0 {
            return Err(ConfigValidationError::invalid("initial_size must be > 0"));
        }
        Ok(())
    }
}

/// Probability grid inserter configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityInserterConfig {
    /// Occupancy probability applied at each return
    #[serde(default = "defaults::hit_probability")]
    pub hit_probability: f32,

    /// Occupancy probability applied along each free-space ray
    #[serde(default = "defaults::miss_probability")]
    pub miss_probability: f32,

    /// Trace free space from the origin to returns and misses
    #[serde(default = "defaults::enabled")]
    pub insert_free_space: bool,
}

impl Default for ProbabilityInserterConfig {
    fn default() -> Self {
        Self {
            hit_probability: defaults::hit_probability(),
            miss_probability: defaults::miss_probability(),
            insert_free_space: defaults::enabled(),
        }
    }
}

impl ProbabilityInserterConfig {
    /// Check ranges.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.hit_probability <= 0.5 || self.hit_probability >= 1.0 {
            return Err(ConfigValidationError::invalid(
                "hit_probability must be in (0.5, 1.0)",
            ));
        }
        if self.miss_probability <= 0.0 || self.miss_probability >= 0.5 {
            return Err(ConfigValidationError::invalid(
                "miss_probability must be in (0.0, 0.5)",
            ));
        }
        Ok(())
    }
}

/// TSDF grid inserter configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TsdfInserterConfig {
    /// Distance behind and in front of a return that is updated (meters)
    #[serde(default = "defaults::truncation_distance")]
    pub truncation_distance: f32,

    /// Upper bound for accumulated cell weight
    #[serde(default = "defaults::max_weight")]
    pub max_weight: f32,

    /// Weight of a single observation
    #[serde(default = "defaults::update_weight")]
    pub update_weight: f32,
}

impl Default for TsdfInserterConfig {
    fn default() -> Self {
        Self {
            truncation_distance: defaults::truncation_distance(),
            max_weight: defaults::max_weight(),
            update_weight: defaults::update_weight(),
        }
    }
}

impl TsdfInserterConfig {
    /// Check ranges.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.truncation_distance <= 0.0 {
            return Err(ConfigValidationError::invalid(
                "truncation_distance must be > 0",
            ));
        }
        if self.max_weight <= 0.0 {
            return Err(ConfigValidationError::invalid("max_weight must be > 0"));
        }
        if self.update_weight <= 0.0 || self.update_weight > self.max_weight {
            return Err(ConfigValidationError::invalid(
                "update_weight must be in (0, max_weight]",
            ));
        }
        Ok(())
    }
}

//! Local mapping mode: sensor batches in, submaps out.
//!
//! # Pipeline
//!
//! ```text
//! TimedPointCloud (sensor a)   TimedPointCloud (sensor b)
//!          │                            │
//!          └────────────┬───────────────┘
//!                       ▼
//!             ┌───────────────────┐
//!             │ RangeDataCollator │  merge one window, sort by time
//!             └─────────┬─────────┘
//!                       ▼
//!             ┌───────────────────┐
//!             │   Range Filter    │  returns │ misses │ dropped
//!             └─────────┬─────────┘
//!                       ▼
//!             ┌───────────────────┐
//!             │   ActiveSubmaps   │  insert into old + new
//!             └───────────────────┘
//! ```
//!
//! # Range Filter
//!
//! Each point is measured from the origin of the sensor that produced it:
//! - `d < min_range`, NaN or infinite: dropped
//! - `min_range <= d <= max_range`: return
//! - `d > max_range`: miss, shortened to `missing_data_ray_length`

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigValidationError, defaults};
use crate::core::{MergedRangeData, RangeData, TimedPointCloud, WorldPoint};
use crate::grid::ValueConversionTables;
use crate::sensor::RangeDataCollator;
use crate::submap::{ActiveSubmaps, Submap, SubmapConfig};

/// Configuration for the local map builder.
///
/// # Example
///
/// ```rust
/// use kshetra::modes::LocalMapBuilderConfig;
///
/// let config = LocalMapBuilderConfig {
///     max_range: 8.0,
///     sensor_ids: vec!["front".into(), "rear".into()],
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalMapBuilderConfig {
    /// Points closer than this to their sensor are dropped (meters).
    /// Default: 0.0
    #[serde(default = "defaults::min_range")]
    pub min_range: f32,

    /// Points further than this become misses (meters).
    /// Default: 30.0
    #[serde(default = "defaults::max_range")]
    pub max_range: f32,

    /// Length of the free-space ray inserted for a miss (meters).
    /// Default: 5.0
    #[serde(default = "defaults::missing_data_ray_length")]
    pub missing_data_ray_length: f32,

    /// Sensors whose batches are merged before insertion.
    /// Default: ["scan"]
    #[serde(default = "defaults::sensor_ids")]
    pub sensor_ids: Vec<String>,

    /// Submap settings.
    #[serde(default)]
    pub submaps: SubmapConfig,
}

impl Default for LocalMapBuilderConfig {
    fn default() -> Self {
        Self {
            min_range: defaults::min_range(),
            max_range: defaults::max_range(),
            missing_data_ray_length: defaults::missing_data_ray_length(),
            sensor_ids: defaults::sensor_ids(),
            submaps: SubmapConfig::default(),
        }
    }
}

impl LocalMapBuilderConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.min_range < 0.0 {
            return Err(ConfigValidationError::invalid("min_range must be >= 0"));
        }
        if self.max_range <= self.min_range {
            return Err(ConfigValidationError::invalid(
                "max_range must be > min_range",
            ));
        }
        if self.missing_data_ray_length <= 0.0 {
            return Err(ConfigValidationError::invalid(
                "missing_data_ray_length must be > 0",
            ));
        }
        if self.sensor_ids.is_empty() {
            return Err(ConfigValidationError::invalid(
                "sensor_ids must not be empty",
            ));
        }
        self.submaps.validate()
    }
}

/// Output of one successful insertion.
#[derive(Clone, Debug)]
pub struct InsertionResult {
    /// Window end of the merged batch (microseconds).
    pub timestamp_us: u64,
    /// Filtered data that went into the submaps.
    pub range_data: RangeData,
    /// Live submaps after the insertion, oldest first.
    pub submaps: Vec<Arc<Submap>>,
    /// Submap finished by this insertion.
    pub finished: Option<Arc<Submap>>,
}

/// Collator, range filter and active submaps wired together.
#[derive(Debug)]
pub struct LocalMapBuilder {
    config: LocalMapBuilderConfig,
    collator: RangeDataCollator,
    active_submaps: ActiveSubmaps,
}

impl LocalMapBuilder {
    /// Create a builder with no submaps yet.
    ///
    /// # Panics
    ///
    /// If `config.sensor_ids` is empty.
    pub fn new(config: LocalMapBuilderConfig, tables: Arc<ValueConversionTables>) -> Self {
        let collator = RangeDataCollator::new(config.sensor_ids.iter().cloned());
        let active_submaps = ActiveSubmaps::new(config.submaps.clone(), tables);
        Self {
            config,
            collator,
            active_submaps,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &LocalMapBuilderConfig {
        &self.config
    }

    /// Live submaps, oldest first.
    pub fn submaps(&self) -> &[Arc<Submap>] {
        self.active_submaps.submaps()
    }

    /// The submap manager.
    pub fn active_submaps(&self) -> &ActiveSubmaps {
        &self.active_submaps
    }

    /// Feed one sensor batch.
    ///
    /// Returns `None` while the collator waits for other sensors or when no
    /// point survives the range filter.
    ///
    /// # Panics
    ///
    /// If `sensor_id` is not one of the configured sensors.
    pub fn add_range_data(
        &mut self,
        sensor_id: &str,
        cloud: TimedPointCloud,
    ) -> Option<InsertionResult> {
        let merged = self.collator.add_range_data(sensor_id, cloud);
        if merged.is_empty() {
            return None;
        }

        let range_data = self.filter_range_data(&merged);
        if range_data.returns.is_empty() && range_data.misses.is_empty() {
            log::debug!(
                "No points in range for batch at {} us, skipping",
                merged.timestamp_us
            );
            return None;
        }

        let result = self.active_submaps.insert_range_data(&range_data);
        Some(InsertionResult {
            timestamp_us: merged.timestamp_us,
            range_data,
            submaps: result.submaps,
            finished: result.finished,
        })
    }

    fn filter_range_data(&self, merged: &MergedRangeData) -> RangeData {
        let sum = merged
            .origins
            .iter()
            .fold(WorldPoint::ZERO, |sum, origin| sum + *origin);
        let origin = sum * (1.0 / merged.origins.len() as f32);

        let mut range_data = RangeData::new(origin, Vec::new());
        for measurement in &merged.measurements {
            let sensor_origin = merged.origin_of(measurement);
            let delta = measurement.point.position - sensor_origin;
            let range = delta.norm();
            if !range.is_finite() || range < self.config.min_range {
                continue;
            }
            if range <= self.config.max_range {
                range_data.returns.push(measurement.point.position);
            } else {
                let scale = self.config.missing_data_ray_length / range;
                range_data.misses.push(sensor_origin + delta * scale);
            }
        }
        range_data
    }
}

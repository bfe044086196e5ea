//! Configuration loading for kshetra.
//!
//! Loads all configuration from a single YAML file with Cartographer-style
//! defaults. Every field is optional.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kshetra::config::MapperConfig;
//!
//! // Load from default path (configs/kshetra.yaml)
//! let config = MapperConfig::load_default()?;
//!
//! // Or use built-in defaults (no file needed)
//! let config = MapperConfig::default();
//! ```
//!
//! ## Example YAML
//!
//! ```yaml
//! local_map:
//!   min_range: 0.15
//!   max_range: 8.0              # beyond this: miss
//!   missing_data_ray_length: 5.0
//!   sensor_ids: [scan]
//!   submaps:
//!     num_range_data: 90        # batches before the old submap is finished
//!     grid:
//!       resolution: 0.05        # 5cm cells
//!       initial_size: 100       # grows on demand
//!       grid_type: probability  # or tsdf
//!     probability_inserter:
//!       hit_probability: 0.55
//!       miss_probability: 0.49
//!       insert_free_space: true
//!     tsdf_inserter:
//!       truncation_distance: 0.3
//!       max_weight: 10.0
//!       update_weight: 1.0
//! ```

pub(crate) mod defaults;
mod error;
mod mapper;

pub use error::{ConfigLoadError, ConfigValidationError};
pub use mapper::{DEFAULT_CONFIG_PATH, MapperConfig};

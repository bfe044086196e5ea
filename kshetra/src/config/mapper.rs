//! Top-level MapperConfig and loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::modes::LocalMapBuilderConfig;

use super::error::ConfigLoadError;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "configs/kshetra.yaml";

/// Full kshetra configuration loaded from YAML
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct MapperConfig {
    /// Sensor merging, range filtering and submaps
    #[serde(default)]
    pub local_map: LocalMapBuilderConfig,
}

impl MapperConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/kshetra.yaml)
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("{DEFAULT_CONFIG_PATH} not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse from YAML string and validate
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        self.local_map.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridType;

    #[test]
    fn test_default_config() {
        let config = MapperConfig::default();
        assert_eq!(config.local_map.submaps.grid.resolution, 0.05);
        assert_eq!(config.local_map.submaps.num_range_data, 90);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = MapperConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed = MapperConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
local_map:
  max_range: 8.0
  sensor_ids: [front, rear]
  submaps:
    num_range_data: 30
    grid:
      resolution: 0.025
      grid_type: tsdf
"#;
        let config = MapperConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.local_map.max_range, 8.0);
        assert_eq!(config.local_map.sensor_ids, vec!["front", "rear"]);
        assert_eq!(config.local_map.submaps.num_range_data, 30);
        assert_eq!(config.local_map.submaps.grid.grid_type, GridType::Tsdf);
        assert_eq!(config.local_map.submaps.grid.initial_size, 100);
        assert_eq!(config.local_map.missing_data_ray_length, 5.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let yaml = "local_map:\n  submaps:\n    probability_inserter:\n      hit_probability: 0.3\n";
        let err = MapperConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Invalid(_)));
        assert!(err.to_string().contains("hit_probability"));
    }

    #[test]
    fn test_parse_error() {
        let err = MapperConfig::from_yaml("local_map: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse(_)));
    }
}

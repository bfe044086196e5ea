//! Configuration errors.

use thiserror::Error;

/// Config load error
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid YAML for the expected structure
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Config parsed but holds out-of-range values
    #[error(transparent)]
    Invalid(#[from] ConfigValidationError),
}

/// Config validation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// A field is outside its allowed range
    #[error("Invalid config: {0}")]
    InvalidValue(String),
}

impl ConfigValidationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ConfigValidationError::InvalidValue(msg.into())
    }
}

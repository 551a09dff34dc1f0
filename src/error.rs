//! Configuration errors
//!
//! Every error here is raised before the first step runs. The step function
//! itself never fails: out-of-range values are clamped in place.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Invalid price generator {generator}: {reason}")]
    InvalidGenerator { generator: &'static str, reason: String },

    #[error("Invalid seed state {field}: {reason}")]
    InvalidSeedState { field: &'static str, reason: String },

    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),
}

impl ConfigError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn generator(generator: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidGenerator {
            generator,
            reason: reason.into(),
        }
    }

    pub(crate) fn seed_state(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSeedState {
            field,
            reason: reason.into(),
        }
    }
}

//! Core error types for the FraudGuard SDK

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Unrecognised environment name
    #[error("Invalid environment '{0}': expected production, testing or development")]
    Environment(String),

    /// Config file missing or not a JSON object
    #[error("Invalid config file {path:?}: {reason}")]
    Format { path: PathBuf, reason: String },

    /// A value violates a document invariant
    #[error("Invalid value for '{path}': {reason}")]
    InvalidValue { path: String, reason: String },

    /// Dot-path lookup could not be resolved
    #[error("Value not found: {0}")]
    ValueNotFound(String),

    /// Config file could not be written
    #[error("Failed to write config file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ConfigError::Format {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Supervisor-related errors
///
/// Service operations report failure through their boolean results; only
/// policy changes surface errors.
#[derive(Error, Debug)]
pub enum SupervisorError {
    /// Max run time string could not be parsed
    #[error("Invalid max run time '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },
}

//! API client error types

use fg_core::ConfigError;
use thiserror::Error;

/// Errors returned by the API clients
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Base URL or request path is not a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Caller-supplied value cannot be used in a request
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body is not the expected JSON
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`] errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

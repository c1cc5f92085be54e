//! Deployment environments

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Platform environment the SDK talks to
///
/// The environment name prefixes every environment-scoped key, so
/// `urls.api_url` in `Testing` resolves `testing.urls.api_url`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Testing,
    Development,
}

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Production,
        Environment::Testing,
        Environment::Development,
    ];

    /// Document key for this environment
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Testing => "testing",
            Environment::Development => "development",
        }
    }

    /// Prefix a relative key with this environment
    pub fn scoped(&self, path: &str) -> String {
        format!("{}.{}", self.as_str(), path)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|env| env.as_str() == s)
            .ok_or_else(|| ConfigError::Environment(s.to_string()))
    }
}

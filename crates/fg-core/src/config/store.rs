//! Layered configuration store

use std::path::PathBuf;

use serde_json::{json, Map, Value};

use super::document::{deep_merge, get_path, path_exists, set_path};
use super::invariants::{
    apply_static_mappings, ensure_static_mappings, validate_required_fields,
    validate_static_mappings,
};
use super::{load_document, Environment};
use crate::error::ConfigError;

/// Packaged base document
const DEFAULT_CONFIG: &str = include_str!("../../assets/default_config.json");

/// Default `store_id` runtime value
const DEFAULT_STORE_ID: u64 = 1;

/// Runtime identifier used when the caller does not supply one
pub fn default_runtime_version() -> String {
    format!("fraudguard-rust/{}", env!("CARGO_PKG_VERSION"))
}

/// Inputs to [`ConfigStore::init`]
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Environment name; falls back to the document's `default_environment`
    pub environment: Option<String>,
    /// Custom override document
    pub custom_file: Option<PathBuf>,
    /// Base document; the packaged default when unset
    pub base_file: Option<PathBuf>,
    /// Host platform version, stored as `platform_version`
    pub platform_version: Option<String>,
    /// Runtime version, stored as `runtime_version`
    pub runtime_version: Option<String>,
}

impl InitOptions {
    pub fn environment(mut self, env: impl Into<String>) -> Self {
        self.environment = Some(env.into());
        self
    }

    pub fn custom_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_file = Some(path.into());
        self
    }

    pub fn base_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_file = Some(path.into());
        self
    }

    pub fn platform_version(mut self, version: impl Into<String>) -> Self {
        self.platform_version = Some(version.into());
        self
    }

    pub fn runtime_version(mut self, version: impl Into<String>) -> Self {
        self.runtime_version = Some(version.into());
        self
    }
}

/// Environment-scoped, dot-path addressable configuration
///
/// Built once from runtime defaults, a base document and an optional custom
/// document (later layers win). Static URL mappings can never be changed,
/// neither by a loaded document nor through [`ConfigStore::set_value`].
///
/// ```
/// use fg_core::config::{ConfigStore, InitOptions};
///
/// let mut store = ConfigStore::new();
/// store.init(InitOptions::default().environment("testing")).unwrap();
/// assert_eq!(
///     store.get_env_str("urls.api_url").unwrap(),
///     "https://api.sandbox.fraudguard.io/v2"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ConfigStore {
    document: Value,
    environment: Environment,
    initialized: bool,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Create an empty, uninitialized store
    pub fn new() -> Self {
        Self {
            document: Value::Object(Map::new()),
            environment: Environment::default(),
            initialized: false,
        }
    }

    /// Create and initialize a store in one step
    pub fn load(options: InitOptions) -> Result<Self, ConfigError> {
        let mut store = Self::new();
        store.init(options)?;
        Ok(store)
    }

    /// Load, merge and validate the configuration layers
    ///
    /// Does nothing if the store is already initialized; call
    /// [`ConfigStore::reset`] first to load again.
    pub fn init(&mut self, options: InitOptions) -> Result<(), ConfigError> {
        if self.initialized {
            tracing::debug!("Configuration already initialized, skipping");
            return Ok(());
        }

        let explicit_env = options
            .environment
            .as_deref()
            .map(str::parse::<Environment>)
            .transpose()?;

        let base = match &options.base_file {
            Some(path) => load_document(path)?,
            None => serde_json::from_str(DEFAULT_CONFIG)
                .map_err(|e| ConfigError::format("<packaged default>", e))?,
        };
        let custom = options
            .custom_file
            .as_deref()
            .map(load_document)
            .transpose()?;

        let mut document = json!({
            "platform_version": options.platform_version,
            "runtime_version": options
                .runtime_version
                .clone()
                .unwrap_or_else(default_runtime_version),
            "store_id": DEFAULT_STORE_ID,
        });
        deep_merge(&mut document, base);
        if let Some(custom) = custom {
            deep_merge(&mut document, custom);
        }

        let environment = match explicit_env {
            Some(env) => env,
            None => match get_path(&document, "default_environment") {
                Some(Value::String(name)) => name.parse()?,
                Some(Value::Null) | None => Environment::default(),
                Some(other) => return Err(ConfigError::Environment(other.to_string())),
            },
        };

        validate_required_fields(&document, environment)?;
        validate_static_mappings(&document)?;
        apply_static_mappings(&mut document)?;

        tracing::info!(
            environment = %environment,
            base = ?options.base_file,
            custom = ?options.custom_file,
            "Configuration initialized"
        );

        self.document = document;
        self.environment = environment;
        self.initialized = true;
        Ok(())
    }

    /// Drop the loaded document so the store can be initialized again
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Write a value at a dot-path
    ///
    /// Rejected if the write would alter any static mapping, whether by
    /// targeting it directly or by replacing one of its ancestors.
    pub fn set_value(&mut self, path: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        let mut candidate = self.document.clone();
        set_path(&mut candidate, path, value.into())?;
        if self.initialized {
            ensure_static_mappings(&candidate).map_err(|_| {
                ConfigError::invalid(path, "write would change a static value")
            })?;
        } else {
            validate_static_mappings(&candidate)?;
        }
        self.document = candidate;
        Ok(())
    }

    /// Resolve a dot-path
    pub fn get_value(&self, path: &str) -> Result<&Value, ConfigError> {
        get_path(&self.document, path).ok_or_else(|| ConfigError::ValueNotFound(path.to_string()))
    }

    /// Resolve a dot-path relative to the current environment
    pub fn get_env_value(&self, path: &str) -> Result<&Value, ConfigError> {
        self.get_value(&self.environment.scoped(path))
    }

    /// Check whether a dot-path resolves
    pub fn value_exists(&self, path: &str) -> bool {
        path_exists(&self.document, path)
    }

    /// Resolve a dot-path that must hold a string
    pub fn get_str(&self, path: &str) -> Result<&str, ConfigError> {
        self.get_value(path)?
            .as_str()
            .ok_or_else(|| ConfigError::invalid(path, "expected a string"))
    }

    /// Resolve an environment-relative dot-path that must hold a string
    pub fn get_env_str(&self, path: &str) -> Result<&str, ConfigError> {
        self.get_str(&self.environment.scoped(path))
    }

    /// Resolve a dot-path that must hold a non-negative integer
    pub fn get_u64(&self, path: &str) -> Result<u64, ConfigError> {
        self.get_value(path)?
            .as_u64()
            .ok_or_else(|| ConfigError::invalid(path, "expected a non-negative integer"))
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Switch the current environment without reloading
    pub fn set_environment(&mut self, environment: Environment) {
        tracing::debug!(%environment, "Switching environment");
        self.environment = environment;
    }

    /// The merged document
    pub fn document(&self) -> &Value {
        &self.document
    }
}

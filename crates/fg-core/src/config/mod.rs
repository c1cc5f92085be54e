//! Configuration management for the FraudGuard SDK

pub mod document;
mod environment;
mod invariants;
mod store;

pub use environment::Environment;
pub use invariants::{REQUIRED_ENV_FIELDS, STATIC_MAPPINGS};
pub use store::{default_runtime_version, ConfigStore, InitOptions};

use crate::error::ConfigError;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fraudguard")
}

/// Get the default custom override file path
pub fn default_custom_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

/// Get the directory holding worker state (PID-info file, worker log)
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fraudguard")
}

/// Load a JSON document that must be an object at the top level
pub fn load_document(path: &Path) -> Result<Value, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::format(path, "file not found"));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::format(path, format!("failed to read: {}", e)))?;

    let document: Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::format(path, e))?;
    if !document.is_object() {
        return Err(ConfigError::format(path, "top level must be a JSON object"));
    }
    Ok(document)
}

/// Save a document as pretty-printed JSON
pub fn save_document(path: &Path, document: &Value) -> Result<(), ConfigError> {
    let write_err = |source: std::io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut content = serde_json::to_string_pretty(document)
        .map_err(|e| ConfigError::format(path, e))?;
    content.push('\n');
    std::fs::write(path, content).map_err(write_err)?;
    Ok(())
}

/// Set one key in a custom override file
///
/// Starts from an empty document if the file does not exist yet. Keys that
/// would override a static mapping are refused and the file is left alone.
pub fn write_override(path: &Path, key: &str, value: Value) -> Result<(), ConfigError> {
    let mut document = if path.exists() {
        load_document(path)?
    } else {
        Value::Object(Map::new())
    };

    // Objects are merged over the base at load time, so the override file
    // only has to keep static values and their ancestors placeable.
    document::set_path(&mut document, key, value)?;
    invariants::validate_static_mappings(&document)
        .map_err(|e| ConfigError::invalid(key, format!("write would break a static value: {e}")))?;

    save_document(path, &document)?;
    tracing::info!(key, path = ?path, "Updated configuration override");
    Ok(())
}

/// Interpret a command-line value as the closest JSON type
///
/// `true`/`false`, integers, floats and JSON arrays/objects keep their type;
/// everything else is stored as a string.
pub fn parse_cli_value(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    if raw.starts_with('{') || raw.starts_with('[') {
        if let Ok(v) = serde_json::from_str::<Value>(raw) {
            return v;
        }
    }
    Value::String(raw.to_string())
}

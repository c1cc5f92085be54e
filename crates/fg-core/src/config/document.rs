//! Dot-path access and layering for JSON configuration documents
//!
//! A path such as `production.urls.api_url` names nested object keys joined
//! by `.`. Traversal stops at the first missing key or at a value that is not
//! an object; arrays are never indexed into.

use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Resolve a dot-path, returning `None` if any segment is absent
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |current, segment| current.as_object()?.get(segment))
}

/// Check whether a dot-path resolves
pub fn path_exists(root: &Value, path: &str) -> bool {
    get_path(root, path).is_some()
}

/// Write `value` at a dot-path, creating intermediate objects as needed
///
/// Fails if the path has an empty segment or runs through a value that is
/// not an object.
pub fn set_path(root: &mut Value, path: &str, value: Value) -> Result<(), ConfigError> {
    let segments = split_path(path)?;
    let Some((last, parents)) = segments.split_last() else {
        return Err(ConfigError::invalid(path, "empty key"));
    };

    if root.is_null() {
        *root = Value::Object(Map::new());
    }

    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        let traversed = segments[..=depth].join(".");
        let not_object = || {
            ConfigError::invalid(path, format!("'{}' is not an object", parent_of(&traversed)))
        };
        current = current
            .as_object_mut()
            .ok_or_else(not_object)?
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    let map = current.as_object_mut().ok_or_else(|| {
        ConfigError::invalid(path, format!("'{}' is not an object", parents.join(".")))
    })?;
    map.insert(last.to_string(), value);
    Ok(())
}

/// Recursively merge `overlay` into `base`
///
/// Objects present on both sides are merged key by key; any other overlay
/// value (scalars, arrays, objects replacing scalars) wins outright.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value);
                    }
                    _ => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Whether a value counts as empty for required-field validation
///
/// `null`, `false`, zero, `""`, `"0"` and empty arrays/objects are empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn split_path(path: &str) -> Result<Vec<&str>, ConfigError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::invalid(path, "key path contains an empty segment"));
    }
    Ok(segments)
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('.').map_or("<root>", |(parent, _)| parent)
}

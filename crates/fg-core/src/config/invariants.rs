//! Document invariants enforced at load time and on every write

use serde_json::Value;

use super::document::{get_path, is_empty_value, path_exists, set_path};
use super::Environment;
use crate::error::ConfigError;

/// Paths whose values are fixed by the SDK and may not be overridden
pub const STATIC_MAPPINGS: &[(&str, &str)] = &[
    ("production.urls.api_url", "https://api.fraudguard.io/v2"),
    ("production.urls.client_url", "https://app.fraudguard.io"),
    (
        "production.urls.js_sdk_url",
        "https://cdn.fraudguard.io/sdk/v2/fraudguard.min.js",
    ),
    ("testing.urls.api_url", "https://api.sandbox.fraudguard.io/v2"),
    ("testing.urls.client_url", "https://app.sandbox.fraudguard.io"),
    (
        "testing.urls.js_sdk_url",
        "https://cdn.sandbox.fraudguard.io/sdk/v2/fraudguard.min.js",
    ),
];

/// Environment-relative keys that may not be empty
pub const REQUIRED_ENV_FIELDS: &[&str] = &["urls.api_url", "urls.client_url"];

/// Reject static paths present with a non-canonical value
///
/// Absent static paths pass; [`apply_static_mappings`] fills them in. Every
/// ancestor of a static path that is present must be an object, otherwise
/// the static value could not be placed.
pub fn validate_static_mappings(doc: &Value) -> Result<(), ConfigError> {
    for (path, expected) in STATIC_MAPPINGS {
        if let Some(ancestor) = blocking_ancestor(doc, path) {
            return Err(ConfigError::invalid(
                *path,
                format!("'{ancestor}' must be an object holding this static value"),
            ));
        }
        if let Some(actual) = get_path(doc, path) {
            if actual.as_str() != Some(expected) {
                return Err(ConfigError::invalid(
                    *path,
                    format!("static value cannot be changed (expected {expected}, got {actual})"),
                ));
            }
        }
    }
    Ok(())
}

/// Reject documents in which any static path is missing or altered
pub fn ensure_static_mappings(doc: &Value) -> Result<(), ConfigError> {
    for (path, expected) in STATIC_MAPPINGS {
        if get_path(doc, path).and_then(Value::as_str) != Some(expected) {
            return Err(ConfigError::invalid(*path, "static value cannot be changed"));
        }
    }
    Ok(())
}

/// Write every static mapping into the document
pub fn apply_static_mappings(doc: &mut Value) -> Result<(), ConfigError> {
    for (path, value) in STATIC_MAPPINGS {
        set_path(doc, path, Value::String((*value).to_string()))?;
    }
    Ok(())
}

/// First present ancestor of `path` that is not an object
fn blocking_ancestor<'a>(doc: &Value, path: &'a str) -> Option<&'a str> {
    path.match_indices('.')
        .map(|(idx, _)| &path[..idx])
        .find(|prefix| get_path(doc, prefix).map_or(false, |v| !v.is_object()))
}

/// Reject required fields of `env` that are present but empty
///
/// A required field that is missing altogether is accepted.
pub fn validate_required_fields(doc: &Value, env: Environment) -> Result<(), ConfigError> {
    for field in REQUIRED_ENV_FIELDS {
        let path = env.scoped(field);
        if path_exists(doc, &path) && get_path(doc, &path).map_or(true, is_empty_value) {
            return Err(ConfigError::invalid(path, "required value is empty"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_rejects_scalar_ancestor() {
        let doc = json!({"production": "off"});
        let err = validate_static_mappings(&doc).unwrap_err();
        match err {
            ConfigError::InvalidValue { path, reason } => {
                assert!(path.starts_with("production.urls."));
                assert!(reason.contains("'production' must be an object"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let nested = json!({"testing": {"urls": "flat"}});
        assert!(validate_static_mappings(&nested).is_err());
        let array = json!({"testing": {"urls": []}});
        assert!(validate_static_mappings(&array).is_err());
    }

    #[test]
    fn test_validate_ignores_unrelated_scalars() {
        let doc = json!({"development": "off", "production": {"other": 1}});
        assert!(validate_static_mappings(&doc).is_ok());
    }

    #[test]
    fn test_validate_accepts_missing_and_matching() {
        assert!(validate_static_mappings(&json!({})).is_ok());
        let doc = json!({"production": {"urls": {"api_url": "https://api.fraudguard.io/v2"}}});
        assert!(validate_static_mappings(&doc).is_ok());
    }

    #[test]
    fn test_validate_rejects_override() {
        let doc = json!({"testing": {"urls": {"client_url": "https://evil.example"}}});
        let err = validate_static_mappings(&doc).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref path, .. } if path == "testing.urls.client_url"
        ));
    }

    #[test]
    fn test_apply_then_ensure() {
        let mut doc = json!({"other": 1});
        assert!(ensure_static_mappings(&doc).is_err());
        apply_static_mappings(&mut doc).unwrap();
        assert!(ensure_static_mappings(&doc).is_ok());
        assert_eq!(doc["other"], json!(1));
    }

    #[test]
    fn test_required_fields_only_checked_when_present() {
        let missing = json!({"development": {"urls": {}}});
        assert!(validate_required_fields(&missing, Environment::Development).is_ok());

        let empty = json!({"development": {"urls": {"api_url": ""}}});
        assert!(validate_required_fields(&empty, Environment::Development).is_err());

        // Other environments are not checked
        assert!(validate_required_fields(&empty, Environment::Testing).is_ok());
    }
}

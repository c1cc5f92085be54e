//! Config command implementations

use anyhow::{Context, Result};
use serde_json::Value;

use crate::context::CliContext;
use crate::output::{print_info, print_success};
use fg_core::config;

/// Print the merged configuration document
pub fn config_show(ctx: &CliContext) -> Result<()> {
    let store = ctx.load_config()?;

    print_info(&format!("Environment: {}", store.environment()));
    let custom = ctx.override_path();
    if custom.exists() {
        print_info(&format!("Overrides: {:?}", custom));
    }
    println!();
    println!("{}", serde_json::to_string_pretty(store.document())?);
    Ok(())
}

/// Print one value by dot-path
///
/// Strings print bare; everything else prints as JSON.
pub fn config_get(ctx: &CliContext, key: &str) -> Result<()> {
    let store = ctx.load_config()?;
    let value = store
        .get_value(key)
        .with_context(|| format!("Key not found: {}", key))?;

    match value {
        Value::String(s) => println!("{}", s),
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }
    Ok(())
}

/// Write one value into the custom override file
pub fn config_set(ctx: &CliContext, key: &str, value: &str) -> Result<()> {
    let path = ctx.override_path();
    let parsed = config::parse_cli_value(value);

    config::write_override(&path, key, parsed.clone())
        .with_context(|| format!("Failed to set {}", key))?;

    // Make sure the edited file still loads as a whole
    ctx.load_config()
        .with_context(|| format!("{:?} no longer loads after setting {}", path, key))?;

    print_success(&format!("Set {} = {}", key, parsed));
    Ok(())
}

/// Print the configuration directory
pub fn config_path() {
    println!("{}", config::default_config_dir().display());
}

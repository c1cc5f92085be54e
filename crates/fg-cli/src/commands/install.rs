//! Install and uninstall commands

use anyhow::{Context, Result};
use serde_json::Value;

use crate::context::CliContext;
use crate::output::{print_info, print_success};
use fg_client::{InstallClient, InstallRequest};
use fg_core::config;

/// Register the store and save the issued credentials as overrides
pub async fn install_command(ctx: &CliContext, store_url: &str) -> Result<()> {
    let store = ctx.load_config()?;
    let client = InstallClient::new(ctx.api_client(&store)?);

    let request = InstallRequest {
        store_url: store_url.to_string(),
        platform_version: store
            .get_value("platform_version")
            .ok()
            .and_then(Value::as_str)
            .map(str::to_string),
        runtime_version: store.get_str("runtime_version")?.to_string(),
    };
    let response = client
        .install(&request)
        .await
        .context("Install request failed")?;

    let path = ctx.override_path();
    config::write_override(&path, "credentials.api_key", Value::from(response.api_key))?;
    config::write_override(&path, "store_id", Value::from(response.store_id))?;

    print_success(&format!(
        "Installed store {} ({})",
        response.store_id, response.status
    ));
    print_info(&format!("Credentials saved to {:?}", path));
    Ok(())
}

/// Deregister the store, stop the worker and clear the saved API key
pub async fn uninstall_command(ctx: &CliContext) -> Result<()> {
    let store = ctx.load_config()?;
    InstallClient::new(ctx.api_client(&store)?)
        .uninstall()
        .await
        .context("Uninstall request failed")?;

    let supervisor = ctx.supervisor(&store, None)?;
    if supervisor.kill_service() {
        print_info("Stopped queue worker");
    }

    let path = ctx.override_path();
    if path.exists() {
        config::write_override(&path, "credentials.api_key", Value::from(""))?;
    }

    print_success(&format!("Uninstalled store {}", store.get_u64("store_id")?));
    Ok(())
}

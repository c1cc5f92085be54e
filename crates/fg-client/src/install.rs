//! Store installation handshake

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::http::ApiClient;

/// Registration details sent when a store installs the integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallRequest {
    pub store_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,
    pub runtime_version: String,
}

/// Credentials issued for a newly installed store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallResponse {
    pub api_key: String,
    pub store_id: u64,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct InstallClient {
    client: ApiClient,
}

impl InstallClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn install(&self, request: &InstallRequest) -> Result<InstallResponse> {
        tracing::info!(store_url = %request.store_url, "Registering store");
        self.client.post("install", request).await
    }

    /// Deregister the configured store
    pub async fn uninstall(&self) -> Result<()> {
        tracing::info!(store_id = self.client.store_id(), "Deregistering store");
        let body = serde_json::json!({ "store_id": self.client.store_id() });
        let _: Value = self.client.post("uninstall", &body).await?;
        Ok(())
    }
}

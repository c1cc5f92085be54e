//! Merchant account lookup and settings

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::http::ApiClient;

/// Merchant account as the API reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    pub store_id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub settings: Value,
}

#[derive(Debug, Clone)]
pub struct MerchantClient {
    client: ApiClient,
}

impl MerchantClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the merchant bound to the configured store
    pub async fn get(&self) -> Result<Merchant> {
        self.client
            .get(&format!("merchants/{}", self.client.store_id()))
            .await
    }

    /// Replace the merchant's settings and return the updated account
    pub async fn update_settings(&self, settings: &Value) -> Result<Merchant> {
        self.client
            .put(
                &format!("merchants/{}/settings", self.client.store_id()),
                settings,
            )
            .await
    }
}

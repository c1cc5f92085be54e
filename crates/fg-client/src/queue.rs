//! Pending work items for the background worker

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::http::{path_segment, ApiClient};

/// One queued job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub created_at: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct QueueClient {
    client: ApiClient,
}

impl QueueClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch up to `limit` pending items for the configured store
    pub async fn fetch(&self, limit: usize) -> Result<Vec<QueueItem>> {
        let query = [
            ("store_id", self.client.store_id().to_string()),
            ("limit", limit.to_string()),
        ];
        let items: Option<Vec<QueueItem>> = self.client.get_with_query("queue", &query).await?;
        Ok(items.unwrap_or_default())
    }

    /// Mark an item as processed
    pub async fn acknowledge(&self, id: &str) -> Result<()> {
        let id = path_segment(id)?;
        let _: Value = self
            .client
            .post(&format!("queue/{}/ack", id), &serde_json::json!({}))
            .await?;
        Ok(())
    }
}

//! Order lookup and fraud decisions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::http::{path_segment, ApiClient};

/// Order record held by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Remaining order fields, passed through untouched
    #[serde(flatten)]
    pub details: serde_json::Map<String, Value>,
}

/// Fraud verdict for one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub order_id: String,
    /// `approve`, `decline` or `review`
    pub decision: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OrderClient {
    client: ApiClient,
}

impl OrderClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &str) -> Result<Order> {
        let id = path_segment(id)?;
        self.client.get(&format!("orders/{}", id)).await
    }

    pub async fn decision(&self, id: &str) -> Result<Decision> {
        let id = path_segment(id)?;
        self.client.get(&format!("orders/{}/decision", id)).await
    }
}

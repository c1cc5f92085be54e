//! Storefront templates and the JS SDK tag

use serde::{Deserialize, Serialize};

use fg_core::ConfigStore;

use crate::error::Result;
use crate::http::{path_segment, ApiClient};

/// Storefront snippet served by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TemplateClient {
    client: ApiClient,
}

impl TemplateClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, name: &str) -> Result<Template> {
        let name = path_segment(name)?;
        self.client.get(&format!("templates/{}", name)).await
    }
}

/// Render the `<script>` tag that loads the JS SDK for the active environment
pub fn sdk_script_tag(config: &ConfigStore) -> Result<String> {
    let src = config.get_env_str("urls.js_sdk_url")?;
    let store_id = config.get_u64("store_id")?;
    Ok(format!(
        r#"<script src="{}" data-store-id="{}" async></script>"#,
        escape_attr(src),
        store_id
    ))
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

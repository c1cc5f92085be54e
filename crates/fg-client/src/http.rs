//! Shared HTTP client for the FraudGuard API
//!
//! Every domain client goes through [`ApiClient`], which owns the base URL,
//! credentials and connection pool read from the [`ConfigStore`].

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;
use uuid::Uuid;

use fg_core::ConfigStore;

use crate::error::{ApiError, Result};

/// Default total request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for [`ApiClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Sent as `X-Api-Key` when set
    pub api_key: Option<String>,
    /// Sent as `X-Store-Id`
    pub store_id: u64,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            store_id: 1,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: user_agent(&fg_core::config::default_runtime_version(), None),
        }
    }
}

/// JSON-over-HTTP client bound to one API base URL
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    options: ClientOptions,
}

impl ApiClient {
    /// Create a client for an explicit base URL
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{}: only http and https are supported",
                base_url
            )));
        }

        let http = Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .user_agent(options.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url: parsed,
            options,
        })
    }

    /// Create a client for the configured environment
    ///
    /// Reads `<env>.urls.api_url`, `credentials.api_key`, `store_id` and the
    /// optional `http.timeout_secs` / `http.connect_timeout_secs`.
    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let base_url = config.get_env_str("urls.api_url")?;
        let api_key = config
            .get_value("credentials.api_key")
            .ok()
            .and_then(|v| v.as_str())
            .filter(|key| !key.is_empty())
            .map(str::to_string);
        let platform_version = config
            .get_value("platform_version")
            .ok()
            .and_then(|v| v.as_str());
        let runtime_version = config
            .get_str("runtime_version")
            .map(str::to_string)
            .unwrap_or_else(|_| fg_core::config::default_runtime_version());

        let options = ClientOptions {
            api_key,
            store_id: config.get_u64("store_id")?,
            timeout: secs_or_default(config, "http.timeout_secs", DEFAULT_TIMEOUT_SECS)?,
            connect_timeout: secs_or_default(
                config,
                "http.connect_timeout_secs",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
            user_agent: user_agent(&runtime_version, platform_version),
        };

        tracing::debug!(
            environment = %config.environment(),
            base_url,
            store_id = options.store_id,
            authenticated = options.api_key.is_some(),
            "API client configured"
        );
        Self::new(base_url, options)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn store_id(&self) -> u64 {
        self.options.store_id
    }

    pub fn has_api_key(&self) -> bool {
        self.options.api_key.is_some()
    }

    /// GET a JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<(), T>(Method::GET, path, &[], None).await
    }

    /// GET a JSON resource with query parameters
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.send::<(), T>(Method::GET, path, query, None).await
    }

    /// POST a JSON body
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    /// PUT a JSON body
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    fn url(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", joined, e)))
    }

    #[instrument(
        skip(self, query, body),
        fields(method = %method, store_id = self.options.store_id)
    )]
    async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        let request_id = Uuid::new_v4().to_string();

        let mut request = self
            .http
            .request(method, url)
            .header("Accept", "application/json")
            .header("X-Store-Id", self.options.store_id.to_string())
            .header("X-Request-Id", &request_id);
        if let Some(key) = &self.options.api_key {
            request = request.header("X-Api-Key", key);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        tracing::debug!(%request_id, status = status.as_u16(), len = bytes.len(), "API response");

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"null")?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Validate a caller-supplied value used as a single URL path segment
pub(crate) fn path_segment(value: &str) -> Result<&str> {
    let valid = !value.is_empty()
        && value != "."
        && value != ".."
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '?' | '#' | '%'));
    if valid {
        Ok(value)
    } else {
        Err(ApiError::InvalidArgument(format!(
            "'{}' is not a valid path segment",
            value
        )))
    }
}

fn user_agent(runtime_version: &str, platform_version: Option<&str>) -> String {
    format!(
        "fraudguard-sdk/{} ({}; platform {})",
        env!("CARGO_PKG_VERSION"),
        runtime_version,
        platform_version.unwrap_or("unknown")
    )
}

fn secs_or_default(config: &ConfigStore, path: &str, default: u64) -> Result<Duration> {
    let secs = if config.value_exists(path) {
        config.get_u64(path)?
    } else {
        default
    };
    Ok(Duration::from_secs(secs))
}

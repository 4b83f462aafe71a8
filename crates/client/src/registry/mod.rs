//! Re-turn scheme registry client.
//!
//! The registry is the public barcode checker on the scheme's website: a
//! WordPress AJAX endpoint that takes a form POST and answers with an HTML
//! fragment.
//!
//! ### Request
//!
//! - **Endpoint**: `https://re-turn.ie/wp-admin/admin-ajax.php` (configurable)
//! - **Body**: `action=barcode_api_callback&barcodeNo=<code>`, form-encoded
//! - **Headers**: the same AJAX headers the site's own checker sends
//!
//! ### Outcomes
//!
//! - 2xx with a recognized sentence -> `Matched` / `NotMatched`
//! - 2xx with anything else -> `Indeterminate`
//! - non-2xx, timeout, network failure -> `Unavailable`

pub mod classify;
pub mod error;

pub use classify::{MEMBER_MARKER, NON_MEMBER_MARKER, classify};
pub use error::RegistryError;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use returncheck_core::{AppConfig, SchemeRegistry, UpstreamResult};
use url::Url;

/// Default registry endpoint.
const DEFAULT_ENDPOINT: &str = "https://re-turn.ie/wp-admin/admin-ajax.php";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "return-check/0.1";

/// AJAX action the registry dispatches barcode checks to.
const LOOKUP_ACTION: &str = "barcode_api_callback";

/// Registry client configuration.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Endpoint URL (default: https://re-turn.ie/wp-admin/admin-ajax.php).
    pub endpoint: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: return-check/0.x).
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for RegistryConfig {
    fn from(config: &AppConfig) -> Self {
        Self { endpoint: config.registry_url.clone(), timeout: config.timeout(), user_agent: config.user_agent.clone() }
    }
}

fn ajax_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(HeaderName::from_static("x-requested-with"), HeaderValue::from_static("XMLHttpRequest"));
    headers.insert(HeaderName::from_static("sec-fetch-dest"), HeaderValue::from_static("empty"));
    headers.insert(HeaderName::from_static("sec-fetch-mode"), HeaderValue::from_static("cors"));
    headers.insert(HeaderName::from_static("sec-fetch-site"), HeaderValue::from_static("same-origin"));
    headers
}

/// HTTP client for the scheme registry.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl RegistryClient {
    /// Create a new registry client with the given configuration.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let endpoint =
            Url::parse(&config.endpoint).map_err(|e| RegistryError::InvalidEndpoint(format!("{}: {e}", config.endpoint)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(RegistryError::InvalidEndpoint(format!("unsupported scheme: {}", endpoint.scheme())));
        }

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .default_headers(ajax_headers())
            .use_rustls_tls()
            .build()
            .map_err(|e| RegistryError::Network(Arc::new(e)))?;

        Ok(Self { http, endpoint })
    }

    /// Create a client from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, RegistryError> {
        Self::new(RegistryConfig::from(config))
    }

    /// The endpoint this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Submit a barcode and return the raw response body.
    pub async fn fetch(&self, code: &str) -> Result<String, RegistryError> {
        let start = Instant::now();
        tracing::debug!("querying scheme registry: barcode={}", code);

        let response = self
            .http
            .post(self.endpoint.clone())
            .form(&[("action", LOOKUP_ACTION), ("barcodeNo", code)])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("scheme registry response status: {}", status);

        if !status.is_success() {
            return Err(RegistryError::HttpError {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;

        tracing::debug!("registry answered in {:?} ({} bytes)", start.elapsed(), body.len());

        Ok(body)
    }
}

#[async_trait]
impl SchemeRegistry for RegistryClient {
    async fn query(&self, code: &str) -> UpstreamResult {
        match self.fetch(code).await {
            Ok(body) => {
                let result = classify(&body);
                if result == UpstreamResult::Indeterminate {
                    tracing::warn!(barcode = code, body_len = body.len(), "registry response matched no known answer");
                }
                result
            }
            Err(e) => UpstreamResult::Unavailable { reason: e.to_string(), status: e.status() },
        }
    }
}

//! Configuration validation rules.
//!
//! Checks applied to `AppConfig` after it has been loaded from environment,
//! files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;
use url::Url;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_path` is empty
    /// - `registry_url` is not an http(s) URL
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "cache_path".into(), reason: "must not be empty".into() });
        }

        let registry_url = Url::parse(&self.registry_url).map_err(|e| ConfigError::Invalid {
            field: "registry_url".into(),
            reason: format!("not a valid URL: {e}"),
        })?;
        if !matches!(registry_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "registry_url".into(),
                reason: "must be an http:// or https:// URL".into(),
            });
        }
        if registry_url.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::Invalid { field: "registry_url".into(), reason: "must include a host".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if registry_url.scheme() == "http" {
            tracing::warn!(registry_url = %self.registry_url, "registry URL is not using TLS");
        }

        Ok(())
    }
}

//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (RETURN_CHECK_*)
//! 2. TOML config file (if RETURN_CHECK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Storage backend for the barcode cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// One JSON object rewritten on every update.
    #[default]
    Json,
    /// SQLite database with one row per barcode.
    Sqlite,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (RETURN_CHECK_*)
/// 2. TOML config file (if RETURN_CHECK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the cache file or database.
    ///
    /// Set via RETURN_CHECK_CACHE_PATH environment variable.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Cache storage backend: "json" (default) or "sqlite".
    ///
    /// Set via RETURN_CHECK_CACHE_BACKEND environment variable.
    #[serde(default)]
    pub cache_backend: CacheBackend,

    /// Scheme registry endpoint queried on cache misses.
    ///
    /// Set via RETURN_CHECK_REGISTRY_URL environment variable.
    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    /// User-Agent string for registry requests.
    ///
    /// Set via RETURN_CHECK_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Registry request timeout in milliseconds.
    ///
    /// Set via RETURN_CHECK_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./return-check-cache.json")
}

fn default_registry_url() -> String {
    "https://re-turn.ie/wp-admin/admin-ajax.php".into()
}

fn default_user_agent() -> String {
    "return-check/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
            cache_backend: CacheBackend::default(),
            registry_url: default_registry_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Provider stack used by [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("RETURN_CHECK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("RETURN_CHECK_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Extract and validate a configuration from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.cache_path, PathBuf::from("./return-check-cache.json"));
        assert_eq!(config.cache_backend, CacheBackend::Json);
        assert_eq!(config.registry_url, "https://re-turn.ie/wp-admin/admin-ajax.php");
        assert_eq!(config.user_agent, "return-check/0.1");
        assert_eq!(config.timeout_ms, 10_000);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn test_toml_layer_overrides_defaults() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string(
            r#"
            cache_backend = "sqlite"
            cache_path = "/var/lib/return-check/cache.sqlite"
            timeout_ms = 2500
            "#,
        ));

        let config = AppConfig::from_figment(figment).unwrap();
        assert_eq!(config.cache_backend, CacheBackend::Sqlite);
        assert_eq!(config.cache_path, PathBuf::from("/var/lib/return-check/cache.sqlite"));
        assert_eq!(config.timeout_ms, 2500);
        assert_eq!(config.user_agent, "return-check/0.1");
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let figment =
            Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string(r#"cache_backend = "redis""#));

        let result = AppConfig::from_figment(figment);
        assert!(matches!(result, Err(ConfigError::LoadFailed(_))));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let figment =
            Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string("timeout_ms = 5"));

        let result = AppConfig::from_figment(figment);
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }
}

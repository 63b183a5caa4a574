//! # Client Configuration
//!
//! Where the storefront API lives and how hard to try reaching it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_API_URL=https://shop.example.com/api                    │
//! │     STOREFRONT_CDN_URL=https://shop.example.com/content                │
//! │     STOREFRONT_TIMEOUT_SECS=10                                         │
//! │     STOREFRONT_MAX_RETRIES=3                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/shop/client.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.storefront.shop/client.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:3000/api, http://localhost:3000/content           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [api]
//! base_url = "https://shop.example.com/api"
//! cdn_url = "https://shop.example.com/content"
//! timeout_secs = 10
//!
//! [retry]
//! max_retries = 3
//! initial_backoff_ms = 200
//! max_backoff_secs = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

/// Where the API and its static content are served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the JSON API, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL product image references are resolved against.
    #[serde(default = "default_cdn_url")]
    pub cdn_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_cdn_url() -> String {
    "http://localhost:3000/content".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            cdn_url: default_cdn_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Retry Settings
// =============================================================================

/// Backoff policy for catalog loading. Orders are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Extra attempts after the first one. 0 disables retrying.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff duration (milliseconds).
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff duration (seconds).
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

fn default_max_retries() -> u32 {
    3
}
fn default_initial_backoff() -> u64 {
    200
}
fn default_max_backoff() -> u64 {
    5
}

impl Default for RetrySettings {
    fn default() -> Self {
        RetrySettings {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

impl RetrySettings {
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.max_backoff_secs)
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub retry: RetrySettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with environment lookups going through `lookup`.
    fn load_with(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    ///
    /// Used when no config file was named explicitly.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file, returning the path written.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        validate_http_url("api.base_url", &self.api.base_url)?;
        validate_http_url("api.cdn_url", &self.api.cdn_url)?;

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.retry.initial_backoff() > self.retry.max_backoff() {
            return Err(ClientError::InvalidConfig(
                "initial_backoff_ms must not exceed max_backoff_secs".into(),
            ));
        }

        Ok(())
    }

    /// Applies `STOREFRONT_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("STOREFRONT_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(url) = lookup("STOREFRONT_CDN_URL") {
            debug!(url = %url, "Overriding CDN URL from environment");
            self.api.cdn_url = url;
        }

        if let Some(secs) = lookup("STOREFRONT_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric STOREFRONT_TIMEOUT_SECS"),
            }
        }

        if let Some(retries) = lookup("STOREFRONT_MAX_RETRIES") {
            match retries.parse::<u32>() {
                Ok(r) => self.retry.max_retries = r,
                Err(_) => warn!(value = %retries, "Ignoring non-numeric STOREFRONT_MAX_RETRIES"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "shop")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// API base URL without trailing slash.
    pub fn api_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    /// CDN base URL without trailing slash.
    pub fn cdn_url(&self) -> &str {
        self.api.cdn_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

fn validate_http_url(name: &str, value: &str) -> ClientResult<()> {
    let url = Url::parse(value)
        .map_err(|e| ClientError::InvalidUrl(format!("{} '{}': {}", name, value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ClientError::InvalidUrl(format!(
            "{} must use http:// or https://, got {}://",
            name, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url(), "http://localhost:3000/api");
        assert_eq!(config.cdn_url(), "http://localhost:3000/content");
        assert_eq!(config.retry.max_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api.base_url = "ws://localhost/api".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "https://shop.example.com/api/".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_url(), "https://shop.example.com/api");

        config.api.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("STOREFRONT_API_URL", "https://shop.example.com/api"),
            ("STOREFRONT_MAX_RETRIES", "0"),
            ("STOREFRONT_TIMEOUT_SECS", "soon"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://shop.example.com/api");
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.cdn_url, "http://localhost:3000/content");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://shop.example.com/api"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://shop.example.com/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.retry, RetrySettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("storefront-{}", uuid::Uuid::new_v4()))
            .join("client.toml");

        let mut config = ClientConfig::default();
        config.api.timeout_secs = 3;
        assert_eq!(config.save(Some(path.clone())).unwrap(), path);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[api]"));
        assert!(contents.contains("[retry]"));

        let loaded = ClientConfig::load_with(Some(path.clone()), |_| None).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    fn temp_config(contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("storefront-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("client.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_env_wins_over_file() {
        let path = temp_config(
            r#"
            [api]
            base_url = "https://file.example.com/api"
            cdn_url = "https://file.example.com/content"
            timeout_secs = 4

            [retry]
            max_retries = 7
            "#,
        );
        let env: HashMap<&str, &str> = [
            ("STOREFRONT_API_URL", "https://env.example.com/api"),
            ("STOREFRONT_MAX_RETRIES", "1"),
        ]
        .into_iter()
        .collect();

        let config =
            ClientConfig::load_with(Some(path.clone()), |key| env.get(key).map(|v| v.to_string()))
                .unwrap();

        assert_eq!(config.api_url(), "https://env.example.com/api");
        assert_eq!(config.cdn_url(), "https://file.example.com/content");
        assert_eq!(config.api.timeout_secs, 4);
        assert_eq!(config.retry.max_retries, 1);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_validates_env_overrides() {
        let path = temp_config("[api]\ntimeout_secs = 4\n");

        let err = ClientConfig::load_with(Some(path.clone()), |key| {
            (key == "STOREFRONT_CDN_URL").then(|| "ftp://cdn.example.com".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));

        let err = ClientConfig::load_with(Some(path.clone()), |key| {
            (key == "STOREFRONT_TIMEOUT_SECS").then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(_)));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir()
            .join(format!("storefront-{}", uuid::Uuid::new_v4()))
            .join("client.toml");

        let config = ClientConfig::load_with(Some(path), |_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
    }
}

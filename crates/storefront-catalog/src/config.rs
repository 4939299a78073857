//! # Catalog Configuration
//!
//! Where the catalog lives and how its results are cached.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (--endpoint)                 (applied by the app)     │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     STOREFRONT_CATALOG_URL=https://example.test/products               │
//! │     STOREFRONT_STALE_SECS=30                                           │
//! │     STOREFRONT_RETRY=0                                                 │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     https://fakestoreapi.com/products, key "products", retry 3         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [endpoint]
//! url = "https://fakestoreapi.com/products"
//! # request_timeout_secs = 10
//!
//! [query]
//! cache_key = "products"
//! stale_time_secs = 0
//! cache_time_secs = 300
//! retry = 3
//! initial_backoff_ms = 1000
//! max_backoff_ms = 30000
//! ```

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{CatalogError, CatalogResult};
use crate::query::QueryOptions;

/// Fixed product-listing URL used when nothing else is configured.
pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";

/// Cache key the product source registers its fetch under.
pub const DEFAULT_CACHE_KEY: &str = "products";

// =============================================================================
// Endpoint Settings
// =============================================================================

/// Where to fetch the catalog from.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointSettings {
    /// Product-listing URL (http or https).
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout. Unset means the HTTP client default (none).
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

impl Default for EndpointSettings {
    fn default() -> Self {
        EndpointSettings {
            url: default_url(),
            request_timeout_secs: None,
        }
    }
}

// =============================================================================
// Query Settings
// =============================================================================

/// Cache and retry policy handed to the query client.
#[derive(Debug, Clone, Deserialize)]
pub struct QuerySettings {
    /// Cache key for the product list.
    #[serde(default = "default_cache_key")]
    pub cache_key: String,

    /// How long a successful result counts as fresh (seconds).
    /// 0 means every new use refetches.
    #[serde(default)]
    pub stale_time_secs: u64,

    /// How long an unused result is retained (seconds).
    #[serde(default = "default_cache_time")]
    pub cache_time_secs: u64,

    /// Retries after a failed fetch.
    #[serde(default = "default_retry")]
    pub retry: u32,

    /// First retry delay (milliseconds).
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Upper bound on the retry delay (milliseconds).
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

fn default_cache_key() -> String {
    DEFAULT_CACHE_KEY.to_string()
}
fn default_cache_time() -> u64 {
    300
}
fn default_retry() -> u32 {
    3
}
fn default_initial_backoff() -> u64 {
    1000
}
fn default_max_backoff() -> u64 {
    30_000
}

impl Default for QuerySettings {
    fn default() -> Self {
        QuerySettings {
            cache_key: default_cache_key(),
            stale_time_secs: 0,
            cache_time_secs: default_cache_time(),
            retry: default_retry(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

impl QuerySettings {
    /// Converts the settings into query client options.
    pub fn options(&self) -> QueryOptions {
        QueryOptions {
            stale_time: Duration::from_secs(self.stale_time_secs),
            cache_time: Duration::from_secs(self.cache_time_secs),
            retry: self.retry,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}

// =============================================================================
// Main Catalog Configuration
// =============================================================================

/// Complete catalog configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub endpoint: EndpointSettings,

    #[serde(default)]
    pub query: QuerySettings,
}

impl CatalogConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CatalogResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading catalog config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CatalogResult<()> {
        self.endpoint_url()?;

        if self.query.cache_key.trim().is_empty() {
            return Err(CatalogError::InvalidConfig(
                "cache_key must not be empty".into(),
            ));
        }

        if self.query.max_backoff_ms < self.query.initial_backoff_ms {
            return Err(CatalogError::InvalidConfig(
                "max_backoff_ms must be at least initial_backoff_ms".into(),
            ));
        }

        Ok(())
    }

    /// Parses the endpoint URL, accepting only http and https.
    pub fn endpoint_url(&self) -> CatalogResult<Url> {
        let url = Url::parse(&self.endpoint.url)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(CatalogError::InvalidUrl(format!(
                "Catalog URL must use http or https, got: {}",
                other
            ))),
        }
    }

    /// Request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.endpoint.request_timeout_secs.map(Duration::from_secs)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("STOREFRONT_CATALOG_URL") {
            debug!(url = %url, "Overriding catalog URL from environment");
            self.endpoint.url = url;
        }

        if let Some(stale) = var("STOREFRONT_STALE_SECS") {
            match stale.parse::<u64>() {
                Ok(secs) => self.query.stale_time_secs = secs,
                Err(_) => warn!(value = %stale, "Ignoring non-numeric STOREFRONT_STALE_SECS"),
            }
        }

        if let Some(retry) = var("STOREFRONT_RETRY") {
            match retry.parse::<u32>() {
                Ok(n) => self.query.retry = n,
                Err(_) => warn!(value = %retry, "Ignoring non-numeric STOREFRONT_RETRY"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = CatalogConfig::default();
        assert_eq!(config.endpoint.url, DEFAULT_CATALOG_URL);
        assert_eq!(config.query.cache_key, "products");
        assert_eq!(config.query.retry, 3);
        assert!(config.request_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CatalogConfig::default();

        config.endpoint.url = "ftp://example.test/products".to_string();
        assert!(matches!(config.validate(), Err(CatalogError::InvalidUrl(_))));

        config.endpoint.url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(CatalogError::InvalidUrl(_))));

        config.endpoint.url = "http://localhost:8080/products".to_string();
        assert!(config.validate().is_ok());

        config.query.cache_key = "  ".to_string();
        assert!(matches!(config.validate(), Err(CatalogError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CatalogConfig = toml::from_str(
            r#"
            [query]
            retry = 0
            stale_time_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.endpoint.url, DEFAULT_CATALOG_URL);
        assert_eq!(config.query.retry, 0);

        let options = config.query.options();
        assert_eq!(options.stale_time, Duration::from_secs(60));
        assert_eq!(options.cache_time, Duration::from_secs(300));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("STOREFRONT_CATALOG_URL", "http://127.0.0.1:9000/products"),
            ("STOREFRONT_STALE_SECS", "15"),
            ("STOREFRONT_RETRY", "many"),
        ]
        .into_iter()
        .collect();

        let mut config = CatalogConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.endpoint.url, "http://127.0.0.1:9000/products");
        assert_eq!(config.query.stale_time_secs, 15);
        assert_eq!(config.query.retry, 3);
    }

    #[test]
    fn test_load_reads_file_and_validates() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("storefront-load-{}.toml", std::process::id()));

        std::fs::write(&path, "[query]\nretry = 1\ncache_key = \"catalog\"\n").unwrap();
        let loaded = CatalogConfig::load(Some(path.clone()));

        std::fs::write(&path, "[endpoint]\nurl = \"ftp://example.test\"\n").unwrap();
        let rejected = CatalogConfig::load(Some(path.clone()));
        std::fs::remove_file(&path).unwrap();

        let config = loaded.unwrap();
        assert_eq!(config.query.retry, 1);
        assert_eq!(config.query.cache_key, "catalog");
        assert!(matches!(rejected, Err(CatalogError::InvalidUrl(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("storefront-does-not-exist.toml");
        let config = CatalogConfig::load(Some(path)).unwrap();
        assert_eq!(config.query.cache_key, DEFAULT_CACHE_KEY);
    }
}

//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (ATELIER_*)
//! 2. TOML config file (if ATELIER_CONFIG_FILE set)
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

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (ATELIER_*)
/// 2. TOML config file (if ATELIER_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the upstream geocoding provider.
    ///
    /// Set via ATELIER_PROVIDER_API_KEY environment variable.
    /// Required only when an uncached address has to be resolved upstream.
    #[serde(default)]
    pub provider_api_key: Option<String>,

    /// Base URL of the upstream geocoding API.
    ///
    /// Set via ATELIER_PROVIDER_BASE_URL environment variable.
    #[serde(default = "default_provider_base_url")]
    pub provider_base_url: String,

    /// Path to SQLite geocode cache database.
    ///
    /// Set via ATELIER_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via ATELIER_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via ATELIER_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Fallback latitude returned when the provider cannot resolve an
    /// address. Defaults to downtown Montreal.
    ///
    /// Set via ATELIER_FALLBACK_LAT environment variable.
    #[serde(default = "default_fallback_lat")]
    pub fallback_lat: f64,

    /// Fallback longitude returned when the provider cannot resolve an
    /// address. Defaults to downtown Montreal.
    ///
    /// Set via ATELIER_FALLBACK_LNG environment variable.
    #[serde(default = "default_fallback_lng")]
    pub fallback_lng: f64,

    /// Maximum number of concurrent provider calls during batch resolution.
    ///
    /// Set via ATELIER_BATCH_CONCURRENCY environment variable.
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,

    /// Delay between batch dispatches in milliseconds, to stay under the
    /// provider's published request rate.
    ///
    /// Set via ATELIER_DISPATCH_INTERVAL_MS environment variable.
    #[serde(default = "default_dispatch_interval_ms")]
    pub dispatch_interval_ms: u64,
}

fn default_provider_base_url() -> String {
    "https://us1.locationiq.com/v1".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./atelier-geocode-cache.sqlite")
}

fn default_user_agent() -> String {
    "atelier/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_fallback_lat() -> f64 {
    45.5019
}

fn default_fallback_lng() -> f64 {
    -73.5674
}

fn default_batch_concurrency() -> usize {
    2
}

fn default_dispatch_interval_ms() -> u64 {
    500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider_api_key: None,
            provider_base_url: default_provider_base_url(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            fallback_lat: default_fallback_lat(),
            fallback_lng: default_fallback_lng(),
            batch_concurrency: default_batch_concurrency(),
            dispatch_interval_ms: default_dispatch_interval_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Dispatch interval as Duration for batch pacing.
    pub fn dispatch_interval(&self) -> Duration {
        Duration::from_millis(self.dispatch_interval_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `ATELIER_`
    /// 2. TOML file from `ATELIER_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("ATELIER_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("ATELIER_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the provider API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the provider API key is not set.
    pub fn require_provider_api_key(&self) -> Result<&str, ConfigError> {
        self.provider_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "provider_api_key".into(),
            hint: "Set ATELIER_PROVIDER_API_KEY environment variable".into(),
        })
    }
}

//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or `provider_base_url` is empty
    /// - `fallback_lat`/`fallback_lng` are non-finite or out of range
    /// - `batch_concurrency` is 0 or exceeds 16
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes".into(),
            });
        }
        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }
        if self.provider_base_url.is_empty() {
            return Err(ConfigError::Invalid {
                field: "provider_base_url".into(),
                reason: "must not be empty".into(),
            });
        }
        if !self.fallback_lat.is_finite() || !(-90.0..=90.0).contains(&self.fallback_lat) {
            return Err(ConfigError::Invalid {
                field: "fallback_lat".into(),
                reason: "must be a finite value in [-90, 90]".into(),
            });
        }
        if !self.fallback_lng.is_finite() || !(-180.0..=180.0).contains(&self.fallback_lng) {
            return Err(ConfigError::Invalid {
                field: "fallback_lng".into(),
                reason: "must be a finite value in [-180, 180]".into(),
            });
        }
        if self.batch_concurrency == 0 {
            return Err(ConfigError::Invalid {
                field: "batch_concurrency".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.batch_concurrency > 16 {
            return Err(ConfigError::Invalid {
                field: "batch_concurrency".into(),
                reason: "must not exceed 16".into(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_fallback_out_of_range() {
        let config = AppConfig { fallback_lat: 91.0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let config = AppConfig { fallback_lng: -181.0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_zero_concurrency() {
        let config = AppConfig { batch_concurrency: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }
}

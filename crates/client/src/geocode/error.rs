//! Geocoding provider client error types.

use std::sync::Arc;

/// Errors from the upstream geocoding API client.
///
/// Variants group into three classes the resolver cares about:
/// misconfiguration (fail loudly, never fall back), no-result and
/// transient upstream failures (degrade to the fallback coordinate,
/// never cached).
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeocodeError {
    /// Missing provider API key.
    #[error("missing API key: provider_api_key not configured")]
    MissingApiKey,

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    InvalidApiKey,

    /// Invalid query string.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Rate/quota limited by the provider.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// Well-formed address the provider could not map to a location.
    #[error("no results for address")]
    NoResults,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider returned coordinates outside the valid lat/lng domain.
    #[error("malformed coordinates: {0}")]
    Malformed(String),
}

impl GeocodeError {
    /// Operator error: missing or rejected credentials. Must surface as an
    /// outright failure instead of degrading to the fallback coordinate.
    pub fn is_misconfigured(&self) -> bool {
        matches!(self, GeocodeError::MissingApiKey | GeocodeError::InvalidApiKey)
    }

    /// Condition the resolver degrades to a fallback resolution. Every
    /// failure other than misconfiguration qualifies, including a query
    /// the client itself rejects. The next attempt for the same address
    /// must retry the real provider, so these outcomes are never cached.
    pub fn is_transient(&self) -> bool {
        !self.is_misconfigured()
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { GeocodeError::Timeout } else { GeocodeError::Network(Arc::new(err)) }
    }
}

//! Upstream geocoding API client.
//!
//! Provides a client for a LocationIQ-compatible forward-geocoding API
//! (Nominatim search schema plus API key) with rate limiting, request
//! validation, and response normalization.
//!
//! ### Specification
//!
//! - **Endpoint**: `GET {base}/search?key=...&q=...&format=json`
//! - **Authentication**: `key` query parameter; 401/403 mean the key is
//!   missing or rejected.
//! - **Rate limiting**: respects the provider's published per-second cap
//!   with a minimum request interval. The client never retries; retry and
//!   backoff policy belongs to the resolver/batch layer so it composes
//!   with caching.
//! - **Normalization**: parses the provider's stringly-typed lat/lon into
//!   a validated `Coordinates` pair.

pub mod error;
pub mod request;
pub mod response;

pub use error::GeocodeError;
pub use request::GeocodeRequest;
pub use response::{Coordinates, Place};

use async_trait::async_trait;
use reqwest::header;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use atelier_core::AppConfig;

/// Default base URL for the geocoding API.
const DEFAULT_BASE_URL: &str = "https://us1.locationiq.com/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "atelier/0.1";

/// Minimum interval between requests (free tier allows 2 req/s).
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(500);

/// Capability seam over the upstream geocoder.
///
/// The resolver and batch layers depend on this trait, so tests can swap
/// in fakes and deployments can point at alternate upstreams.
#[async_trait]
pub trait GeocodeProvider: Send + Sync + 'static {
    /// Resolve one free-form address to coordinates.
    ///
    /// A single upstream attempt: no internal retries.
    async fn resolve(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}

/// Geocoding API client configuration.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Provider API key.
    pub api_key: String,
    /// Base URL (default: https://us1.locationiq.com/v1).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: atelier/0.x).
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl GeocoderConfig {
    /// Build client configuration from the application config.
    ///
    /// Fails with `GeocodeError::MissingApiKey` if no provider key is set,
    /// so a misconfigured deployment surfaces on first upstream use.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        let api_key = config
            .require_provider_api_key()
            .map_err(|_| GeocodeError::MissingApiKey)?
            .to_string();

        Ok(Self {
            api_key,
            base_url: config.provider_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// Rate limiter to enforce request intervals.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now)),
            min_interval,
        }
    }

    /// Acquire permission to make a request, waiting if necessary.
    async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

/// LocationIQ-compatible geocoding API client.
#[derive(Debug, Clone)]
pub struct LocationIqClient {
    http: reqwest::Client,
    config: GeocoderConfig,
    rate_limiter: Arc<RateLimiter>,
}

impl LocationIqClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GeocoderConfig) -> Result<Self, GeocodeError> {
        if config.api_key.is_empty() {
            return Err(GeocodeError::MissingApiKey);
        }

        url::Url::parse(&config.base_url)
            .map_err(|e| GeocodeError::Parse(format!("invalid base_url {:?}: {e}", config.base_url)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeocodeError::Network(Arc::new(e)))?;

        Ok(Self { http, config, rate_limiter: Arc::new(RateLimiter::new(MIN_REQUEST_INTERVAL)) })
    }

    /// Create a new client from the application config.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        Self::new(GeocoderConfig::from_app_config(config)?)
    }

    /// Execute a forward-geocoding search.
    ///
    /// Handles rate limiting, request validation, and response
    /// normalization. Returns the best-ranked place for the query.
    pub async fn search(&self, req: GeocodeRequest) -> Result<Coordinates, GeocodeError> {
        req.validate()?;

        self.rate_limiter.acquire().await;

        let start = Instant::now();
        let url = format!("{}/search", self.config.base_url);

        tracing::debug!("forward geocoding: q={}", req.q);

        let http_response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .query(&[("key", self.config.api_key.as_str()), ("format", "json")])
            .query(&req)
            .send()
            .await
            .map_err(GeocodeError::from)?;

        let status = http_response.status();
        tracing::debug!("geocoding API response status: {}", status);

        if status == 401 || status == 403 {
            return Err(GeocodeError::InvalidApiKey);
        }

        // LocationIQ answers 404 with "Unable to geocode" for a well-formed
        // address it cannot map.
        if status == 404 {
            return Err(GeocodeError::NoResults);
        }

        if status == 429 {
            return Err(GeocodeError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(GeocodeError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await.map_err(GeocodeError::from)?;
        let places: Vec<Place> = serde_json::from_slice(&bytes).map_err(|e| GeocodeError::Parse(e.to_string()))?;

        let Some(best) = places.first() else {
            return Err(GeocodeError::NoResults);
        };

        let coords = Coordinates::try_from(best)?;

        tracing::debug!(
            "geocoded {:?} to ({}, {}) in {:?}",
            req.q,
            coords.latitude,
            coords.longitude,
            start.elapsed()
        );

        Ok(coords)
    }
}

#[async_trait]
impl GeocodeProvider for LocationIqClient {
    async fn resolve(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        self.search(GeocodeRequest::for_address(address)).await
    }
}

//! Single-address geocode operation.
//!
//! Resolves one free-form address through the shared resolver. Transient
//! provider failures still produce a successful response carrying the
//! fallback coordinate, so the directory map always has something to
//! render.

use serde::{Deserialize, Serialize};

use atelier_client::{GeocodeProvider, GeocodeResolver};

use crate::error::OpError;
use crate::ops::{LatLng, source_of};

/// Input parameters for the geocode operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeParams {
    /// Free-form postal address.
    pub address: String,
}

/// Output of the geocode operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeOutput {
    pub success: bool,
    pub location: LatLng,
    pub cached: bool,
    pub fallback: bool,
    /// "cache", "provider", or "fallback".
    pub source: String,
}

/// Implementation of the geocode operation.
pub async fn geocode_impl<P: GeocodeProvider>(
    resolver: &GeocodeResolver<P>, params: GeocodeParams,
) -> Result<GeocodeOutput, OpError> {
    let resolution = resolver.resolve(&params.address).await?;

    Ok(GeocodeOutput {
        success: true,
        location: resolution.coordinates.into(),
        cached: resolution.cached,
        fallback: resolution.fallback,
        source: source_of(&resolution).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use atelier_client::{Coordinates, GeocodeError};
    use atelier_core::CacheDb;

    struct FixedProvider(Result<Coordinates, GeocodeError>);

    #[async_trait]
    impl GeocodeProvider for FixedProvider {
        async fn resolve(&self, _address: &str) -> Result<Coordinates, GeocodeError> {
            self.0.clone()
        }
    }

    const DOWNTOWN: Coordinates = Coordinates { latitude: 45.5019, longitude: -73.5674 };

    async fn resolver(provider: FixedProvider) -> GeocodeResolver<FixedProvider> {
        let cache = CacheDb::open_in_memory().await.unwrap();
        GeocodeResolver::new(cache, provider, DOWNTOWN)
    }

    #[tokio::test]
    async fn test_geocode_success() {
        let coords = Coordinates::new(45.50, -73.57).unwrap();
        let resolver = resolver(FixedProvider(Ok(coords))).await;

        let output = geocode_impl(&resolver, GeocodeParams { address: "1234 Main St, Montreal".into() })
            .await
            .unwrap();

        assert!(output.success);
        assert_eq!(output.location, LatLng { lat: 45.50, lng: -73.57 });
        assert!(!output.cached);
        assert!(!output.fallback);
        assert_eq!(output.source, "provider");
    }

    #[tokio::test]
    async fn test_geocode_second_call_reports_cache_source() {
        let coords = Coordinates::new(45.50, -73.57).unwrap();
        let resolver = resolver(FixedProvider(Ok(coords))).await;
        let params = GeocodeParams { address: "1234 Main St, Montreal".into() };

        geocode_impl(&resolver, params.clone()).await.unwrap();
        let output = geocode_impl(&resolver, params).await.unwrap();

        assert!(output.cached);
        assert_eq!(output.source, "cache");
        assert_eq!(output.location, LatLng { lat: 45.50, lng: -73.57 });
    }

    #[tokio::test]
    async fn test_geocode_invalid_address() {
        let resolver = resolver(FixedProvider(Err(GeocodeError::NoResults))).await;
        let result = geocode_impl(&resolver, GeocodeParams { address: "  ".into() }).await;
        assert!(matches!(result, Err(OpError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_geocode_transient_failure_degrades() {
        let resolver = resolver(FixedProvider(Err(GeocodeError::RateLimited))).await;

        let output = geocode_impl(&resolver, GeocodeParams { address: "1234 Main St".into() })
            .await
            .unwrap();

        assert!(output.success);
        assert!(output.fallback);
        assert_eq!(output.source, "fallback");
        assert_eq!(output.location, LatLng { lat: 45.5019, lng: -73.5674 });
    }

    #[tokio::test]
    async fn test_geocode_misconfigured_errors() {
        let resolver = resolver(FixedProvider(Err(GeocodeError::MissingApiKey))).await;
        let result = geocode_impl(&resolver, GeocodeParams { address: "1234 Main St".into() }).await;
        assert!(matches!(result, Err(OpError::Misconfigured(_))));
    }
}

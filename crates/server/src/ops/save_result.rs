//! Manual-override save operation.
//!
//! Lets an administrator pin coordinates to an address without consulting
//! the provider: the address is fingerprinted and the pair upserted
//! directly into the cache. The `studio_id` belongs to the surrounding
//! directory domain and is only echoed back for the caller's bookkeeping.

use serde::{Deserialize, Serialize};

use atelier_client::Coordinates;
use atelier_core::CacheDb;
use atelier_core::cache::address_fingerprint;

use crate::error::OpError;
use crate::ops::LatLng;

/// Input parameters for the manual-override save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResultParams {
    /// Directory entity this result was verified for.
    pub studio_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// Address whose fingerprint the coordinates are stored under.
    pub address: String,
}

/// Output of the manual-override save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResultOutput {
    pub success: bool,
    pub studio_id: i64,
    pub fingerprint: String,
    pub location: LatLng,
}

/// Implementation of the manual-override save.
pub async fn save_result_impl(db: &CacheDb, params: SaveResultParams) -> Result<SaveResultOutput, OpError> {
    let coords = Coordinates::new(params.latitude, params.longitude)
        .map_err(|e| OpError::InvalidCoordinates(e.to_string()))?;
    let fingerprint = address_fingerprint(&params.address)?;

    let record = db
        .upsert_coordinates(&fingerprint, &params.address, coords.latitude, coords.longitude)
        .await?;

    tracing::info!(
        "manual geocode override for studio {} stored under {}",
        params.studio_id,
        record.fingerprint
    );

    Ok(SaveResultOutput {
        success: true,
        studio_id: params.studio_id,
        fingerprint: record.fingerprint,
        location: LatLng { lat: record.latitude, lng: record.longitude },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::cache_stats::cache_stats_impl;
    use crate::ops::geocode::{GeocodeParams, geocode_impl};
    use async_trait::async_trait;
    use atelier_client::{GeocodeError, GeocodeProvider, GeocodeResolver};

    #[tokio::test]
    async fn test_save_result_upserts() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let params = SaveResultParams {
            studio_id: 42,
            latitude: 45.53,
            longitude: -73.59,
            address: "6000 Rue Hochelaga, Montreal".into(),
        };

        let output = save_result_impl(&db, params).await.unwrap();
        assert!(output.success);
        assert_eq!(output.studio_id, 42);
        assert_eq!(output.fingerprint.len(), 64);

        let stats = cache_stats_impl(&db).await.unwrap();
        assert_eq!(stats.total_entries, 1);
    }

    #[tokio::test]
    async fn test_save_result_rejects_bad_coordinates() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let params = SaveResultParams { studio_id: 1, latitude: 91.0, longitude: 0.0, address: "1 Main St".into() };
        let result = save_result_impl(&db, params).await;
        assert!(matches!(result, Err(OpError::InvalidCoordinates(_))));
    }

    #[tokio::test]
    async fn test_save_result_rejects_empty_address() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let params = SaveResultParams { studio_id: 1, latitude: 45.0, longitude: -73.0, address: "  ".into() };
        let result = save_result_impl(&db, params).await;
        assert!(matches!(result, Err(OpError::InvalidAddress(_))));
    }

    /// Provider that always fails; a cache hit must make it irrelevant.
    struct UnreachableProvider;

    #[async_trait]
    impl GeocodeProvider for UnreachableProvider {
        async fn resolve(&self, _address: &str) -> Result<Coordinates, GeocodeError> {
            Err(GeocodeError::Timeout)
        }
    }

    #[tokio::test]
    async fn test_manual_override_round_trip() {
        let db = CacheDb::open_in_memory().await.unwrap();

        let params = SaveResultParams {
            studio_id: 7,
            latitude: 45.5312,
            longitude: -73.5934,
            address: "6000  Rue Hochelaga, Montreal".into(),
        };
        save_result_impl(&db, params).await.unwrap();

        let fallback = Coordinates::new(45.5019, -73.5674).unwrap();
        let resolver = GeocodeResolver::new(db, UnreachableProvider, fallback);

        // Differently-spaced rendering of the same address hits the saved entry.
        let output = geocode_impl(&resolver, GeocodeParams { address: "6000 Rue Hochelaga, Montreal".into() })
            .await
            .unwrap();

        assert!(output.cached);
        assert!(!output.fallback);
        assert_eq!(output.location, LatLng { lat: 45.5312, lng: -73.5934 });
    }
}

//! Geocoding operation implementations.
//!
//! This module contains the operations the (external) route layer mounts:
//! single and batch geocoding, cache statistics, and the manual-override
//! save. Each operation is a typed request/response handler.

pub mod batch_geocode;
pub mod cache_stats;
pub mod geocode;
pub mod save_result;

use serde::{Deserialize, Serialize};

use atelier_client::{Coordinates, Resolution};

pub use batch_geocode::{BatchGeocodeItem, BatchGeocodeOutput, BatchGeocodeParams, BatchSummary};
pub use cache_stats::CacheStatsOutput;
pub use geocode::{GeocodeOutput, GeocodeParams};
pub use save_result::{SaveResultOutput, SaveResultParams};

/// Location payload shape shared by all operation outputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<Coordinates> for LatLng {
    fn from(coords: Coordinates) -> Self {
        Self { lat: coords.latitude, lng: coords.longitude }
    }
}

/// Where a resolution's coordinates came from.
pub(crate) fn source_of(resolution: &Resolution) -> &'static str {
    if resolution.fallback {
        "fallback"
    } else if resolution.cached {
        "cache"
    } else {
        "provider"
    }
}

//! Batch geocode operation.
//!
//! Resolves an ordered list of addresses under the configured pacing
//! policy. One result per input address, in input order; a single item's
//! failure never aborts or reorders the rest.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use atelier_client::{BatchOptions, BatchResolver, GeocodeProvider, GeocodeResolver, Resolution, ResolveError};

use crate::error::OpError;
use crate::ops::{LatLng, source_of};

/// Input parameters for the batch geocode operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchGeocodeParams {
    /// Addresses to resolve, in order.
    pub addresses: Vec<String>,

    /// Optional override of the configured concurrency cap (1-16).
    #[serde(default)]
    pub max_concurrency: Option<u8>,
}

/// Per-address outcome, same position as the input address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchGeocodeItem {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,
    pub cached: bool,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchGeocodeItem {
    /// Map one resolver outcome onto the wire shape.
    pub fn from_outcome(outcome: &Result<Resolution, ResolveError>) -> Self {
        match outcome {
            Ok(resolution) => Self {
                success: true,
                location: Some(resolution.coordinates.into()),
                cached: resolution.cached,
                fallback: resolution.fallback,
                source: Some(source_of(resolution).to_string()),
                error: None,
            },
            Err(e) => Self {
                success: false,
                location: None,
                cached: false,
                fallback: false,
                source: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Batch summary statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: u32,
    pub from_cache: u32,
    pub from_provider: u32,
    pub fallback: u32,
    pub failed: u32,
}

/// Output of the batch geocode operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchGeocodeOutput {
    pub success: bool,
    /// Individual results, in input order.
    pub results: Vec<BatchGeocodeItem>,
    pub summary: BatchSummary,
}

/// Implementation of the batch geocode operation.
pub async fn batch_geocode_impl<P: GeocodeProvider>(
    resolver: &Arc<GeocodeResolver<P>>, options: &BatchOptions, params: BatchGeocodeParams,
) -> Result<BatchGeocodeOutput, OpError> {
    if params.addresses.is_empty() {
        return Err(OpError::InvalidAddress("addresses cannot be empty".into()));
    }

    let mut options = options.clone();
    if let Some(cap) = params.max_concurrency {
        if cap == 0 {
            return Err(OpError::InvalidAddress("max_concurrency must be at least 1".into()));
        }
        options.max_concurrency = (cap as usize).min(16);
    }

    let batch = BatchResolver::new(Arc::clone(resolver), options);
    let outcomes = batch.resolve_all(&params.addresses).await;

    let results: Vec<BatchGeocodeItem> = outcomes.iter().map(BatchGeocodeItem::from_outcome).collect();

    let mut summary =
        BatchSummary { total: results.len() as u32, from_cache: 0, from_provider: 0, fallback: 0, failed: 0 };
    for item in &results {
        match item.source.as_deref() {
            Some("cache") => summary.from_cache += 1,
            Some("provider") => summary.from_provider += 1,
            Some("fallback") => summary.fallback += 1,
            _ => summary.failed += 1,
        }
    }

    Ok(BatchGeocodeOutput { success: true, results, summary })
}

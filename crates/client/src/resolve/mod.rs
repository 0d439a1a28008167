//! Single-address geocode resolution.
//!
//! Orchestrates normalize -> cache lookup -> provider call -> cache write
//! -> fallback policy for one address. Concurrent resolutions of the same
//! fingerprint are coalesced so at most one provider call is in flight per
//! address.
//!
//! The one invariant everything here protects: a successful provider
//! result is cached, a fallback result never is. Persisting a fallback
//! would permanently pin a wrong location to an address that only failed
//! transiently.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::{Mutex, broadcast};

use atelier_core::CacheDb;
use atelier_core::cache::{fingerprint, normalize_address};

use crate::geocode::{Coordinates, GeocodeProvider};

/// Outcome of resolving one address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    pub coordinates: Coordinates,
    /// True when the coordinates came from the cache.
    pub cached: bool,
    /// True when the provider failed and the configured fallback
    /// coordinate was substituted. Never cached.
    pub fallback: bool,
}

/// The only conditions reported as outright failures; everything else
/// resolves with a `fallback` flag.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    /// Empty or whitespace-only address; rejected before any I/O.
    #[error("INVALID_ADDRESS: {0}")]
    InvalidAddress(String),

    /// Provider credentials missing or rejected. Fails loudly instead of
    /// degrading, so an operator error is never masked as map noise.
    #[error("MISCONFIGURED: {0}")]
    Misconfigured(String),
}

type Outcome = Result<Resolution, ResolveError>;

/// Resolves single addresses against the cache and the upstream provider.
pub struct GeocodeResolver<P> {
    cache: CacheDb,
    provider: P,
    fallback: Coordinates,
    in_flight: Mutex<HashMap<String, broadcast::Sender<Outcome>>>,
}

impl<P: GeocodeProvider> GeocodeResolver<P> {
    /// Create a resolver around an injected cache, provider, and the
    /// caller-configured fallback coordinate.
    pub fn new(cache: CacheDb, provider: P, fallback: Coordinates) -> Self {
        Self { cache, provider, fallback, in_flight: Mutex::new(HashMap::new()) }
    }

    /// Access the injected provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The degraded outcome substituted when the provider cannot resolve
    /// an address.
    pub fn fallback_resolution(&self) -> Resolution {
        Resolution { coordinates: self.fallback, cached: false, fallback: true }
    }

    /// Resolve one raw address.
    ///
    /// 1. Normalize; invalid input surfaces immediately, before any I/O.
    /// 2. Cache lookup by fingerprint; a hit short-circuits the provider.
    ///    A cache read failure is logged and treated as a miss.
    /// 3. On a miss, coalesce with any in-flight resolution of the same
    ///    fingerprint; otherwise call the provider once.
    /// 4. A provider success is upserted into the cache (best-effort); any
    ///    transient provider failure degrades to the fallback coordinate
    ///    and is never persisted.
    pub async fn resolve(&self, raw: &str) -> Outcome {
        let normalized = normalize_address(raw).map_err(|e| match e {
            atelier_core::Error::InvalidAddress(msg) => ResolveError::InvalidAddress(msg),
            other => ResolveError::InvalidAddress(other.to_string()),
        })?;
        let fp = fingerprint(&normalized);

        match self.cache.get_record(&fp).await {
            Ok(Some(record)) => {
                tracing::debug!("cache hit for fingerprint {}", fp);
                return Ok(Resolution {
                    coordinates: Coordinates { latitude: record.latitude, longitude: record.longitude },
                    cached: true,
                    fallback: false,
                });
            }
            Ok(None) => {}
            // Cache durability is best-effort; an unreachable store must
            // not abort resolution.
            Err(e) => tracing::warn!("cache read failed for fingerprint {}: {}", fp, e),
        }

        enum Flight {
            Leader(broadcast::Sender<Outcome>),
            Follower(broadcast::Receiver<Outcome>),
        }

        let flight = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(tx) = in_flight.get(&fp) {
                Flight::Follower(tx.subscribe())
            } else {
                let (tx, _rx) = broadcast::channel(1);
                in_flight.insert(fp.clone(), tx.clone());
                Flight::Leader(tx)
            }
        };

        match flight {
            Flight::Follower(mut rx) => {
                tracing::debug!("coalescing with in-flight resolution for {}", fp);
                match rx.recv().await {
                    Ok(outcome) => outcome,
                    // Leader vanished without broadcasting; resolve on our own.
                    Err(e) => {
                        tracing::warn!("coalesced resolution lost for {}: {}", fp, e);
                        self.resolve_miss(&normalized, raw).await
                    }
                }
            }
            Flight::Leader(tx) => {
                let outcome = self.resolve_miss(&normalized, raw).await;
                self.in_flight.lock().await.remove(&fp);
                // Nobody listening is fine; the send only feeds followers.
                let _ = tx.send(outcome.clone());
                outcome
            }
        }
    }

    /// Call the provider for an uncached address and apply the caching
    /// and fallback policy to its result.
    async fn resolve_miss(&self, normalized: &str, raw: &str) -> Outcome {
        match self.provider.resolve(normalized).await {
            Ok(coordinates) => {
                let fp = fingerprint(normalized);
                if let Err(e) = self
                    .cache
                    .upsert_coordinates(&fp, raw, coordinates.latitude, coordinates.longitude)
                    .await
                {
                    tracing::warn!("failed to cache geocode result for {}: {}", fp, e);
                }
                Ok(Resolution { coordinates, cached: false, fallback: false })
            }
            Err(e) if e.is_transient() => {
                tracing::warn!("geocoding failed for {:?}, using fallback: {}", normalized, e);
                Ok(self.fallback_resolution())
            }
            Err(e) => {
                tracing::error!("geocoding provider misconfigured: {}", e);
                Err(ResolveError::Misconfigured(e.to_string()))
            }
        }
    }
}

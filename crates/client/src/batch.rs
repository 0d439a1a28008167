//! Batch geocode resolution with bounded concurrency and pacing.
//!
//! Resolves an ordered list of addresses through the shared
//! [`GeocodeResolver`], dispatching under a concurrency cap and an
//! inter-dispatch delay so a bulk back-fill stays under the upstream
//! provider's rate limit. Output order always equals input order, one
//! outcome per input, even when items complete out of order or fail.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;

use crate::geocode::GeocodeProvider;
use crate::resolve::{GeocodeResolver, Resolution, ResolveError};

/// Pacing policy for batch dispatch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum number of concurrently in-flight resolutions (capped at 16).
    pub max_concurrency: usize,
    /// Delay inserted between consecutive dispatches.
    pub dispatch_interval: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { max_concurrency: 2, dispatch_interval: Duration::from_millis(500) }
    }
}

/// Resolves many addresses while respecting the provider's rate limit.
pub struct BatchResolver<P> {
    resolver: Arc<GeocodeResolver<P>>,
    options: BatchOptions,
}

impl<P: GeocodeProvider> BatchResolver<P> {
    pub fn new(resolver: Arc<GeocodeResolver<P>>, options: BatchOptions) -> Self {
        Self { resolver, options }
    }

    /// Resolve every address, in input order.
    ///
    /// A per-item transient failure degrades that item to its fallback
    /// outcome without aborting the rest; `InvalidAddress` and
    /// `Misconfigured` stay per-item errors in the output.
    pub async fn resolve_all(&self, addresses: &[String]) -> Vec<Result<Resolution, ResolveError>> {
        let (_tx, rx) = watch::channel(false);
        self.resolve_all_with_cancel(addresses, rx).await
    }

    /// Resolve every address, honoring a cancellation signal.
    ///
    /// Once `cancel` flips to true no further items are dispatched;
    /// in-flight items run to completion (and still populate the cache).
    /// Items never dispatched degrade to the fallback outcome so the
    /// output keeps the input's order and cardinality.
    pub async fn resolve_all_with_cancel(
        &self, addresses: &[String], cancel: watch::Receiver<bool>,
    ) -> Vec<Result<Resolution, ResolveError>> {
        let max_concurrency = self.options.max_concurrency.clamp(1, 16);
        let semaphore = Arc::new(Semaphore::new(max_concurrency));
        let mut join_set = JoinSet::new();

        for (idx, address) in addresses.iter().enumerate() {
            if *cancel.borrow() {
                tracing::info!("batch cancelled after dispatching {} of {} items", idx, addresses.len());
                break;
            }
            if idx > 0 && !self.options.dispatch_interval.is_zero() {
                tokio::time::sleep(self.options.dispatch_interval).await;
            }

            let permit = semaphore.clone().acquire_owned().await.unwrap();
            // The permit wait can outlast a cancellation; check again
            // before committing this item.
            if *cancel.borrow() {
                tracing::info!("batch cancelled after dispatching {} of {} items", idx, addresses.len());
                break;
            }
            let resolver = Arc::clone(&self.resolver);
            let address = address.clone();

            join_set.spawn(async move {
                // NOTE: Hold permit for task duration to enforce concurrency limit
                let _permit = permit;
                (idx, resolver.resolve(&address).await)
            });
        }

        let mut slots: Vec<Option<Result<Resolution, ResolveError>>> = vec![None; addresses.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, outcome)) => slots[idx] = Some(outcome),
                Err(e) => tracing::error!("batch resolution task failed: {}", e),
            }
        }

        // Undispatched (cancelled) or panicked slots degrade to fallback;
        // the output stays positionally aligned with the input.
        slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| Ok(self.resolver.fallback_resolution())))
            .collect()
    }
}

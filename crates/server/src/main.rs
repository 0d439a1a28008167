//! atelier-geocoder: bulk geocode back-fill tool.
//!
//! Reads one address per line on stdin, resolves them through the shared
//! cache and the rate-paced batch resolver, and writes one JSON outcome
//! per line on stdout. Logging goes to stderr so stdout stays parseable.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use atelier_client::{BatchOptions, BatchResolver, Coordinates, GeocodeResolver, LocationIqClient};
use atelier_core::{AppConfig, CacheDb};
use atelier_server::ops::BatchGeocodeItem;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let db = CacheDb::open(&config.db_path).await?;
    let provider = LocationIqClient::from_app_config(&config)?;
    let fallback = Coordinates::new(config.fallback_lat, config.fallback_lng)?;

    let resolver = Arc::new(GeocodeResolver::new(db, provider, fallback));
    let batch = BatchResolver::new(
        resolver,
        BatchOptions { max_concurrency: config.batch_concurrency, dispatch_interval: config.dispatch_interval() },
    );

    let mut addresses = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            addresses.push(line);
        }
    }

    tracing::info!("resolving {} addresses", addresses.len());

    let outcomes = batch.resolve_all(&addresses).await;

    let mut fallbacks = 0usize;
    let mut failures = 0usize;
    for (address, outcome) in addresses.iter().zip(&outcomes) {
        let item = BatchGeocodeItem::from_outcome(outcome);
        if item.fallback {
            fallbacks += 1;
        }
        if !item.success {
            failures += 1;
        }

        let line = serde_json::json!({ "address": address, "result": item });
        println!("{line}");
    }

    tracing::info!(
        "batch complete: {} resolved, {} fallback, {} failed",
        outcomes.len() - fallbacks - failures,
        fallbacks,
        failures
    );

    Ok(())
}

//! Cache statistics operation.

use serde::{Deserialize, Serialize};

use atelier_core::CacheDb;

use crate::error::OpError;

/// Output of the cache stats operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatsOutput {
    pub success: bool,
    pub total_entries: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_entry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_entry: Option<String>,
}

/// Implementation of the cache stats operation.
pub async fn cache_stats_impl(db: &CacheDb) -> Result<CacheStatsOutput, OpError> {
    let stats = db.stats().await?;

    Ok(CacheStatsOutput {
        success: true,
        total_entries: stats.total_entries,
        oldest_entry: stats.oldest_entry,
        newest_entry: stats.newest_entry,
    })
}

//! Geocode cache record operations.
//!
//! Provides upsert, lookup, and statistics over the `geocode_cache` table.
//! A record is only ever written for a real provider result or an explicit
//! manual override; callers must never store fallback coordinates here.

use super::connection::CacheDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// One resolved, non-fallback geocoding result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeRecord {
    /// SHA-256 hex digest of the normalized address; primary key.
    pub fingerprint: String,
    /// The raw address as first submitted. Audit/debug only, never used
    /// for lookup and never overwritten by later upserts.
    pub original_address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// RFC 3339, set on insert and preserved on update.
    pub created_at: String,
    /// RFC 3339, bumped on every upsert of the same fingerprint.
    pub updated_at: String,
}

/// Aggregate statistics over the cache table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: u64,
    /// MIN(created_at), None when the cache is empty.
    pub oldest_entry: Option<String>,
    /// MAX(updated_at), None when the cache is empty.
    pub newest_entry: Option<String>,
}

impl CacheDb {
    /// Insert or refresh the coordinates stored for a fingerprint.
    ///
    /// Uses UPSERT semantics: inserts if the fingerprint doesn't exist,
    /// otherwise updates only `latitude`, `longitude`, and `updated_at`.
    /// `original_address` and `created_at` keep their first-submitted
    /// values. Returns the stored record.
    pub async fn upsert_coordinates(
        &self, fingerprint: &str, original_address: &str, latitude: f64, longitude: f64,
    ) -> Result<GeocodeRecord, Error> {
        let fingerprint = fingerprint.to_string();
        let original_address = original_address.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<GeocodeRecord, Error> {
                conn.execute(
                    "INSERT INTO geocode_cache (
                        fingerprint, original_address, latitude, longitude, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                    ON CONFLICT(fingerprint) DO UPDATE SET
                        latitude = excluded.latitude,
                        longitude = excluded.longitude,
                        updated_at = excluded.updated_at",
                    params![fingerprint, original_address, latitude, longitude, now],
                )?;

                let record = conn.query_row(
                    "SELECT fingerprint, original_address, latitude, longitude, created_at, updated_at
                     FROM geocode_cache WHERE fingerprint = ?1",
                    params![fingerprint],
                    row_to_record,
                )?;
                Ok(record)
            })
            .await
            .map_err(Error::from)
    }

    /// Get a cached record by fingerprint.
    ///
    /// Returns None if the fingerprint doesn't exist in the cache.
    pub async fn get_record(&self, fingerprint: &str) -> Result<Option<GeocodeRecord>, Error> {
        let fingerprint = fingerprint.to_string();
        self.conn
            .call(move |conn| -> Result<Option<GeocodeRecord>, Error> {
                let result = conn.query_row(
                    "SELECT fingerprint, original_address, latitude, longitude, created_at, updated_at
                     FROM geocode_cache WHERE fingerprint = ?1",
                    params![fingerprint],
                    row_to_record,
                );

                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Aggregate statistics over all cached entries.
    pub async fn stats(&self) -> Result<CacheStats, Error> {
        self.conn
            .call(|conn| -> Result<CacheStats, Error> {
                let stats = conn.query_row(
                    "SELECT COUNT(*), MIN(created_at), MAX(updated_at) FROM geocode_cache",
                    [],
                    |row| {
                        Ok(CacheStats {
                            total_entries: row.get::<_, i64>(0)? as u64,
                            oldest_entry: row.get(1)?,
                            newest_entry: row.get(2)?,
                        })
                    },
                )?;
                Ok(stats)
            })
            .await
            .map_err(Error::from)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<GeocodeRecord, rusqlite::Error> {
    Ok(GeocodeRecord {
        fingerprint: row.get(0)?,
        original_address: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::fingerprint::address_fingerprint;

    #[tokio::test]
    async fn test_upsert_and_get() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let fp = address_fingerprint("1234 Main St, Montreal").unwrap();

        db.upsert_coordinates(&fp, "1234 Main St, Montreal", 45.50, -73.57)
            .await
            .unwrap();

        let record = db.get_record(&fp).await.unwrap().unwrap();
        assert_eq!(record.fingerprint, fp);
        assert_eq!(record.original_address, "1234 Main St, Montreal");
        assert_eq!(record.latitude, 45.50);
        assert_eq!(record.longitude, -73.57);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let result = db.get_record("nonexistent").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_upsert_refreshes_coordinates_only() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let fp = address_fingerprint("5678 St Laurent Blvd").unwrap();

        let first = db
            .upsert_coordinates(&fp, "5678 St Laurent Blvd", 45.51, -73.58)
            .await
            .unwrap();
        let second = db
            .upsert_coordinates(&fp, "5678  ST LAURENT  BLVD", 45.52, -73.59)
            .await
            .unwrap();

        assert_eq!(second.latitude, 45.52);
        assert_eq!(second.longitude, -73.59);
        // First-submitted values survive later upserts.
        assert_eq!(second.original_address, "5678 St Laurent Blvd");
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn test_stats_empty() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let stats = db.stats().await.unwrap();
        assert_eq!(stats.total_entries, 0);
        assert!(stats.oldest_entry.is_none());
        assert!(stats.newest_entry.is_none());
    }

    #[tokio::test]
    async fn test_stats_counts_distinct_fingerprints() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let fp1 = address_fingerprint("1 First Ave").unwrap();
        let fp2 = address_fingerprint("2 Second Ave").unwrap();

        db.upsert_coordinates(&fp1, "1 First Ave", 45.0, -73.0).await.unwrap();
        db.upsert_coordinates(&fp2, "2 Second Ave", 46.0, -74.0).await.unwrap();
        db.upsert_coordinates(&fp1, "1 First Ave", 45.1, -73.1).await.unwrap();

        let stats = db.stats().await.unwrap();
        assert_eq!(stats.total_entries, 2);
        assert!(stats.oldest_entry.is_some());
        assert!(stats.newest_entry.is_some());
    }
}

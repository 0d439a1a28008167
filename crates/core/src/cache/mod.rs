//! SQLite-backed geocode cache.
//!
//! This module provides a persistent, fingerprint-addressed cache of
//! successful geocoding results using SQLite with async access via
//! tokio-rusqlite. It supports:
//!
//! - Fingerprint-addressed storage using SHA-256 over normalized addresses
//! - Upsert semantics with last-writer-wins per fingerprint
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//!
//! Entries are written only for real provider results (or explicit manual
//! overrides); fallback resolutions are never persisted.

pub mod connection;
pub mod fingerprint;
pub mod migrations;
pub mod records;

pub use crate::Error;

pub use connection::CacheDb;
pub use fingerprint::{address_fingerprint, fingerprint, normalize_address};
pub use records::{CacheStats, GeocodeRecord};

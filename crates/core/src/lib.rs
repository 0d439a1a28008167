//! Core types and shared functionality for the atelier geocoding subsystem.
//!
//! This crate provides:
//! - Geocode cache with SQLite backend, keyed by address fingerprints
//! - Address normalization and fingerprint derivation
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheDb, CacheStats, GeocodeRecord};
pub use config::AppConfig;
pub use error::Error;

//! Address normalization and cache key derivation.
//!
//! The cache is keyed by a SHA-256 digest of the normalized address so that
//! trivially different renderings of the same address ("1234  Main St" vs
//! "1234 main st ") collapse to the same entry. Normalization must stay
//! deterministic across releases: changing it silently orphans every
//! existing cache row.

use crate::Error;
use sha2::{Digest, Sha256};

/// Normalize a raw postal address for fingerprinting.
///
/// Folds case, collapses internal whitespace runs to single spaces, and
/// trims leading/trailing whitespace.
///
/// # Errors
///
/// Returns `Error::InvalidAddress` for empty or whitespace-only input.
pub fn normalize_address(raw: &str) -> Result<String, Error> {
    if raw.trim().is_empty() {
        return Err(Error::InvalidAddress("address cannot be empty".to_string()));
    }

    let normalized = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    Ok(normalized)
}

/// Compute the cache fingerprint of an already-normalized address.
pub fn fingerprint(normalized: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

/// Normalize a raw address and compute its fingerprint in one step.
///
/// # Errors
///
/// Returns `Error::InvalidAddress` for empty or whitespace-only input.
pub fn address_fingerprint(raw: &str) -> Result<String, Error> {
    Ok(fingerprint(&normalize_address(raw)?))
}

//! Unified error types for the atelier geocoding core.

use tokio_rusqlite::rusqlite;

/// Unified error types for the cache and fingerprint layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Address is empty or whitespace-only.
    #[error("INVALID_ADDRESS: {0}")]
    InvalidAddress(String),

    /// Latitude/longitude out of range or non-finite.
    #[error("INVALID_COORDINATES: {0}")]
    InvalidCoordinates(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidAddress("empty address".to_string());
        assert!(err.to_string().contains("INVALID_ADDRESS"));
        assert!(err.to_string().contains("empty address"));
    }

    #[test]
    fn test_coordinate_error_display() {
        let err = Error::InvalidCoordinates("latitude 99 out of range".to_string());
        assert!(err.to_string().contains("INVALID_COORDINATES"));
    }
}

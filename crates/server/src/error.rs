//! Structured errors for the geocoding operation layer.
//!
//! Only invalid input and provider misconfiguration surface as outright
//! failures to the route layer; transient upstream conditions resolve
//! successfully with a fallback flag instead.

use serde::{Deserialize, Serialize};

use atelier_client::ResolveError;

/// Structured errors for the geocoding operations.
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    /// Empty or otherwise unusable address input.
    #[error("INVALID_ADDRESS: {0}")]
    InvalidAddress(String),

    /// Latitude/longitude out of range in a manual override.
    #[error("INVALID_COORDINATES: {0}")]
    InvalidCoordinates(String),

    /// Provider credentials missing or rejected.
    #[error("MISCONFIGURED: {0}")]
    Misconfigured(String),

    /// Cache/storage failure on an operation that cannot degrade.
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl OpError {
    /// Stable machine-readable code for the route layer's error payload.
    pub fn code(&self) -> &'static str {
        match self {
            OpError::InvalidAddress(_) => "INVALID_ADDRESS",
            OpError::InvalidCoordinates(_) => "INVALID_COORDINATES",
            OpError::Misconfigured(_) => "MISCONFIGURED",
            OpError::Internal(_) => "INTERNAL",
        }
    }

    /// Serialize into the `{ success: false, error: { code, message } }`
    /// payload shape.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            OpError::InvalidAddress(msg)
            | OpError::InvalidCoordinates(msg)
            | OpError::Misconfigured(msg)
            | OpError::Internal(msg) => msg.clone(),
        };
        ErrorResponse { success: false, error: ErrorDetail { code: self.code().to_string(), message } }
    }
}

/// Failure payload returned to the route layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl From<ResolveError> for OpError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::InvalidAddress(msg) => OpError::InvalidAddress(msg),
            ResolveError::Misconfigured(msg) => OpError::Misconfigured(msg),
        }
    }
}

impl From<atelier_core::Error> for OpError {
    fn from(err: atelier_core::Error) -> Self {
        match err {
            atelier_core::Error::InvalidAddress(msg) => OpError::InvalidAddress(msg),
            atelier_core::Error::InvalidCoordinates(msg) => OpError::InvalidCoordinates(msg),
            other => OpError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(OpError::InvalidAddress("x".into()).code(), "INVALID_ADDRESS");
        assert_eq!(OpError::Misconfigured("x".into()).code(), "MISCONFIGURED");
    }

    #[test]
    fn test_error_response_shape() {
        let response = OpError::InvalidAddress("address cannot be empty".into()).to_response();
        assert!(!response.success);
        assert_eq!(response.error.code, "INVALID_ADDRESS");

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("INVALID_ADDRESS"));
    }

    #[test]
    fn test_from_resolve_error() {
        let err: OpError = ResolveError::Misconfigured("invalid API key".into()).into();
        assert!(matches!(err, OpError::Misconfigured(_)));
    }
}

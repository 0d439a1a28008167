//! Forward-geocoding request types and validation.

use serde::Serialize;

/// Search request parameters for the LocationIQ-compatible forward
/// geocoding endpoint.
///
/// Based on the LocationIQ Search API documentation:
/// https://docs.locationiq.com/reference/search
#[derive(Debug, Clone, Serialize, Default)]
pub struct GeocodeRequest {
    /// Free-form address query (required).
    pub q: String,

    /// Maximum number of results (1-50, default 1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u8>,

    /// Restrict results to listed countries (comma-separated
    /// ISO 3166-1 alpha-2 codes, e.g., "ca,us").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countrycodes: Option<String>,

    /// Preferred language for results (e.g., "en" or "fr").
    #[serde(rename = "accept-language", skip_serializing_if = "Option::is_none")]
    pub accept_language: Option<String>,
}

impl GeocodeRequest {
    /// Build a single-result request for one address.
    pub fn for_address(address: impl Into<String>) -> Self {
        Self { q: address.into(), limit: Some(1), ..Default::default() }
    }

    /// Validate the request parameters.
    ///
    /// Returns an error if the query is empty or any parameter is out of
    /// range.
    pub fn validate(&self) -> Result<(), crate::geocode::GeocodeError> {
        use crate::geocode::GeocodeError;

        if self.q.trim().is_empty() {
            return Err(GeocodeError::InvalidQuery("query cannot be empty".to_string()));
        }

        let length = self.q.chars().count();
        if length > 300 {
            return Err(GeocodeError::InvalidQuery(format!("query too long: {length} chars (max 300)")));
        }

        if let Some(limit) = self.limit
            && !(1..=50).contains(&limit)
        {
            return Err(GeocodeError::InvalidQuery("limit must be 1-50".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::GeocodeError;

    #[test]
    fn test_valid_request() {
        let req = GeocodeRequest::for_address("1234 Main St, Montreal");
        assert_eq!(req.limit, Some(1));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_query() {
        let req = GeocodeRequest { q: "  ".to_string(), ..Default::default() };
        assert!(matches!(req.validate(), Err(GeocodeError::InvalidQuery(_))));
    }

    #[test]
    fn test_query_too_long() {
        let req = GeocodeRequest { q: "a".repeat(301), ..Default::default() };
        assert!(matches!(req.validate(), Err(GeocodeError::InvalidQuery(_))));
    }

    #[test]
    fn test_length_limit_counts_chars_not_bytes() {
        // 300 two-byte characters stay within the limit.
        let req = GeocodeRequest { q: "é".repeat(300), ..Default::default() };
        assert!(req.validate().is_ok());

        let req = GeocodeRequest { q: "é".repeat(301), ..Default::default() };
        assert!(matches!(req.validate(), Err(GeocodeError::InvalidQuery(_))));
    }

    #[test]
    fn test_invalid_limit() {
        let req = GeocodeRequest { q: "test".to_string(), limit: Some(0), ..Default::default() };
        assert!(req.validate().is_err());

        let req = GeocodeRequest { q: "test".to_string(), limit: Some(51), ..Default::default() };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_accept_language_rename() {
        let req = GeocodeRequest {
            q: "test".to_string(),
            accept_language: Some("fr".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("accept-language"));
    }
}

//! Forward-geocoding response types and normalization.

use serde::{Deserialize, Serialize};

use crate::geocode::GeocodeError;

/// One raw place from the LocationIQ-compatible search endpoint.
///
/// Coordinates arrive as JSON strings in the Nominatim schema.
#[derive(Debug, Deserialize)]
pub struct Place {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub importance: Option<f64>,
}

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Construct a pair, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeocodeError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeocodeError::Malformed(format!("latitude {latitude} out of range")));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeocodeError::Malformed(format!("longitude {longitude} out of range")));
        }
        Ok(Self { latitude, longitude })
    }
}

impl TryFrom<&Place> for Coordinates {
    type Error = GeocodeError;

    fn try_from(place: &Place) -> Result<Self, Self::Error> {
        let latitude: f64 = place
            .lat
            .parse()
            .map_err(|_| GeocodeError::Parse(format!("unparseable latitude {:?}", place.lat)))?;
        let longitude: f64 = place
            .lon
            .parse()
            .map_err(|_| GeocodeError::Parse(format!("unparseable longitude {:?}", place.lon)))?;
        Coordinates::new(latitude, longitude)
    }
}

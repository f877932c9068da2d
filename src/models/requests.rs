use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::geolocation::GeolocationError;
use crate::models::Coordinate;

/// Position fix as reported by the browser, or the reason it could not get one
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocateRequest {
    #[validate(nested)]
    #[serde(default)]
    pub position: Option<CoordinateInput>,
    #[serde(default)]
    pub error: Option<GeolocationError>,
}

/// `range` lets NaN through since every comparison with it is false
fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("not_finite"))
    }
}

/// A latitude/longitude pair sent by a client
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct CoordinateInput {
    #[validate(range(min = -90.0, max = 90.0), custom(function = "validate_finite"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0), custom(function = "validate_finite"))]
    pub longitude: f64,
}

impl From<CoordinateInput> for Coordinate {
    fn from(input: CoordinateInput) -> Self {
        Coordinate::new(input.latitude, input.longitude)
    }
}

/// Query string for the adaptive radius endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct RadiusQuery {
    #[validate(range(min = -90.0, max = 90.0), custom(function = "validate_finite"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0), custom(function = "validate_finite"))]
    pub lng: f64,
}

/// Query string for the nearby pharmacy search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyQuery {
    #[validate(range(min = -90.0, max = 90.0), custom(function = "validate_finite"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0), custom(function = "validate_finite"))]
    pub lng: f64,
    #[validate(range(min = 1, max = 1000))]
    #[serde(default)]
    pub radius: Option<u32>,
    #[serde(default, rename = "is24h")]
    pub is_24h: bool,
    #[serde(default, rename = "openSunday")]
    pub open_sunday: bool,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Request to start a bulk sync
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StartSyncRequest {
    #[validate(length(min = 1))]
    #[serde(default, rename = "citySlugs")]
    pub city_slugs: Option<Vec<String>>,
}

/// Query string for the medicine lookup
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MedicineSearchQuery {
    #[validate(length(min = 2, max = 100))]
    pub q: String,
}

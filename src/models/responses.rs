use serde::{Deserialize, Serialize};

use crate::core::geolocation::OriginSource;
use crate::models::domain::{City, Coordinate, Medicine, Pharmacy};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Nearest city lookup result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestCityResponse {
    pub city: Option<City>,
    /// `None` when no city matched
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
}

/// Everything the UI needs after asking for the user's position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocateResponse {
    pub origin: Coordinate,
    pub source: OriginSource,
    #[serde(rename = "nearestCity")]
    pub nearest_city: NearestCityResponse,
    #[serde(rename = "radiusKm")]
    pub radius_km: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadiusResponse {
    #[serde(rename = "radiusKm")]
    pub radius_km: u32,
    #[serde(rename = "withinRegion")]
    pub within_region: bool,
}

/// A pharmacy annotated with its distance from the search origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyPharmacy {
    #[serde(flatten)]
    pub pharmacy: Pharmacy,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyResponse {
    pub pharmacies: Vec<NearbyPharmacy>,
    #[serde(rename = "radiusKm")]
    pub radius_km: u32,
    pub total_results: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineSearchResponse {
    pub medicines: Vec<Medicine>,
    pub total_results: usize,
}

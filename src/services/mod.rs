// Service exports
pub mod directory;
pub mod pharmacy_api;

pub use directory::{bundled_cities, CityDirectory, CitySource, DirectoryError};
pub use pharmacy_api::{ApiError, PharmacyApiClient};

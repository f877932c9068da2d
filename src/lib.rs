//! Apoteka - geolocation and data sync core for the Apoteka pharmacy directory
//!
//! This library resolves a user's position to the nearest known city, picks an
//! adaptive search radius, ranks nearby pharmacies, and drives the sequential
//! per-city data sync against the upstream pharmacy API.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;
pub mod sync;

// Re-export commonly used types
pub use crate::core::{adaptive_radius_km, find_nearest, haversine_distance, HomeRegion, NearbySearch};
pub use models::{City, Coordinate, NearestResult, Pharmacy, ReferencePoint, SyncTask};
pub use sync::{SyncOrchestrator, SyncQueueState};

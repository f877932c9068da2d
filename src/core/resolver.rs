//! Nearest-entity resolution and the adaptive search radius.
//!
//! Candidate sets are small (tens of cities, a few hundred pharmacies), so
//! resolution is a single linear scan with no spatial index.

use geo::{coord, Intersects, Rect};
use serde::{Deserialize, Serialize};

use crate::core::distance::distance_km;
use crate::models::{Coordinate, Located, NearestResult};

/// Radius used when the origin lies inside the home region
pub const LOCAL_RADIUS_KM: u32 = 10;

/// Distance bands applied outside the home region, ascending, first match wins
const RADIUS_BANDS: [(f64, u32); 3] = [(100.0, 50), (500.0, 100), (2000.0, 200)];

/// Radius for anything beyond the last band
const REMOTE_RADIUS_KM: u32 = 500;

/// Find the candidate closest to `origin`.
///
/// Candidates without a valid location are skipped. Ties go to the candidate
/// that appears first in `candidates`.
pub fn find_nearest<'a, T: Located>(origin: Coordinate, candidates: &'a [T]) -> NearestResult<'a, T> {
    let mut nearest = NearestResult::none();

    for candidate in candidates {
        let Some(location) = candidate.location() else {
            continue;
        };

        let distance = distance_km(origin, location);
        if distance < nearest.distance_km {
            nearest = NearestResult {
                point: Some(candidate),
                distance_km: distance,
            };
        }
    }

    nearest
}

/// The service's home region: a fixed bounding box plus a reference center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeRegion {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub center: Coordinate,
}

impl HomeRegion {
    /// Montenegro, centered on Podgorica
    pub const MONTENEGRO: HomeRegion = HomeRegion {
        north: 43.56,
        south: 41.85,
        east: 20.36,
        west: 18.43,
        center: Coordinate::new(42.4415, 19.2621),
    };

    fn bounds(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.west, y: self.south },
            coord! { x: self.east, y: self.north },
        )
    }

    /// Inclusive containment test against the bounding box
    pub fn contains(&self, point: Coordinate) -> bool {
        point.is_valid()
            && self
                .bounds()
                .intersects(&coord! { x: point.longitude, y: point.latitude })
    }

    /// Adaptive radius measured against this region's own center
    pub fn radius_for(&self, origin: Coordinate) -> u32 {
        self.radius_with_center(origin, self.center)
    }

    fn radius_with_center(&self, origin: Coordinate, center: Coordinate) -> u32 {
        if self.contains(origin) {
            return LOCAL_RADIUS_KM;
        }

        let distance = distance_km(origin, center);
        RADIUS_BANDS
            .iter()
            .find(|(limit, _)| distance < *limit)
            .map(|(_, radius)| *radius)
            .unwrap_or(REMOTE_RADIUS_KM)
    }
}

impl Default for HomeRegion {
    fn default() -> Self {
        Self::MONTENEGRO
    }
}

/// Search radius in kilometers for a user at `origin`.
///
/// Origins inside the Montenegro bounding box always get the local radius;
/// everyone else is banded by distance to `region_center`.
pub fn adaptive_radius_km(origin: Coordinate, region_center: Coordinate) -> u32 {
    HomeRegion::MONTENEGRO.radius_with_center(origin, region_center)
}

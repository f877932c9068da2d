use crate::models::{BoundingBox, Coordinate};

/// Earth's radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers. Identical and antipodal points never yield NaN.
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // rounding can push `a` a hair past 1.0 near the antipode
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two coordinates in kilometers
#[inline]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Kilometers spanned by one degree of latitude on the haversine sphere
const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// Degree box that fully encloses the circle of `radius_km` around a point.
///
/// Latitude is clamped to the poles. The longitude half-width is the widest
/// point of the circle, `asin(sin(d) / cos(lat))`; when the circle reaches a
/// pole there is no such point and the box covers every longitude.
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE;
    let min_lat = (lat - lat_delta).max(-90.0);
    let max_lat = (lat + lat_delta).min(90.0);

    let angular = radius_km / EARTH_RADIUS_KM;
    let widest = angular.sin() / lat.to_radians().cos();

    let (min_lon, max_lon) = if min_lat <= -90.0 || max_lat >= 90.0 || !(widest < 1.0) {
        (-180.0, 180.0)
    } else {
        let lon_delta = widest.asin().to_degrees();
        (lon - lon_delta, lon + lon_delta)
    };

    BoundingBox { min_lat, max_lat, min_lon, max_lon }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(lat: f64, lon: f64, bbox: &BoundingBox) -> bool {
    lat >= bbox.min_lat
        && lat <= bbox.max_lat
        && lon >= bbox.min_lon
        && lon <= bbox.max_lon
}

#[cfg(test)]
mod tests {
    use super::*;

    const PODGORICA: Coordinate = Coordinate::new(42.4415, 19.2621);
    const NIKSIC: Coordinate = Coordinate::new(42.7731, 18.9447);

    #[test]
    fn test_podgorica_to_niksic() {
        let distance = distance_km(PODGORICA, NIKSIC);
        assert!((distance - 44.0).abs() <= 2.0, "Distance should be ~44km, got {}", distance);
    }

    #[test]
    fn test_distance_is_symmetric() {
        assert_eq!(distance_km(PODGORICA, NIKSIC), distance_km(NIKSIC, PODGORICA));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_km(PODGORICA, PODGORICA), 0.0);
    }

    #[test]
    fn test_antipodal_points_are_finite() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let distance = distance_km(a, b);

        assert!(distance.is_finite());
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = calculate_bounding_box(42.4415, 19.2621, 10.0);

        assert!(bbox.min_lat < 42.4415);
        assert!(bbox.max_lat > 42.4415);
        assert!(bbox.min_lon < 19.2621);
        assert!(bbox.max_lon > 19.2621);

        // 20km / 111km per degree = ~0.18 degrees
        let lat_span = bbox.max_lat - bbox.min_lat;
        assert!((lat_span - 0.18).abs() < 0.02, "Lat span should be ~0.18 degrees");
    }

    #[test]
    fn test_point_within_bbox() {
        let bbox = calculate_bounding_box(42.4415, 19.2621, 10.0);

        assert!(is_within_bounding_box(42.4415, 19.2621, &bbox));
        assert!(is_within_bounding_box(42.44, 19.30, &bbox));
        assert!(!is_within_bounding_box(NIKSIC.latitude, NIKSIC.longitude, &bbox));
    }

    #[test]
    fn test_bounding_box_encloses_radius() {
        let bbox = calculate_bounding_box(PODGORICA.latitude, PODGORICA.longitude, 45.5);
        assert!(is_within_bounding_box(NIKSIC.latitude, NIKSIC.longitude, &bbox));

        // the box edges sit on or outside the circle
        let north = distance_km(PODGORICA, Coordinate::new(bbox.max_lat, PODGORICA.longitude));
        let east = distance_km(PODGORICA, Coordinate::new(PODGORICA.latitude, bbox.max_lon));
        assert!((north - 45.5).abs() < 1e-6);
        assert!(east >= 45.5);
    }

    #[test]
    fn test_bounding_box_near_pole_covers_all_longitudes() {
        let bbox = calculate_bounding_box(89.95, 10.0, 50.0);

        assert_eq!(bbox.max_lat, 90.0);
        assert_eq!(bbox.min_lon, -180.0);
        assert_eq!(bbox.max_lon, 180.0);
        assert!(is_within_bounding_box(89.9, -170.0, &bbox));
        assert!(bbox.min_lon.is_finite() && bbox.max_lon.is_finite());
    }
}

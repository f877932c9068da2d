// Unit tests for Apoteka

use apoteka::core::{
    adaptive_radius_km,
    distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box, EARTH_RADIUS_KM},
    filters::{matches_filters, PharmacyFilters},
    find_nearest, HomeRegion, NearbySearch,
};
use apoteka::models::{City, Coordinate, Pharmacy, ReferencePoint};

const PODGORICA: Coordinate = Coordinate::new(42.4415, 19.2621);

fn create_city(id: u32, slug: &str, lat: Option<f64>, lng: Option<f64>) -> City {
    City {
        id,
        slug: slug.to_string(),
        name_me: slug.to_string(),
        name_en: slug.to_string(),
        latitude: lat,
        longitude: lng,
    }
}

fn create_pharmacy(id: u32, name: &str, lat: f64, lng: f64) -> Pharmacy {
    Pharmacy {
        id,
        city_id: 1,
        name_me: name.to_string(),
        name_en: None,
        address: format!("Ulica {}", id),
        lat,
        lng,
        is_24h: false,
        open_sunday: false,
        hours_monfri: "08-20".to_string(),
        hours_sat: "08-15".to_string(),
        hours_sun: String::new(),
        phone: None,
        website: None,
        active: true,
    }
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(42.4415, 19.2621, 42.4415, 19.2621);
    assert_eq!(distance, 0.0);
}

#[test]
fn test_haversine_distance_podgorica_to_bar() {
    // roughly 40 km as the crow flies
    let distance = haversine_distance(42.4415, 19.2621, 42.0930, 19.1003);
    assert!(distance > 35.0 && distance < 45.0, "got {}", distance);
}

#[test]
fn test_haversine_never_nan() {
    let antipode = haversine_distance(0.0, 0.0, 0.0, 180.0);
    assert!(!antipode.is_nan());
    assert!((antipode - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-3);

    let pole_to_pole = haversine_distance(90.0, 0.0, -90.0, 0.0);
    assert!(!pole_to_pole.is_nan());
}

#[test]
fn test_bounding_box_creation() {
    let bbox = calculate_bounding_box(42.4415, 19.2621, 10.0);

    assert!(bbox.min_lat < 42.4415);
    assert!(bbox.max_lat > 42.4415);
    assert!(bbox.min_lon < 19.2621);
    assert!(bbox.max_lon > 19.2621);

    // Bounding box should be roughly 0.18 degrees in latitude (10km / 111km per degree)
    let lat_span = bbox.max_lat - bbox.min_lat;
    assert!((lat_span - 0.18).abs() < 0.02);

    assert!(is_within_bounding_box(42.45, 19.27, &bbox));
    assert!(!is_within_bounding_box(42.0930, 19.1003, &bbox));
}

#[test]
fn test_find_nearest_city() {
    let cities = vec![
        create_city(1, "podgorica", Some(42.4415), Some(19.2621)),
        create_city(2, "niksic", Some(42.7731), Some(18.9447)),
        create_city(3, "herceg-novi", Some(42.4531), Some(18.5375)),
    ];

    // Tivat airport
    let result = find_nearest(Coordinate::new(42.4047, 18.7233), &cities);
    assert_eq!(result.point.map(|c| c.slug.as_str()), Some("herceg-novi"));
    assert!(result.distance_km > 10.0 && result.distance_km < 20.0);
}

#[test]
fn test_find_nearest_skips_unlocated_cities() {
    let cities = vec![
        create_city(1, "unknown", None, Some(19.0)),
        create_city(2, "broken", Some(f64::NAN), Some(19.0)),
        create_city(3, "bar", Some(42.0930), Some(19.1003)),
    ];

    let result = find_nearest(PODGORICA, &cities);
    assert_eq!(result.point.unwrap().slug, "bar");
}

#[test]
fn test_find_nearest_no_candidates() {
    let cities: Vec<City> = vec![create_city(1, "unknown", None, None)];
    let result = find_nearest(PODGORICA, &cities);

    assert!(result.point.is_none());
    assert_eq!(result.distance_km, f64::INFINITY);
}

#[test]
fn test_find_nearest_reference_points_from_cities() {
    let cities = vec![
        create_city(1, "podgorica", Some(42.4415), Some(19.2621)),
        create_city(2, "kotor", Some(42.4247), Some(18.7712)),
    ];
    let points: Vec<ReferencePoint> = cities.iter().map(ReferencePoint::from).collect();

    let result = find_nearest(Coordinate::new(42.43, 18.77), &points);
    assert_eq!(result.point.unwrap().id, "kotor");
}

#[test]
fn test_adaptive_radius_bands() {
    let center = HomeRegion::MONTENEGRO.center;

    // Budva, inside the home region
    assert_eq!(adaptive_radius_km(Coordinate::new(42.2864, 18.8400), center), 10);
    // Trebinje, just across the border
    assert_eq!(adaptive_radius_km(Coordinate::new(42.71, 18.34), center), 50);
    // Belgrade
    assert_eq!(adaptive_radius_km(Coordinate::new(44.7866, 20.4489), center), 100);
    // Vienna
    assert_eq!(adaptive_radius_km(Coordinate::new(48.2082, 16.3738), center), 200);
    // New York
    assert_eq!(adaptive_radius_km(Coordinate::new(40.7128, -74.0060), center), 500);
}

#[test]
fn test_home_region_boundary_is_inside() {
    let region = HomeRegion::MONTENEGRO;

    assert!(region.contains(Coordinate::new(43.56, 20.36)));
    assert!(region.contains(Coordinate::new(41.85, 18.43)));
    assert!(!region.contains(Coordinate::new(43.57, 19.0)));
    assert_eq!(region.radius_for(Coordinate::new(41.85, 18.43)), 10);
}

#[test]
fn test_filters_24h_counts_as_open_sunday() {
    let mut pharmacy = create_pharmacy(1, "Zegin", 42.44, 19.26);
    pharmacy.is_24h = true;

    let filters = PharmacyFilters {
        open_sunday: true,
        ..Default::default()
    };
    assert!(matches_filters(&pharmacy, &filters));

    pharmacy.is_24h = false;
    assert!(!matches_filters(&pharmacy, &filters));
}

#[test]
fn test_nearby_search_orders_by_distance() {
    let candidates = vec![
        create_pharmacy(1, "Far", 42.50, 19.30),
        create_pharmacy(2, "Near", 42.442, 19.263),
        create_pharmacy(3, "Outside", 42.0930, 19.1003),
        create_pharmacy(4, "Middle", 42.46, 19.27),
    ];

    let result = NearbySearch::default().rank(PODGORICA, candidates, 10.0, 10);

    let names: Vec<&str> = result.pharmacies.iter().map(|p| p.pharmacy.name_me.as_str()).collect();
    assert_eq!(names, vec!["Near", "Middle", "Far"]);
    assert_eq!(result.total_candidates, 4);
    assert!(result.pharmacies.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
}

#[test]
fn test_nearby_search_respects_limit_and_filters() {
    let mut on_duty = create_pharmacy(1, "Dezurna", 42.45, 19.27);
    on_duty.is_24h = true;
    let mut closed = create_pharmacy(2, "Zatvorena", 42.44, 19.26);
    closed.active = false;

    let candidates = vec![on_duty, closed, create_pharmacy(3, "Obicna", 42.443, 19.262)];

    let filters = PharmacyFilters {
        is_24h: true,
        ..Default::default()
    };
    let result = NearbySearch::new(filters).rank(PODGORICA, candidates.clone(), 10.0, 10);
    assert_eq!(result.pharmacies.len(), 1);
    assert_eq!(result.pharmacies[0].pharmacy.name_me, "Dezurna");

    let result = NearbySearch::default().rank(PODGORICA, candidates, 10.0, 1);
    assert_eq!(result.pharmacies.len(), 1);
    assert_eq!(result.pharmacies[0].pharmacy.name_me, "Obicna");
}

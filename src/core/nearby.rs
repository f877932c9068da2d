use crate::core::{
    distance::{calculate_bounding_box, distance_km},
    filters::{matches_filters, within_bounds, PharmacyFilters},
};
use crate::models::{Coordinate, Located, NearbyPharmacy, Pharmacy};

/// Result of a nearby search
#[derive(Debug)]
pub struct NearbyResult {
    pub pharmacies: Vec<NearbyPharmacy>,
    pub total_candidates: usize,
}

/// Ranks pharmacies around an origin
///
/// # Pipeline Stages
/// 1. Geospatial bounding box pre-filter
/// 2. List filters (24h, open on Sunday, free-text search)
/// 3. Exact Haversine radius check
/// 4. Ordering by distance
#[derive(Debug, Clone, Default)]
pub struct NearbySearch {
    filters: PharmacyFilters,
}

impl NearbySearch {
    pub fn new(filters: PharmacyFilters) -> Self {
        Self { filters }
    }

    /// Rank `candidates` within `radius_km` of `origin`, closest first.
    ///
    /// Equal distances are ordered by Montenegrin name so output is stable.
    pub fn rank(
        &self,
        origin: Coordinate,
        candidates: Vec<Pharmacy>,
        radius_km: f64,
        limit: usize,
    ) -> NearbyResult {
        let total_candidates = candidates.len();
        let bbox = calculate_bounding_box(origin.latitude, origin.longitude, radius_km);

        let mut ranked: Vec<NearbyPharmacy> = candidates
            .into_iter()
            .filter(|pharmacy| pharmacy.location().is_some())
            .filter(|pharmacy| within_bounds(pharmacy, &bbox))
            .filter(|pharmacy| matches_filters(pharmacy, &self.filters))
            .filter_map(|pharmacy| {
                let distance_km = distance_km(origin, Coordinate::new(pharmacy.lat, pharmacy.lng));
                (distance_km <= radius_km).then_some(NearbyPharmacy { pharmacy, distance_km })
            })
            .collect();

        ranked.sort_by(|a, b| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then_with(|| a.pharmacy.name_me.cmp(&b.pharmacy.name_me))
        });

        ranked.truncate(limit);

        NearbyResult {
            pharmacies: ranked,
            total_candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_pharmacy(id: u32, name: &str, lat: f64, lng: f64, is_24h: bool) -> Pharmacy {
        Pharmacy {
            id,
            city_id: 1,
            name_me: name.to_string(),
            name_en: None,
            address: format!("Ulica {}", id),
            lat,
            lng,
            is_24h,
            open_sunday: false,
            hours_monfri: String::new(),
            hours_sat: String::new(),
            hours_sun: String::new(),
            phone: None,
            website: None,
            active: true,
        }
    }

    const ORIGIN: Coordinate = Coordinate::new(42.4415, 19.2621);

    #[test]
    fn test_rank_orders_by_distance() {
        let search = NearbySearch::default();
        let candidates = vec![
            create_pharmacy(1, "Daleka", 42.50, 19.30, false),
            create_pharmacy(2, "Bliska", 42.4420, 19.2625, false),
            create_pharmacy(3, "Srednja", 42.46, 19.27, false),
        ];

        let result = search.rank(ORIGIN, candidates, 10.0, 10);

        let names: Vec<_> = result.pharmacies.iter().map(|p| p.pharmacy.name_me.as_str()).collect();
        assert_eq!(names, vec!["Bliska", "Srednja", "Daleka"]);
        assert_eq!(result.total_candidates, 3);
    }

    #[test]
    fn test_rank_drops_out_of_radius() {
        let search = NearbySearch::default();
        let candidates = vec![
            create_pharmacy(1, "Podgorica", 42.4420, 19.2625, false),
            create_pharmacy(2, "Nikšić", 42.7731, 18.9447, false),
        ];

        let result = search.rank(ORIGIN, candidates, 10.0, 10);

        assert_eq!(result.pharmacies.len(), 1);
        assert!(result.pharmacies[0].distance_km <= 10.0);
    }

    #[test]
    fn test_rank_applies_filters_and_limit() {
        let search = NearbySearch::new(PharmacyFilters { is_24h: true, ..Default::default() });
        let candidates: Vec<Pharmacy> = (0..10)
            .map(|i| create_pharmacy(i, &format!("Apoteka {}", i), 42.4415 + i as f64 * 0.001, 19.2621, i % 2 == 0))
            .collect();

        let result = search.rank(ORIGIN, candidates, 10.0, 3);

        assert_eq!(result.pharmacies.len(), 3);
        assert!(result.pharmacies.iter().all(|p| p.pharmacy.is_24h));
    }

    #[test]
    fn test_rank_skips_invalid_coordinates() {
        let search = NearbySearch::default();
        let candidates = vec![create_pharmacy(1, "Pokvarena", f64::NAN, 19.2621, false)];

        let result = search.rank(ORIGIN, candidates, 10.0, 10);

        assert!(result.pharmacies.is_empty());
    }
}

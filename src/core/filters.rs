use serde::{Deserialize, Serialize};

use crate::models::{BoundingBox, Pharmacy};

/// List filters offered by the public pharmacy search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PharmacyFilters {
    #[serde(default, rename = "is24h")]
    pub is_24h: bool,
    #[serde(default, rename = "openSunday")]
    pub open_sunday: bool,
    #[serde(default)]
    pub search: String,
}

impl PharmacyFilters {
    pub fn is_empty(&self) -> bool {
        !self.is_24h && !self.open_sunday && self.search.trim().is_empty()
    }
}

/// Check if a pharmacy passes the user's list filters
///
/// Inactive pharmacies never pass.
#[inline]
pub fn matches_filters(pharmacy: &Pharmacy, filters: &PharmacyFilters) -> bool {
    if !pharmacy.active {
        return false;
    }

    if filters.is_24h && !pharmacy.is_24h {
        return false;
    }

    // a 24h pharmacy is open on Sunday too
    if filters.open_sunday && !(pharmacy.open_sunday || pharmacy.is_24h) {
        return false;
    }

    matches_search(pharmacy, &filters.search)
}

/// Case-insensitive substring match against both names and the address
pub fn matches_search(pharmacy: &Pharmacy, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    pharmacy.name_me.to_lowercase().contains(&term)
        || pharmacy
            .name_en
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&term))
        || pharmacy.address.to_lowercase().contains(&term)
}

/// Stage 1 geospatial pre-filter
#[inline]
pub fn within_bounds(pharmacy: &Pharmacy, bbox: &BoundingBox) -> bool {
    super::distance::is_within_bounding_box(pharmacy.lat, pharmacy.lng, bbox)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_pharmacy(name: &str, is_24h: bool, open_sunday: bool) -> Pharmacy {
        Pharmacy {
            id: 1,
            city_id: 1,
            name_me: name.to_string(),
            name_en: Some("Central Pharmacy".to_string()),
            address: "Bulevar Svetog Petra Cetinjskog 1".to_string(),
            lat: 42.4415,
            lng: 19.2621,
            is_24h,
            open_sunday,
            hours_monfri: "08-20".to_string(),
            hours_sat: "08-15".to_string(),
            hours_sun: String::new(),
            phone: None,
            website: None,
            active: true,
        }
    }

    #[test]
    fn test_empty_filters_match() {
        let pharmacy = create_test_pharmacy("Apoteka Centar", false, false);
        let filters = PharmacyFilters::default();

        assert!(filters.is_empty());
        assert!(matches_filters(&pharmacy, &filters));
    }

    #[test]
    fn test_24h_filter() {
        let filters = PharmacyFilters { is_24h: true, ..Default::default() };

        assert!(matches_filters(&create_test_pharmacy("A", true, false), &filters));
        assert!(!matches_filters(&create_test_pharmacy("B", false, true), &filters));
    }

    #[test]
    fn test_open_sunday_accepts_24h() {
        let filters = PharmacyFilters { open_sunday: true, ..Default::default() };

        assert!(matches_filters(&create_test_pharmacy("A", true, false), &filters));
        assert!(matches_filters(&create_test_pharmacy("B", false, true), &filters));
        assert!(!matches_filters(&create_test_pharmacy("C", false, false), &filters));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let pharmacy = create_test_pharmacy("Apoteka Montefarm", false, false);

        assert!(matches_search(&pharmacy, "montefarm"));
        assert!(matches_search(&pharmacy, "CENTRAL"));
        assert!(matches_search(&pharmacy, "petra"));
        assert!(!matches_search(&pharmacy, "benu"));
    }

    #[test]
    fn test_inactive_pharmacy_filtered() {
        let mut pharmacy = create_test_pharmacy("Apoteka", true, true);
        pharmacy.active = false;

        assert!(!matches_filters(&pharmacy, &PharmacyFilters::default()));
    }
}

// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod geolocation;
pub mod nearby;
pub mod resolver;

pub use distance::{calculate_bounding_box, distance_km, haversine_distance, is_within_bounding_box};
pub use filters::{matches_filters, matches_search, PharmacyFilters};
pub use geolocation::{locate_or_default, GeolocationError, GeolocationProvider, OriginSource, ReportedPosition, ResolvedOrigin};
pub use nearby::{NearbyResult, NearbySearch};
pub use resolver::{adaptive_radius_km, find_nearest, HomeRegion};

use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{NearbySearch, PharmacyFilters};
use crate::models::{Coordinate, NearbyQuery, NearbyResponse};
use crate::routes::{bad_request, upstream_error, AppState};

const MAX_LIMIT: usize = 200;

/// Configure all pharmacy routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/pharmacies/nearby", web::get().to(nearby));
}

/// Nearby pharmacies endpoint
///
/// GET /api/v1/pharmacies/nearby?lat=42.44&lng=19.26&radius=10&is24h=true&openSunday=false&search=centar&limit=20
///
/// When `radius` is omitted the adaptive radius for the origin is used.
async fn nearby(state: web::Data<AppState>, query: web::Query<NearbyQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let query = query.into_inner();
    let origin = Coordinate::new(query.lat, query.lng);
    let radius_km = query.radius.unwrap_or_else(|| state.region.radius_for(origin));
    let limit = query.limit.min(MAX_LIMIT);

    tracing::info!(
        "Searching pharmacies near ({}, {}) within {} km",
        query.lat,
        query.lng,
        radius_km
    );

    let candidates = match state.api.search_nearby(query.lat, query.lng, radius_km).await {
        Ok(pharmacies) => pharmacies,
        Err(e) => {
            tracing::error!("Nearby search failed: {}", e);
            return upstream_error("Failed to fetch pharmacies", &e);
        }
    };

    let filters = PharmacyFilters {
        is_24h: query.is_24h,
        open_sunday: query.open_sunday,
        search: query.search.unwrap_or_default(),
    };

    let result = NearbySearch::new(filters).rank(origin, candidates, f64::from(radius_km), limit);

    tracing::debug!(
        "Returning {} of {} pharmacies",
        result.pharmacies.len(),
        result.total_candidates
    );

    HttpResponse::Ok().json(NearbyResponse {
        total_results: result.pharmacies.len(),
        pharmacies: result.pharmacies,
        radius_km,
    })
}

use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{find_nearest, locate_or_default, ReportedPosition};
use crate::models::{
    City, Coordinate, CoordinateInput, LocateRequest, LocateResponse, NearestCityResponse,
    RadiusQuery, RadiusResponse,
};
use crate::routes::{bad_request, AppState};

/// Configure all geolocation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/geo/locate", web::post().to(locate))
        .route("/geo/nearest-city", web::post().to(nearest_city))
        .route("/geo/radius", web::get().to(radius));
}

fn nearest_in(origin: Coordinate, cities: &[City]) -> NearestCityResponse {
    let nearest = find_nearest(origin, cities);
    NearestCityResponse {
        city: nearest.point.cloned(),
        distance_km: nearest.is_match().then_some(nearest.distance_km),
    }
}

/// Resolve the user's origin from what the browser reported
///
/// POST /api/v1/geo/locate
///
/// Request body:
/// ```json
/// {
///   "position": { "latitude": 42.44, "longitude": 19.26 },
///   "error": "permission_denied"
/// }
/// ```
async fn locate(state: web::Data<AppState>, req: web::Json<LocateRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::debug!("Rejected locate request: {}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let reported = ReportedPosition::from_parts(req.position.map(Coordinate::from), req.error);
    let origin = locate_or_default(&reported, state.default_origin).await;

    let cities = state.directory.cities().await;
    let nearest_city = nearest_in(origin.coordinate, &cities);
    let radius_km = state.region.radius_for(origin.coordinate);

    tracing::debug!(
        "Located origin {:?} ({:?}), radius {} km",
        origin.coordinate,
        origin.source,
        radius_km
    );

    HttpResponse::Ok().json(LocateResponse {
        origin: origin.coordinate,
        source: origin.source,
        nearest_city,
        radius_km,
    })
}

/// POST /api/v1/geo/nearest-city
async fn nearest_city(state: web::Data<AppState>, req: web::Json<CoordinateInput>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let cities = state.directory.cities().await;
    HttpResponse::Ok().json(nearest_in(req.into_inner().into(), &cities))
}

/// GET /api/v1/geo/radius?lat=&lng=
async fn radius(state: web::Data<AppState>, query: web::Query<RadiusQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let origin = Coordinate::new(query.lat, query.lng);
    HttpResponse::Ok().json(RadiusResponse {
        radius_km: state.region.radius_for(origin),
        within_region: state.region.contains(origin),
    })
}

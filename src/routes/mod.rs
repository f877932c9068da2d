// Route exports
pub mod geo;
pub mod medicines;
pub mod pharmacies;
pub mod sync;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::HomeRegion;
use crate::models::{Coordinate, ErrorResponse, HealthResponse};
use crate::services::{ApiError, CityDirectory, PharmacyApiClient};
use crate::sync::SyncOrchestrator;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<PharmacyApiClient>,
    pub directory: Arc<CityDirectory>,
    pub orchestrator: Arc<SyncOrchestrator<PharmacyApiClient>>,
    pub region: HomeRegion,
    pub default_origin: Coordinate,
    pub admin_key: String,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(geo::configure)
            .configure(medicines::configure)
            .configure(pharmacies::configure)
            .configure(sync::configure),
    );
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

/// Map an upstream failure onto the response we hand back to our caller
fn upstream_error(context: &str, err: &ApiError) -> HttpResponse {
    let message = err.to_string();
    match err {
        ApiError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: context.to_string(),
            message,
            status_code: 404,
        }),
        _ => HttpResponse::BadGateway().json(ErrorResponse {
            error: context.to_string(),
            message,
            status_code: 502,
        }),
    }
}

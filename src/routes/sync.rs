use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, StartSyncRequest};
use crate::routes::{bad_request, AppState};
use crate::sync::SyncError;

const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Configure the admin bulk sync routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/admin/sync/start", web::post().to(start_sync))
        .route("/admin/sync/stop", web::post().to(stop_sync))
        .route("/admin/sync/status", web::get().to(sync_status))
        .route("/admin/sync/results", web::delete().to(clear_results));
}

/// An empty configured key disables the admin routes entirely
fn is_authorized(req: &HttpRequest, admin_key: &str) -> bool {
    !admin_key.is_empty()
        && req
            .headers()
            .get(ADMIN_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|key| key == admin_key)
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse {
        error: "Unauthorized".to_string(),
        message: "Missing or invalid admin key".to_string(),
        status_code: 401,
    })
}

fn conflict(err: SyncError) -> HttpResponse {
    HttpResponse::Conflict().json(ErrorResponse {
        error: "Sync conflict".to_string(),
        message: err.to_string(),
        status_code: 409,
    })
}

/// Start a bulk sync run
///
/// POST /api/v1/admin/sync/start
///
/// Request body (optional, every known city is synced when omitted):
/// ```json
/// {
///   "citySlugs": ["podgorica", "niksic"]
/// }
/// ```
async fn start_sync(state: web::Data<AppState>, http_req: HttpRequest, body: web::Bytes) -> impl Responder {
    if !is_authorized(&http_req, &state.admin_key) {
        return unauthorized();
    }

    let req: StartSyncRequest = if body.iter().all(u8::is_ascii_whitespace) {
        StartSyncRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(req) => req,
            Err(e) => return bad_request("invalid_json", format!("Invalid JSON: {}", e)),
        }
    };

    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let city_slugs = match req.city_slugs {
        Some(slugs) => {
            if slugs.iter().any(|s| s.trim().is_empty()) {
                return bad_request("Validation failed", "City slugs must not be empty".to_string());
            }
            slugs
        }
        None => state.directory.slugs().await,
    };

    match state.orchestrator.start(city_slugs).await {
        // the run continues in the background
        Ok(_handle) => HttpResponse::Accepted().json(state.orchestrator.snapshot().await),
        Err(SyncError::NoTargets) => bad_request("No targets", SyncError::NoTargets.to_string()),
        Err(e) => {
            tracing::info!("Rejected sync start: {}", e);
            conflict(e)
        }
    }
}

/// POST /api/v1/admin/sync/stop
async fn stop_sync(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    if !is_authorized(&http_req, &state.admin_key) {
        return unauthorized();
    }

    let stopped = state.orchestrator.stop().await;
    HttpResponse::Ok().json(serde_json::json!({
        "stopped": stopped,
        "progress": state.orchestrator.snapshot().await,
    }))
}

/// GET /api/v1/admin/sync/status
async fn sync_status(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    if !is_authorized(&http_req, &state.admin_key) {
        return unauthorized();
    }

    HttpResponse::Ok().json(state.orchestrator.snapshot().await)
}

/// DELETE /api/v1/admin/sync/results
async fn clear_results(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    if !is_authorized(&http_req, &state.admin_key) {
        return unauthorized();
    }

    match state.orchestrator.clear_results().await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => conflict(e),
    }
}

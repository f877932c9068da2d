use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{MedicineSearchQuery, MedicineSearchResponse};
use crate::routes::{bad_request, upstream_error, AppState};

/// Configure all medicine routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/medicines/search", web::get().to(search));
}

/// GET /api/v1/medicines/search?q=brufen
///
/// Inactive medicines are left out of the result.
async fn search(state: web::Data<AppState>, query: web::Query<MedicineSearchQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let term = query.q.trim();
    tracing::debug!("Searching medicines for {:?}", term);

    let medicines = match state.api.search_medicines(term).await {
        Ok(medicines) => medicines,
        Err(e) => {
            tracing::error!("Medicine search failed: {}", e);
            return upstream_error("Failed to search medicines", &e);
        }
    };

    let medicines: Vec<_> = medicines.into_iter().filter(|m| m.active).collect();

    HttpResponse::Ok().json(MedicineSearchResponse {
        total_results: medicines.len(),
        medicines,
    })
}

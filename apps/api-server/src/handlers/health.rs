//! API root handler.

use actix_web::HttpResponse;

/// GET /api/v1 - name, version and status of the API.
pub async fn info() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "name": "HyggeStack API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}

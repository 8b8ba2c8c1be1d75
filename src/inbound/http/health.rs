//! Liveness probe.

use actix_web::{get, web, HttpResponse};

/// Report process liveness.
#[utoipa::path(
    get,
    path = "/health/live",
    responses((status = 200, description = "Service is alive")),
    tags = ["health"],
    operation_id = "healthLive"
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(live);
}

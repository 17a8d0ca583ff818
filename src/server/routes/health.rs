use crate::server::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

/// GET /health
pub(crate) async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now(),
        "database": state.database,
    }))
}

/// Fallback for every unknown route.
pub(crate) async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "Rota não encontrada" }))
}

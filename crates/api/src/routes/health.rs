//! Health check route, mounted at the root (not under `/api/v1`).

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

/// Routes mounted at `/`.
///
/// ```text
/// GET /health -> liveness probe
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

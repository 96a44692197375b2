//! Route definitions for the `/analytics` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`. All require authentication.
///
/// ```text
/// GET /overview       -> overview
/// GET /by-model       -> by_model
/// GET /by-group       -> by_group
/// GET /by-status      -> by_status
/// GET /by-sourcer     -> by_sourcer
/// GET /clients        -> clients
/// GET /lacking-hours  -> lacking_hours
/// GET /recent         -> recent
/// GET /timeline       -> timeline
/// GET /export         -> export_csv
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(analytics::overview))
        .route("/by-model", get(analytics::by_model))
        .route("/by-group", get(analytics::by_group))
        .route("/by-status", get(analytics::by_status))
        .route("/by-sourcer", get(analytics::by_sourcer))
        .route("/clients", get(analytics::clients))
        .route("/lacking-hours", get(analytics::lacking_hours))
        .route("/recent", get(analytics::recent))
        .route("/timeline", get(analytics::timeline))
        .route("/export", get(analytics::export_csv))
}

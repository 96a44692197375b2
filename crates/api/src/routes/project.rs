//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /filter-options  -> filter_options
/// GET    /export          -> export_json (admin/manager)
/// POST   /import          -> import (admin/manager)
/// POST   /bulk            -> bulk_action (admin/manager)
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete (admin/manager)
/// POST   /{id}/archive    -> archive
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/filter-options", get(project::filter_options))
        .route("/export", get(project::export_json))
        .route("/import", post(project::import))
        .route("/bulk", post(project::bulk_action))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/archive", post(project::archive))
}

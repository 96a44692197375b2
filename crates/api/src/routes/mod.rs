//! Route definitions.

pub mod analytics;
pub mod auth;
pub mod health;
pub mod project;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                 register (public)
/// /auth/login                    login (public)
/// /auth/refresh                  refresh (public)
/// /auth/me                       token identity (requires auth)
///
/// /projects                      list, create
/// /projects/filter-options       distinct values for filter UIs
/// /projects/export               JSON backup (admin/manager)
/// /projects/import               JSON restore (admin/manager)
/// /projects/bulk                 bulk status transitions (admin/manager)
/// /projects/{id}                 get, update, delete (delete: admin/manager)
/// /projects/{id}/archive         archive (POST)
///
/// /analytics/overview            headline totals
/// /analytics/by-model            count per billing model
/// /analytics/by-group            count per group bucket
/// /analytics/by-status           count per status
/// /analytics/by-sourcer          per-sourcer workload
/// /analytics/clients             per-company rollup
/// /analytics/lacking-hours       sourcers below the effort threshold
/// /analytics/recent              latest projects
/// /analytics/timeline            project starts per month
/// /analytics/export              CSV export
///
/// /users                         list, create (admin only)
/// /users/{id}                    get, update, delete (admin only)
/// /users/{id}/password           change password (self or admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", project::router())
        .nest("/analytics", analytics::router())
        .nest("/users", user::router())
}

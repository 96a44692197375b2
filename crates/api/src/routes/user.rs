//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// Management routes require the `admin` role (enforced by handler
/// extractors); the password route is self-or-admin.
///
/// ```text
/// GET    /               -> list_users
/// POST   /               -> create_user
/// GET    /{id}           -> get_user
/// PUT    /{id}           -> update_user
/// DELETE /{id}           -> delete_user
/// POST   /{id}/password  -> update_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list_users).post(user::create_user))
        .route(
            "/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .route("/{id}/password", post(user::update_password))
}

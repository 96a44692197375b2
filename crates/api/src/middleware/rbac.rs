//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the minimum requirement, before the handler body (and any
//! request body parsing) runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sourcedesk_core::error::CoreError;
use sourcedesk_core::roles::{ROLE_ADMIN, ROLE_MANAGER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `manager` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// Gates destructive and bulk project operations.
///
/// ```ignore
/// async fn manager_or_admin(RequireManager(user): RequireManager) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_MANAGER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Manager or Admin role required".into(),
            )));
        }
        Ok(RequireManager(user))
    }
}

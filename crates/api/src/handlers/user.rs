//! Handlers for the `/users` resource (user management).
//!
//! Management endpoints are admin-only. Password changes are available to
//! the account owner (proving the current password) and to admins.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sourcedesk_core::error::CoreError;
use sourcedesk_core::roles::ROLE_ADMIN;
use sourcedesk_core::types::DbId;
use sourcedesk_db::models::user::{CreateUser, UpdateUser, UserResponse, UserRole};
use sourcedesk_db::repositories::UserRepo;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Defaults to `user` if omitted.
    pub role: Option<UserRole>,
}

/// Request body for `POST /users/{id}/password`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    /// Required unless an admin is resetting someone else's password.
    pub current_password: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users
///
/// List all users. Admin only.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user.into()))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;

    if UserRepo::find_by_email(&state.pool, &input.email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            password_hash,
            name: input.name,
            role: input.role.unwrap_or(UserRole::User),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;

    if let Some(ref email) = input.email {
        if UserRepo::email_taken(&state.pool, email, id).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "Email already exists".into(),
            )));
        }
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if admin.user_id == id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot delete your own account".into(),
        )));
    }

    let deleted = UserRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}

/// POST /api/v1/users/{id}/password
///
/// Change a password. The account owner must prove the current password;
/// an admin may reset any other account without it.
pub async fn update_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePasswordRequest>,
) -> AppResult<StatusCode> {
    input.validate()?;

    let is_self = auth.user_id == id;
    let is_admin = auth.role == ROLE_ADMIN;
    if !is_self && !is_admin {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot change another user's password".into(),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    if is_self {
        let current = input.current_password.as_deref().ok_or_else(|| {
            AppError::Core(CoreError::Validation("Current password is required".into()))
        })?;
        let valid = verify_password(current, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
        if !valid {
            return Err(AppError::Core(CoreError::Validation(
                "Current password is incorrect".into(),
            )));
        }
    }

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, id, &password_hash).await?;

    Ok(StatusCode::NO_CONTENT)
}

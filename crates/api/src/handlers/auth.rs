//! Handlers for the `/auth` resource (register, login, refresh, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sourcedesk_core::error::CoreError;
use sourcedesk_core::types::DbId;
use sourcedesk_db::models::user::{CreateUser, UserRole};
use sourcedesk_db::repositories::UserRepo;
use validator::Validate;

use crate::auth::jwt::{generate_token_pair, validate_refresh_token, TokenPair};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Defaults to `user` if omitted.
    pub role: Option<UserRole>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by register, login, and
/// refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user identity embedded in [`AuthResponse`] and returned by `me`.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub email: String,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account and return an initial token pair. Rejects duplicate
/// emails with 409.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
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

    let response = build_auth_response(&state, user.id, &user.email, user.role.as_str())?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. An unknown email and a wrong
/// password fail identically so callers cannot probe which emails exist.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    let response = build_auth_response(&state, user.id, &user.email, user.role.as_str())?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for a fresh token pair. Rejects tokens
/// with a bad signature, expired tokens, and tokens whose user no longer
/// exists.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let claims = validate_refresh_token(&input.refresh_token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid or expired refresh token".into(),
        ))
    })?;

    // Re-read the user so a deleted account (or changed role) cannot keep
    // refreshing forever on stale claims.
    let user = UserRepo::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let response = build_auth_response(&state, user.id, &user.email, user.role.as_str())?;
    Ok(Json(response))
}

/// GET /api/v1/auth/me
///
/// Return the identity embedded in the verified access token.
pub async fn me(auth: AuthUser) -> AppResult<Json<UserInfo>> {
    Ok(Json(UserInfo {
        id: auth.user_id,
        email: auth.email,
        role: auth.role,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate a token pair and assemble the response body.
fn build_auth_response(
    state: &AppState,
    user_id: DbId,
    email: &str,
    role: &str,
) -> AppResult<AuthResponse> {
    let TokenPair {
        access_token,
        refresh_token,
    } = generate_token_pair(user_id, email, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: state.config.jwt.access_expiry_mins * 60,
        user: UserInfo {
            id: user_id,
            email: email.to_string(),
            role: role.to_string(),
        },
    })
}

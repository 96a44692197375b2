//! Shared helpers for HTTP-level integration tests.
//!
//! Tests drive the real router (same middleware stack as production) via
//! `tower::ServiceExt::oneshot`, without a TCP listener.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use sourcedesk_api::auth::jwt::JwtConfig;
use sourcedesk_api::auth::password::hash_password;
use sourcedesk_api::config::ServerConfig;
use sourcedesk_api::router::build_app_router;
use sourcedesk_api::state::AppState;
use sourcedesk_db::models::user::{CreateUser, User, UserRole};
use sourcedesk_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults and fixed JWT secrets.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            access_secret: "test-access-secret-long-enough".to_string(),
            refresh_secret: "test-refresh-secret-long-enough".to_string(),
            access_expiry_mins: 15,
            refresh_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This goes through [`build_app_router`] so integration tests exercise the
/// same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(token)).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request must build"),
        None => builder.body(Body::empty()).expect("request must build"),
    };
    app.oneshot(request).await.expect("request must not fail")
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body must collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body must be valid JSON")
}

/// Read a response body as UTF-8 text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body must collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body must be valid UTF-8")
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Create a user directly in the database and return the row plus the
/// plaintext password used.
pub async fn create_test_user(pool: &PgPool, email: &str, role: UserRole) -> (User, String) {
    let password = "test_password_123!";
    let hashed = hash_password(password).expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hashed,
            name: email.split('@').next().unwrap_or("Test User").to_string(),
            role,
        },
    )
    .await
    .expect("user creation should succeed");
    (user, password.to_string())
}

/// Log in via the API and return the JSON response containing
/// `access_token`, `refresh_token`, and `user` info.
pub async fn login_user(app: Router, email: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await
}

/// Seed a user with the given role and return a valid access token for it.
pub async fn access_token_for(pool: &PgPool, app: Router, email: &str, role: UserRole) -> String {
    let (_user, password) = create_test_user(pool, email, role).await;
    let json = login_user(app, email, &password).await;
    json["access_token"]
        .as_str()
        .expect("login must return access_token")
        .to_string()
}

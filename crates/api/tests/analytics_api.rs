//! HTTP-level integration tests for the analytics endpoints.

mod common;

use axum::http::StatusCode;
use common::{access_token_for, body_json, body_text, get, get_auth, post_json_auth};
use sourcedesk_db::models::user::UserRole;
use sqlx::PgPool;

async fn seed_project(app: axum::Router, token: &str, body: serde_json::Value) {
    let response = post_json_auth(app, "/api/v1/projects", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Overview and groupings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_overview_shape(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = access_token_for(&pool, app.clone(), "user@example.com", UserRole::User).await;

    seed_project(
        app.clone(),
        &token,
        serde_json::json!({
            "company": "Acme",
            "sourcer": "Dana",
            "group_type": "Israel",
            "model_type": "Hourly",
            "roles_count": 3,
            "hours_or_hires": 120
        }),
    )
    .await;

    let response = get_auth(app, "/api/v1/analytics/overview", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["totalProjects"], 1);
    assert_eq!(json["activeProjects"], 1);
    assert_eq!(json["completedProjects"], 0);
    assert_eq!(json["totalRoles"], 3);
    assert_eq!(json["totalHires"], 0, "120 is hours, not hires");
    assert_eq!(json["totalCompanies"], 1);
    assert_eq!(json["totalSourcers"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_by_model_returns_key_count_records(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = access_token_for(&pool, app.clone(), "user@example.com", UserRole::User).await;

    seed_project(
        app.clone(),
        &token,
        serde_json::json!({
            "company": "Acme",
            "sourcer": "Dana",
            "group_type": "Global",
            "model_type": "Success Executive"
        }),
    )
    .await;

    let response = get_auth(app, "/api/v1/analytics/by-model", &token).await;
    let json = body_json(response).await;
    let arr = json.as_array().unwrap();

    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["model"], "Success Executive");
    assert_eq!(arr[0]["count"], 1);
}

// ---------------------------------------------------------------------------
// Hours deficit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_lacking_hours_with_custom_threshold(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = access_token_for(&pool, app.clone(), "user@example.com", UserRole::User).await;

    // Dana: Hourly, 50 hours. Below a 100-hour threshold.
    seed_project(
        app.clone(),
        &token,
        serde_json::json!({
            "company": "Acme",
            "sourcer": "Dana",
            "group_type": "Global",
            "model_type": "Hourly",
            "hours_or_hires": 50
        }),
    )
    .await;
    // Noa: Success with 4 roles -> 120 synthetic hours. Above threshold.
    seed_project(
        app.clone(),
        &token,
        serde_json::json!({
            "company": "Globex",
            "sourcer": "Noa",
            "group_type": "Global",
            "model_type": "Success",
            "roles_count": 4
        }),
    )
    .await;

    let response = get_auth(app, "/api/v1/analytics/lacking-hours?min_hours=100", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 1, "Noa is at 120 and omitted");
    assert_eq!(arr[0]["sourcer"], "Dana");
    assert_eq!(arr[0]["totalHours"], 50);
    assert_eq!(arr[0]["missingHours"], 50);
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_csv_export_quotes_embedded_quotes(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = access_token_for(&pool, app.clone(), "user@example.com", UserRole::User).await;

    seed_project(
        app.clone(),
        &token,
        serde_json::json!({
            "company": "Acme",
            "sourcer": "Dana",
            "group_type": "Global",
            "model_type": "Hourly",
            "notes": "He said \"hi\""
        }),
    )
    .await;

    let response = get_auth(app, "/api/v1/analytics/export", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/csv"
    );
    assert!(response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("projects.csv"));

    let csv = body_text(response).await;
    let lines: Vec<&str> = csv.split('\n').collect();
    assert!(lines[0].starts_with("\"ID\",\"Company\",\"Sourcer\""));
    assert!(
        csv.contains("\"He said \"\"hi\"\"\""),
        "embedded quotes must be doubled: {csv}"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_csv_export_applies_status_filter(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = access_token_for(&pool, app.clone(), "user@example.com", UserRole::User).await;

    seed_project(
        app.clone(),
        &token,
        serde_json::json!({
            "company": "ActiveCo",
            "sourcer": "Dana",
            "group_type": "Global",
            "model_type": "Hourly"
        }),
    )
    .await;
    seed_project(
        app.clone(),
        &token,
        serde_json::json!({
            "company": "DoneCo",
            "sourcer": "Noa",
            "group_type": "Global",
            "model_type": "Hourly",
            "status": "completed"
        }),
    )
    .await;

    let response = get_auth(app, "/api/v1/analytics/export?status=completed", &token).await;
    let csv = body_text(response).await;

    assert!(csv.contains("DoneCo"));
    assert!(!csv.contains("ActiveCo"));
}

// ---------------------------------------------------------------------------
// Auth gating
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_analytics_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/analytics/overview").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

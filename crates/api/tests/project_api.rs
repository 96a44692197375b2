//! HTTP-level integration tests for the project endpoints.
//!
//! Covers CRUD, the list envelope, archive, bulk actions with RBAC, and
//! the JSON backup import/export round trip.

mod common;

use axum::http::StatusCode;
use common::{
    access_token_for, body_json, delete_auth, get, get_auth, post_json_auth, put_json_auth,
};
use sourcedesk_db::models::user::UserRole;
use sqlx::PgPool;

fn project_body(company: &str, sourcer: &str) -> serde_json::Value {
    serde_json::json!({
        "company": company,
        "sourcer": sourcer,
        "group_type": "Global",
        "model_type": "Hourly"
    })
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_project_returns_201_with_defaults(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = access_token_for(&pool, app.clone(), "user@example.com", UserRole::User).await;

    let response =
        post_json_auth(app, "/api/v1/projects", project_body("Acme", "Dana"), &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["company"], "Acme");
    assert_eq!(json["roles_count"], 1);
    assert_eq!(json["status"], "active");
    assert!(json["id"].is_number());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_rejects_empty_company(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = access_token_for(&pool, app.clone(), "user@example.com", UserRole::User).await;

    let response =
        post_json_auth(app, "/api/v1/projects", project_body("", "Dana"), &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_returns_data_and_pagination_envelope(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = access_token_for(&pool, app.clone(), "user@example.com", UserRole::User).await;

    for i in 0..3 {
        post_json_auth(
            app.clone(),
            "/api/v1/projects",
            project_body(&format!("Company {i}"), "Dana"),
            &token,
        )
        .await;
    }

    let response = get_auth(app, "/api/v1/projects?limit=2&page=1", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["pagination"]["total"], 3);
    assert_eq!(json["pagination"]["totalPages"], 2);
    assert_eq!(json["pagination"]["page"], 1);
    assert_eq!(json["pagination"]["limit"], 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_applies_query_filters(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = access_token_for(&pool, app.clone(), "user@example.com", UserRole::User).await;

    post_json_auth(
        app.clone(),
        "/api/v1/projects",
        project_body("Acme", "Dana"),
        &token,
    )
    .await;
    post_json_auth(
        app.clone(),
        "/api/v1/projects",
        project_body("Globex", "Noa"),
        &token,
    )
    .await;

    let response = get_auth(app, "/api/v1/projects?sourcer=Dana", &token).await;
    let json = body_json(response).await;

    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["company"], "Acme");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_rejects_out_of_range_limit(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = access_token_for(&pool, app.clone(), "user@example.com", UserRole::User).await;

    let response = get_auth(app, "/api/v1/projects?limit=500", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_update_delete_round_trip(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = access_token_for(&pool, app.clone(), "admin@example.com", UserRole::Admin).await;

    let created = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/projects",
            project_body("Acme", "Dana"),
            &admin,
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // Point lookup.
    let response = get_auth(app.clone(), &format!("/api/v1/projects/{id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Partial update.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{id}"),
        serde_json::json!({ "notes": "now with notes" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["notes"], "now with notes");
    assert_eq!(updated["company"], "Acme");

    // Delete, then 404.
    let response = delete_auth(app.clone(), &format!("/api/v1/projects/{id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/v1/projects/{id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_nonexistent_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = access_token_for(&pool, app.clone(), "admin@example.com", UserRole::Admin).await;

    let response = delete_auth(app, "/api/v1/projects/999999", &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_archive_sets_status_only(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = access_token_for(&pool, app.clone(), "user@example.com", UserRole::User).await;

    let created = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/projects",
            project_body("Acme", "Dana"),
            &token,
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{id}/archive"),
        serde_json::json!({}),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "archived");
    assert_eq!(json["company"], "Acme");
}

// ---------------------------------------------------------------------------
// RBAC
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_project_routes_require_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/projects").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_plain_user_cannot_delete(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user = access_token_for(&pool, app.clone(), "user@example.com", UserRole::User).await;

    let created = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/projects",
            project_body("Acme", "Dana"),
            &user,
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = delete_auth(app.clone(), &format!("/api/v1/projects/{id}"), &user).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Row must be untouched.
    let response = get_auth(app, &format!("/api/v1/projects/{id}"), &user).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// A non-admin, non-manager caller invoking bulk delete is rejected before
/// any row is modified.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_plain_user_cannot_bulk_delete(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user = access_token_for(&pool, app.clone(), "user@example.com", UserRole::User).await;

    let created = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/projects",
            project_body("Acme", "Dana"),
            &user,
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/projects/bulk",
        serde_json::json!({ "ids": [id], "action": "delete" }),
        &user,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, &format!("/api/v1/projects/{id}"), &user).await;
    assert_eq!(response.status(), StatusCode::OK, "no row was modified");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_manager_can_bulk_archive(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let manager =
        access_token_for(&pool, app.clone(), "manager@example.com", UserRole::Manager).await;

    let a = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/projects",
            project_body("Acme", "Dana"),
            &manager,
        )
        .await,
    )
    .await;
    let b = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/projects",
            project_body("Globex", "Noa"),
            &manager,
        )
        .await,
    )
    .await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/projects/bulk",
        serde_json::json!({ "ids": [a["id"], b["id"]], "action": "archive" }),
        &manager,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["affected"], 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_bulk_rejects_empty_ids(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = access_token_for(&pool, app.clone(), "admin@example.com", UserRole::Admin).await;

    let response = post_json_auth(
        app,
        "/api/v1/projects/bulk",
        serde_json::json!({ "ids": [], "action": "archive" }),
        &admin,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Backup export / import
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_backup_export_import_round_trip(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = access_token_for(&pool, app.clone(), "admin@example.com", UserRole::Admin).await;

    post_json_auth(
        app.clone(),
        "/api/v1/projects",
        project_body("Acme", "Dana"),
        &admin,
    )
    .await;

    let response = get_auth(app.clone(), "/api/v1/projects/export", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let backup = body_json(response).await;
    assert_eq!(backup["projects"].as_array().unwrap().len(), 1);
    assert!(backup["lastUpdated"].is_string());

    // Re-import the exported document; ids/timestamps are ignored on the
    // way back in.
    let response = post_json_auth(app.clone(), "/api/v1/projects/import", backup, &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["imported"], 1);

    let response = get_auth(app, "/api/v1/projects", &admin).await;
    let json = body_json(response).await;
    assert_eq!(json["pagination"]["total"], 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_import_requires_manager(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user = access_token_for(&pool, app.clone(), "user@example.com", UserRole::User).await;

    let response = post_json_auth(
        app,
        "/api/v1/projects/import",
        serde_json::json!({ "projects": [project_body("Acme", "Dana")] }),
        &user,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

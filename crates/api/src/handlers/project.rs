//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sourcedesk_core::error::CoreError;
use sourcedesk_core::types::DbId;
use sourcedesk_db::models::project::{
    BulkAction, CreateProject, FilterOptions, Project, ProjectListQuery, ProjectPage,
    UpdateProject,
};
use sourcedesk_db::repositories::ProjectRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /projects/bulk`.
#[derive(Debug, Deserialize)]
pub struct BulkActionRequest {
    pub ids: Vec<DbId>,
    pub action: BulkAction,
}

/// Response body for `POST /projects/bulk`.
#[derive(Debug, Serialize)]
pub struct BulkActionResponse {
    pub success: bool,
    pub affected: u64,
}

/// Backup document produced by `GET /projects/export` and accepted by
/// `POST /projects/import`.
#[derive(Debug, Serialize)]
pub struct BackupDocument {
    pub projects: Vec<Project>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

/// Request body for `POST /projects/import`.
#[derive(Debug, Deserialize)]
pub struct ImportDocument {
    pub projects: Vec<CreateProject>,
    /// Timestamp recorded by whoever produced the backup; informational.
    #[serde(rename = "lastUpdated")]
    pub last_updated: Option<String>,
}

/// Response body for `POST /projects/import`.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects
///
/// Filtered, sorted, paginated listing. The pagination block always
/// reflects the same predicate as the returned page.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<ProjectListQuery>,
) -> AppResult<Json<ProjectPage>> {
    params.validate()?;
    let page = ProjectRepo::list(&state.pool, &params).await?;
    Ok(Json(page))
}

/// GET /api/v1/projects/filter-options
pub async fn filter_options(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<FilterOptions>> {
    let options = ProjectRepo::filter_options(&state.pool).await?;
    Ok(Json(options))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    input.validate()?;
    let project = ProjectRepo::create(&state.pool, &input, Some(auth.user_id)).await?;
    tracing::info!(project_id = project.id, user_id = auth.user_id, "Created project");
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    input.validate()?;
    let project = ProjectRepo::update(&state.pool, id, &input, Some(auth.user_id))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Hard delete. Admin or manager only.
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::delete(&state.pool, id, Some(user.user_id)).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

/// POST /api/v1/projects/{id}/archive
///
/// Sugar for updating only the status to `archived`.
pub async fn archive(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::archive(&state.pool, id, Some(auth.user_id))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// POST /api/v1/projects/bulk
///
/// Apply one status transition (or delete) to a batch of ids. Admin or
/// manager only; the role check runs before the body is parsed, so a
/// forbidden caller never touches any row.
pub async fn bulk_action(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<BulkActionRequest>,
) -> AppResult<Json<BulkActionResponse>> {
    if input.ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "ids must not be empty".into(),
        )));
    }

    let affected = ProjectRepo::bulk_action(&state.pool, &input.ids, input.action).await?;
    tracing::info!(
        affected,
        user_id = user.user_id,
        action = ?input.action,
        "Applied bulk project action"
    );
    Ok(Json(BulkActionResponse {
        success: true,
        affected,
    }))
}

/// GET /api/v1/projects/export
///
/// Full JSON backup of the project set. Admin or manager only.
pub async fn export_json(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
) -> AppResult<Json<BackupDocument>> {
    let projects = ProjectRepo::list_all(&state.pool).await?;
    Ok(Json(BackupDocument {
        projects,
        last_updated: chrono::Utc::now().to_rfc3339(),
    }))
}

/// POST /api/v1/projects/import
///
/// Bulk insert from a backup document, all rows in one transaction. Admin
/// or manager only.
pub async fn import(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<ImportDocument>,
) -> AppResult<Json<ImportResponse>> {
    if input.projects.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "projects must not be empty".into(),
        )));
    }
    for project in &input.projects {
        project.validate()?;
    }

    let imported = ProjectRepo::import(&state.pool, &input.projects, Some(user.user_id)).await?;
    tracing::info!(imported, user_id = user.user_id, "Imported projects from backup");
    Ok(Json(ImportResponse { imported }))
}

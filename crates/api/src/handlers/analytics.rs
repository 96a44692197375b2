//! Handlers for the `/analytics` resource.
//!
//! All endpoints are pure reads over the current project set.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use sourcedesk_core::csv;
use sourcedesk_db::models::analytics::{
    ClientStats, ExportFilter, GroupBreakdown, ModelBreakdown, OverviewStats, SourcerBreakdown,
    SourcerHoursDeficit, StatusBreakdown, TimelineBucket,
};
use sourcedesk_db::models::project::Project;
use sourcedesk_db::repositories::analytics_repo::DEFAULT_MIN_HOURS;
use sourcedesk_db::repositories::AnalyticsRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Default number of rows returned by `GET /analytics/recent`.
const DEFAULT_RECENT_LIMIT: i64 = 10;

/// Default trailing window in months for `GET /analytics/timeline`.
const DEFAULT_TIMELINE_MONTHS: i32 = 12;

/// Column order of the CSV export. Kept stable for downstream spreadsheets.
const CSV_HEADERS: &[&str] = &[
    "ID",
    "Company",
    "Sourcer",
    "Group",
    "Model",
    "Roles",
    "Roles Count",
    "Hours/Hires",
    "Start Date",
    "End Date",
    "Time to Hire",
    "Status",
    "Notes",
    "Created At",
];

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query parameters for `GET /analytics/lacking-hours`.
#[derive(Debug, Deserialize)]
pub struct LackingHoursParams {
    pub min_hours: Option<i64>,
}

/// Query parameters for `GET /analytics/recent`.
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub limit: Option<i64>,
}

/// Query parameters for `GET /analytics/timeline`.
#[derive(Debug, Deserialize)]
pub struct TimelineParams {
    pub months: Option<i32>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/analytics/overview
pub async fn overview(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<OverviewStats>> {
    let stats = AnalyticsRepo::overview(&state.pool).await?;
    Ok(Json(stats))
}

/// GET /api/v1/analytics/by-model
pub async fn by_model(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<ModelBreakdown>>> {
    Ok(Json(AnalyticsRepo::by_model(&state.pool).await?))
}

/// GET /api/v1/analytics/by-group
pub async fn by_group(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<GroupBreakdown>>> {
    Ok(Json(AnalyticsRepo::by_group(&state.pool).await?))
}

/// GET /api/v1/analytics/by-status
pub async fn by_status(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<StatusBreakdown>>> {
    Ok(Json(AnalyticsRepo::by_status(&state.pool).await?))
}

/// GET /api/v1/analytics/by-sourcer
pub async fn by_sourcer(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<SourcerBreakdown>>> {
    Ok(Json(AnalyticsRepo::by_sourcer(&state.pool).await?))
}

/// GET /api/v1/analytics/clients
pub async fn clients(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<ClientStats>>> {
    Ok(Json(AnalyticsRepo::client_stats(&state.pool).await?))
}

/// GET /api/v1/analytics/lacking-hours?min_hours=200
///
/// Sourcers whose active-project effort falls below the threshold,
/// most-deficient first.
pub async fn lacking_hours(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<LackingHoursParams>,
) -> AppResult<Json<Vec<SourcerHoursDeficit>>> {
    let min_hours = params.min_hours.unwrap_or(DEFAULT_MIN_HOURS).max(0);
    let report = AnalyticsRepo::sourcers_lacking_hours(&state.pool, min_hours).await?;
    Ok(Json(report))
}

/// GET /api/v1/analytics/recent?limit=10
pub async fn recent(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<RecentParams>,
) -> AppResult<Json<Vec<Project>>> {
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, 100);
    Ok(Json(AnalyticsRepo::recent(&state.pool, limit).await?))
}

/// GET /api/v1/analytics/timeline?months=12
pub async fn timeline(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<TimelineParams>,
) -> AppResult<Json<Vec<TimelineBucket>>> {
    let months = params.months.unwrap_or(DEFAULT_TIMELINE_MONTHS).clamp(1, 120);
    Ok(Json(AnalyticsRepo::timeline(&state.pool, months).await?))
}

/// GET /api/v1/analytics/export?status=&group_type=&model_type=
///
/// CSV export of the (optionally filtered) project set, newest first.
pub async fn export_csv(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filter): Query<ExportFilter>,
) -> AppResult<Response> {
    let projects = AnalyticsRepo::export_projects(&state.pool, &filter).await?;

    let rows: Vec<Vec<String>> = projects.iter().map(csv_row).collect();
    let csv_output = csv::render(CSV_HEADERS, &rows);

    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "text/csv")
        .header(
            "Content-Disposition",
            "attachment; filename=\"projects.csv\"",
        )
        .body(Body::from(csv_output))
        .unwrap())
}

/// Map one project row into CSV cells, in `CSV_HEADERS` order.
fn csv_row(project: &Project) -> Vec<String> {
    vec![
        project.id.to_string(),
        project.company.clone(),
        project.sourcer.clone(),
        project.group_type.as_str().to_string(),
        project.model_type.as_str().to_string(),
        project.roles.clone().unwrap_or_default(),
        project.roles_count.to_string(),
        project
            .hours_or_hires
            .map_or(String::new(), |v| v.to_string()),
        project.start_date.map_or(String::new(), |d| d.to_string()),
        project.end_date.map_or(String::new(), |d| d.to_string()),
        project.time_to_hire.clone().unwrap_or_default(),
        project.status.as_str().to_string(),
        project.notes.clone().unwrap_or_default(),
        project.created_at.to_rfc3339(),
    ]
}

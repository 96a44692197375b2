//! Read-side aggregate rows produced by [`AnalyticsRepo`].
//!
//! [`AnalyticsRepo`]: crate::repositories::AnalyticsRepo

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::project::{GroupType, ModelType, ProjectStatus};

/// Dashboard headline numbers over the whole project set.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_projects: i64,
    pub active_projects: i64,
    pub completed_projects: i64,
    pub total_roles: i64,
    /// Sum of `hours_or_hires` over rows where the value is at or below the
    /// hires pivot (small values are hire counts, not hours).
    pub total_hires: i64,
    pub total_companies: i64,
    pub total_sourcers: i64,
}

/// Project count per billing model.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModelBreakdown {
    pub model: ModelType,
    pub count: i64,
}

/// Project count per group bucket.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupBreakdown {
    pub group: GroupType,
    pub count: i64,
}

/// Project count per lifecycle status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusBreakdown {
    pub status: ProjectStatus,
    pub count: i64,
}

/// Per-sourcer workload, ordered by project count descending.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcerBreakdown {
    pub sourcer: String,
    pub projects: i64,
    pub total_roles: i64,
}

/// Per-company rollup, ordered by project count descending.
///
/// `total_hours` and `total_hires` split the dual-meaning
/// `hours_or_hires` column on the pivot value: larger values are treated
/// as hours worked, small ones as hire counts.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub company: String,
    pub project_count: i64,
    pub total_roles: i64,
    pub total_hires: i64,
    pub total_hours: i64,
}

/// A sourcer whose active-project effort falls below the target threshold.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcerHoursDeficit {
    pub sourcer: String,
    pub total_hours: i64,
    pub missing_hours: i64,
}

/// One calendar month of project starts.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBucket {
    /// First day of the month.
    pub month: NaiveDate,
    pub count: i64,
    pub total_roles: i64,
}

/// Subset of list filters accepted by the CSV export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportFilter {
    pub status: Option<ProjectStatus>,
    pub group_type: Option<GroupType>,
    pub model_type: Option<ModelType>,
}

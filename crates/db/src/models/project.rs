//! Project entity model, enum columns, and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sourcedesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Enum columns
// ---------------------------------------------------------------------------

/// Geographic/organizational bucket for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum GroupType {
    #[sqlx(rename = "Israel")]
    Israel,
    #[sqlx(rename = "Global")]
    Global,
}

impl GroupType {
    pub const ALL: &'static [GroupType] = &[GroupType::Israel, GroupType::Global];

    pub fn as_str(self) -> &'static str {
        match self {
            GroupType::Israel => "Israel",
            GroupType::Global => "Global",
        }
    }
}

/// Billing model for a project.
///
/// `Hourly` engagements bill time; `Success` variants bill per hire, which
/// changes how `hours_or_hires` is interpreted downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum ModelType {
    #[sqlx(rename = "Hourly")]
    Hourly,
    #[sqlx(rename = "Success")]
    Success,
    #[sqlx(rename = "Success Executive")]
    #[serde(rename = "Success Executive")]
    SuccessExecutive,
}

impl ModelType {
    pub const ALL: &'static [ModelType] = &[
        ModelType::Hourly,
        ModelType::Success,
        ModelType::SuccessExecutive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelType::Hourly => "Hourly",
            ModelType::Success => "Success",
            ModelType::SuccessExecutive => "Success Executive",
        }
    }
}

/// Project lifecycle status. "archived" is a status value, not a deletion;
/// delete is a hard delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub const ALL: &'static [ProjectStatus] = &[
        ProjectStatus::Active,
        ProjectStatus::Completed,
        ProjectStatus::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub company: String,
    pub sourcer: String,
    pub group_type: GroupType,
    pub model_type: ModelType,
    pub roles: Option<String>,
    pub roles_count: i32,
    /// Hours worked under the Hourly model, hire count under Success models.
    pub hours_or_hires: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub time_to_hire: Option<String>,
    pub notes: Option<String>,
    pub status: ProjectStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create / update DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "Sourcer name is required"))]
    pub sourcer: String,
    pub group_type: GroupType,
    pub model_type: ModelType,
    pub roles: Option<String>,
    /// Defaults to 1 if omitted.
    #[validate(range(min = 0))]
    pub roles_count: Option<i32>,
    #[validate(range(min = 0))]
    pub hours_or_hires: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub time_to_hire: Option<String>,
    pub notes: Option<String>,
    /// Defaults to `active` if omitted.
    pub status: Option<ProjectStatus>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, message = "Company name must not be empty"))]
    pub company: Option<String>,
    #[validate(length(min = 1, message = "Sourcer name must not be empty"))]
    pub sourcer: Option<String>,
    pub group_type: Option<GroupType>,
    pub model_type: Option<ModelType>,
    pub roles: Option<String>,
    #[validate(range(min = 0))]
    pub roles_count: Option<i32>,
    #[validate(range(min = 0))]
    pub hours_or_hires: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub time_to_hire: Option<String>,
    pub notes: Option<String>,
    pub status: Option<ProjectStatus>,
}

// ---------------------------------------------------------------------------
// List query parameters
// ---------------------------------------------------------------------------

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}

/// Filter, pagination, and sort parameters for the project list endpoint.
///
/// Every supported predicate is an explicit typed field; all active
/// predicates are ANDed together. `search` matches case-insensitively
/// against company, sourcer, roles, and notes as a single OR group.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProjectListQuery {
    pub sourcer: Option<String>,
    pub model_type: Option<ModelType>,
    pub company: Option<String>,
    pub group_type: Option<GroupType>,
    pub status: Option<ProjectStatus>,
    #[validate(range(min = 0))]
    pub roles_min: Option<i32>,
    #[validate(range(min = 0))]
    pub roles_max: Option<i32>,
    #[validate(range(min = 0))]
    pub hires_min: Option<i32>,
    #[validate(range(min = 0))]
    pub hires_max: Option<i32>,
    pub start_date_from: Option<NaiveDate>,
    pub start_date_to: Option<NaiveDate>,
    pub search: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
    /// Sorted against a column whitelist; unknown values fall back to
    /// `created_at` rather than erroring.
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

// ---------------------------------------------------------------------------
// List results
// ---------------------------------------------------------------------------

/// Pagination metadata returned alongside a page of rows.
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

/// One page of projects plus pagination metadata.
///
/// `pagination.total` reflects the same filter predicate as `data`,
/// recomputed without the LIMIT/OFFSET.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectPage {
    pub data: Vec<Project>,
    pub pagination: Pagination,
}

/// Distinct values and static enumerations used to populate filter UIs.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub sourcers: Vec<String>,
    pub companies: Vec<String>,
    pub model_types: Vec<&'static str>,
    pub group_types: Vec<&'static str>,
    pub statuses: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// Bulk actions
// ---------------------------------------------------------------------------

/// Batch state transition applied to a set of project ids.
///
/// Unknown actions are rejected at deserialization, before any row is
/// touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Archive,
    Complete,
    Activate,
    Delete,
}

impl BulkAction {
    /// The status a non-delete action transitions rows into.
    pub fn target_status(self) -> Option<ProjectStatus> {
        match self {
            BulkAction::Archive => Some(ProjectStatus::Archived),
            BulkAction::Complete => Some(ProjectStatus::Completed),
            BulkAction::Activate => Some(ProjectStatus::Active),
            BulkAction::Delete => None,
        }
    }
}

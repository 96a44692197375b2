//! Repository for the `projects` table.
//!
//! List queries are assembled from an explicit filter struct: every active
//! predicate becomes a `$n` placeholder with a typed bind value, ANDed
//! together. The page and the total count always run against the same
//! WHERE clause.

use sourcedesk_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::audit::{AuditAction, CreateAuditLog};
use crate::models::project::{
    BulkAction, CreateProject, FilterOptions, GroupType, ModelType, Pagination, Project,
    ProjectListQuery, ProjectPage, ProjectStatus, UpdateProject,
};
use crate::repositories::audit_repo::AuditLogRepo;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "\
    id, company, sourcer, group_type, model_type, roles, roles_count, \
    hours_or_hires, start_date, end_date, time_to_hire, notes, status, \
    created_at, updated_at";

/// Columns accepted for `sort_by`. Anything else falls back to `created_at`.
const SORT_COLUMNS: &[&str] = &[
    "company",
    "sourcer",
    "group_type",
    "model_type",
    "roles_count",
    "hours_or_hires",
    "start_date",
    "end_date",
    "status",
    "created_at",
    "updated_at",
];

/// Entity type recorded in audit entries for project mutations.
const ENTITY_TYPE: &str = "project";

/// Default page size when the caller does not specify one.
const DEFAULT_LIMIT: i64 = 20;

/// Hard cap on page size.
const MAX_LIMIT: i64 = 100;

/// Provides CRUD, bulk transitions, and filtered listing for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// List projects matching the given filters, paginated and sorted.
    ///
    /// The total count is computed by re-running the same predicate without
    /// pagination, so `pagination.total` always agrees with the filters
    /// applied to `data`.
    pub async fn list(pool: &PgPool, params: &ProjectListQuery) -> Result<ProjectPage, sqlx::Error> {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = (page - 1) * limit;

        let sort_by = params
            .sort_by
            .as_deref()
            .filter(|column| SORT_COLUMNS.contains(column))
            .unwrap_or("created_at");
        let sort_order = params.sort_order.unwrap_or_default().as_sql();

        let (where_clause, bind_values, bind_idx) = build_project_filter(params);

        let count_query = format!("SELECT COUNT(*)::BIGINT FROM projects {where_clause}");
        let total = bind_filter_values_scalar(
            sqlx::query_scalar::<_, i64>(&count_query),
            &bind_values,
        )
        .fetch_one(pool)
        .await?;

        let page_query = format!(
            "SELECT {COLUMNS} FROM projects {where_clause} \
             ORDER BY {sort_by} {sort_order} \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );
        let data = bind_filter_values(sqlx::query_as::<_, Project>(&page_query), &bind_values)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(ProjectPage {
            data,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages: (total + limit - 1) / limit,
            },
        })
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new project and its CREATE audit entry in one transaction.
    ///
    /// `roles_count` defaults to 1 and `status` to `active` when omitted.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
        actor_id: Option<DbId>,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = Self::insert(&mut *tx, input).await?;
        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog {
                user_id: actor_id,
                action: AuditAction::Create,
                entity_type: ENTITY_TYPE.to_string(),
                entity_id: project.id,
                old_values: None,
                new_values: Some(snapshot(&project)),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(project)
    }

    /// Update a project and write an UPDATE audit entry with old/new
    /// snapshots, all in one transaction. Only non-`None` fields are
    /// applied; `updated_at` is always refreshed.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
        actor_id: Option<DbId>,
    ) -> Result<Option<Project>, sqlx::Error> {
        Self::update_with_action(pool, id, input, actor_id, AuditAction::Update).await
    }

    /// Archive a project: update only its status and record an ARCHIVE
    /// audit entry. Equivalent to `update` with `status = archived`.
    pub async fn archive(
        pool: &PgPool,
        id: DbId,
        actor_id: Option<DbId>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let input = UpdateProject {
            status: Some(ProjectStatus::Archived),
            ..UpdateProject::default()
        };
        Self::update_with_action(pool, id, &input, actor_id, AuditAction::Archive).await
    }

    /// Hard-delete a project after capturing its pre-delete snapshot for
    /// the DELETE audit entry. Returns `false` if the id has no row.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
        actor_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        let Some(existing) = sqlx::query_as::<_, Project>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog {
                user_id: actor_id,
                action: AuditAction::Delete,
                entity_type: ENTITY_TYPE.to_string(),
                entity_id: id,
                old_values: Some(snapshot(&existing)),
                new_values: None,
            },
        )
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Apply a bulk status transition (or delete) to every matching row in
    /// one statement, returning the number of rows affected.
    ///
    /// Bulk actions do not write per-row audit entries.
    pub async fn bulk_action(
        pool: &PgPool,
        ids: &[DbId],
        action: BulkAction,
    ) -> Result<u64, sqlx::Error> {
        let result = match action.target_status() {
            Some(status) => {
                sqlx::query(
                    "UPDATE projects SET status = $2, updated_at = NOW() WHERE id = ANY($1)",
                )
                .bind(ids)
                .bind(status)
                .execute(pool)
                .await?
            }
            None => {
                sqlx::query("DELETE FROM projects WHERE id = ANY($1)")
                    .bind(ids)
                    .execute(pool)
                    .await?
            }
        };
        Ok(result.rows_affected())
    }

    /// Insert a batch of projects from a backup document in one
    /// transaction, with one CREATE audit entry per row.
    pub async fn import(
        pool: &PgPool,
        inputs: &[CreateProject],
        actor_id: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut imported = 0u64;

        for input in inputs {
            let project = Self::insert(&mut *tx, input).await?;
            AuditLogRepo::insert(
                &mut *tx,
                &CreateAuditLog {
                    user_id: actor_id,
                    action: AuditAction::Create,
                    entity_type: ENTITY_TYPE.to_string(),
                    entity_id: project.id,
                    old_values: None,
                    new_values: Some(snapshot(&project)),
                },
            )
            .await?;
            imported += 1;
        }

        tx.commit().await?;
        Ok(imported)
    }

    /// Distinct sourcer and company values currently present, plus the
    /// static enumerations, for populating filter UIs.
    pub async fn filter_options(pool: &PgPool) -> Result<FilterOptions, sqlx::Error> {
        let sourcers =
            sqlx::query_scalar::<_, String>("SELECT DISTINCT sourcer FROM projects ORDER BY sourcer")
                .fetch_all(pool)
                .await?;
        let companies =
            sqlx::query_scalar::<_, String>("SELECT DISTINCT company FROM projects ORDER BY company")
                .fetch_all(pool)
                .await?;

        Ok(FilterOptions {
            sourcers,
            companies,
            model_types: ModelType::ALL.iter().map(|m| m.as_str()).collect(),
            group_types: GroupType::ALL.iter().map(|g| g.as_str()).collect(),
            statuses: ProjectStatus::ALL.iter().map(|s| s.as_str()).collect(),
        })
    }

    /// All projects ordered by most recently created first. Used by the
    /// JSON backup export.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Shared INSERT used by `create` and `import`.
    async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (company, sourcer, group_type, model_type, roles, roles_count, \
                                   hours_or_hires, start_date, end_date, time_to_hire, notes, status)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 1), $7, $8, $9, $10, $11, COALESCE($12, 'active'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.company)
            .bind(&input.sourcer)
            .bind(input.group_type)
            .bind(input.model_type)
            .bind(&input.roles)
            .bind(input.roles_count)
            .bind(input.hours_or_hires)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.time_to_hire)
            .bind(&input.notes)
            .bind(input.status)
            .fetch_one(executor)
            .await
    }

    /// Shared update path: fetch the old row, apply the patch, and record
    /// the audit entry with the given action, all in one transaction.
    async fn update_with_action(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
        actor_id: Option<DbId>,
        action: AuditAction,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        let Some(old) = sqlx::query_as::<_, Project>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let update = format!(
            "UPDATE projects SET
                company = COALESCE($2, company),
                sourcer = COALESCE($3, sourcer),
                group_type = COALESCE($4, group_type),
                model_type = COALESCE($5, model_type),
                roles = COALESCE($6, roles),
                roles_count = COALESCE($7, roles_count),
                hours_or_hires = COALESCE($8, hours_or_hires),
                start_date = COALESCE($9, start_date),
                end_date = COALESCE($10, end_date),
                time_to_hire = COALESCE($11, time_to_hire),
                notes = COALESCE($12, notes),
                status = COALESCE($13, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Project>(&update)
            .bind(id)
            .bind(&input.company)
            .bind(&input.sourcer)
            .bind(input.group_type)
            .bind(input.model_type)
            .bind(&input.roles)
            .bind(input.roles_count)
            .bind(input.hours_or_hires)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.time_to_hire)
            .bind(&input.notes)
            .bind(input.status)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog {
                user_id: actor_id,
                action,
                entity_type: ENTITY_TYPE.to_string(),
                entity_id: id,
                old_values: Some(snapshot(&old)),
                new_values: Some(snapshot(&updated)),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }
}

/// Serialize a project row for an audit snapshot.
fn snapshot(project: &Project) -> serde_json::Value {
    serde_json::to_value(project).unwrap_or(serde_json::Value::Null)
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built project list queries.
enum BindValue {
    Int(i32),
    Text(String),
    Date(chrono::NaiveDate),
}

/// Build a WHERE clause and bind values from the list query's filter fields.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The
/// `where_clause` is empty if no filters are active, or starts with `WHERE `.
fn build_project_filter(params: &ProjectListQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(ref sourcer) = params.sourcer {
        conditions.push(format!("sourcer = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(sourcer.clone()));
    }

    if let Some(model_type) = params.model_type {
        conditions.push(format!("model_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(model_type.as_str().to_string()));
    }

    if let Some(ref company) = params.company {
        conditions.push(format!("company = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(company.clone()));
    }

    if let Some(group_type) = params.group_type {
        conditions.push(format!("group_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(group_type.as_str().to_string()));
    }

    if let Some(status) = params.status {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(status.as_str().to_string()));
    }

    if let Some(roles_min) = params.roles_min {
        conditions.push(format!("roles_count >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Int(roles_min));
    }

    if let Some(roles_max) = params.roles_max {
        conditions.push(format!("roles_count <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Int(roles_max));
    }

    if let Some(hires_min) = params.hires_min {
        conditions.push(format!("hours_or_hires >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Int(hires_min));
    }

    if let Some(hires_max) = params.hires_max {
        conditions.push(format!("hours_or_hires <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Int(hires_max));
    }

    if let Some(from) = params.start_date_from {
        conditions.push(format!("start_date >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Date(from));
    }

    if let Some(to) = params.start_date_to {
        conditions.push(format!("start_date <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Date(to));
    }

    if let Some(ref search) = params.search {
        let pattern = format!("%{search}%");
        conditions.push(format!(
            "(company ILIKE ${bind_idx} OR sourcer ILIKE ${} OR roles ILIKE ${} OR notes ILIKE ${})",
            bind_idx + 1,
            bind_idx + 2,
            bind_idx + 3
        ));
        bind_idx += 4;
        for _ in 0..4 {
            bind_values.push(BindValue::Text(pattern.clone()));
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_filter_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Date(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_filter_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Date(v) => q = q.bind(*v),
        }
    }
    q
}

//! Read-side aggregations over the `projects` table.
//!
//! Every method is a pure read; nothing here writes. Aggregations run in
//! the database so the numbers always reflect the current row set.

use sqlx::PgPool;

use crate::models::analytics::{
    ClientStats, ExportFilter, GroupBreakdown, ModelBreakdown, OverviewStats, SourcerBreakdown,
    SourcerHoursDeficit, StatusBreakdown, TimelineBucket,
};
use crate::models::project::Project;
use crate::repositories::project_repo::COLUMNS;

/// Pivot separating the two meanings of `hours_or_hires`: values at or
/// below this are treated as hire counts (Success engagements), larger
/// values as hours worked (Hourly engagements). Inherited heuristic --
/// the column itself does not say which meaning applies.
const HIRES_PIVOT: i32 = 10;

/// Synthetic hours credited per role on Success-style engagements when
/// computing sourcer effort totals.
const SUCCESS_HOURS_PER_ROLE: i32 = 30;

/// Default threshold for the hours-deficit report.
pub const DEFAULT_MIN_HOURS: i64 = 200;

/// Provides dashboard aggregations and the CSV/backup export reads.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Headline totals for the dashboard overview.
    pub async fn overview(pool: &PgPool) -> Result<OverviewStats, sqlx::Error> {
        sqlx::query_as::<_, OverviewStats>(
            "SELECT \
                COUNT(*)::BIGINT AS total_projects, \
                COUNT(*) FILTER (WHERE status = 'active')::BIGINT AS active_projects, \
                COUNT(*) FILTER (WHERE status = 'completed')::BIGINT AS completed_projects, \
                COALESCE(SUM(roles_count), 0)::BIGINT AS total_roles, \
                COALESCE(SUM(hours_or_hires) FILTER (WHERE hours_or_hires <= $1), 0)::BIGINT AS total_hires, \
                COUNT(DISTINCT company)::BIGINT AS total_companies, \
                COUNT(DISTINCT sourcer)::BIGINT AS total_sourcers \
             FROM projects",
        )
        .bind(HIRES_PIVOT)
        .fetch_one(pool)
        .await
    }

    /// Project count per billing model.
    pub async fn by_model(pool: &PgPool) -> Result<Vec<ModelBreakdown>, sqlx::Error> {
        sqlx::query_as::<_, ModelBreakdown>(
            "SELECT model_type AS model, COUNT(*)::BIGINT AS count \
             FROM projects GROUP BY model_type",
        )
        .fetch_all(pool)
        .await
    }

    /// Project count per group bucket.
    pub async fn by_group(pool: &PgPool) -> Result<Vec<GroupBreakdown>, sqlx::Error> {
        sqlx::query_as::<_, GroupBreakdown>(
            "SELECT group_type AS \"group\", COUNT(*)::BIGINT AS count \
             FROM projects GROUP BY group_type",
        )
        .fetch_all(pool)
        .await
    }

    /// Project count per lifecycle status.
    pub async fn by_status(pool: &PgPool) -> Result<Vec<StatusBreakdown>, sqlx::Error> {
        sqlx::query_as::<_, StatusBreakdown>(
            "SELECT status, COUNT(*)::BIGINT AS count FROM projects GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// Per-sourcer project count and role total, busiest first.
    pub async fn by_sourcer(pool: &PgPool) -> Result<Vec<SourcerBreakdown>, sqlx::Error> {
        sqlx::query_as::<_, SourcerBreakdown>(
            "SELECT sourcer, \
                    COUNT(*)::BIGINT AS projects, \
                    COALESCE(SUM(roles_count), 0)::BIGINT AS total_roles \
             FROM projects \
             GROUP BY sourcer \
             ORDER BY projects DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Per-company rollup with the hours/hires split, busiest first.
    pub async fn client_stats(pool: &PgPool) -> Result<Vec<ClientStats>, sqlx::Error> {
        sqlx::query_as::<_, ClientStats>(
            "SELECT company, \
                    COUNT(*)::BIGINT AS project_count, \
                    COALESCE(SUM(roles_count), 0)::BIGINT AS total_roles, \
                    COALESCE(SUM(hours_or_hires) FILTER (WHERE hours_or_hires <= $1), 0)::BIGINT AS total_hires, \
                    COALESCE(SUM(hours_or_hires) FILTER (WHERE hours_or_hires > $1), 0)::BIGINT AS total_hours \
             FROM projects \
             GROUP BY company \
             ORDER BY project_count DESC",
        )
        .bind(HIRES_PIVOT)
        .fetch_all(pool)
        .await
    }

    /// Sourcers whose active-project effort falls strictly below
    /// `min_hours`, most-deficient first.
    ///
    /// Effort per active row: `hours_or_hires` (0 if null) under the Hourly
    /// model, otherwise `roles_count * SUCCESS_HOURS_PER_ROLE`. Sourcers at
    /// or above the threshold are omitted entirely.
    pub async fn sourcers_lacking_hours(
        pool: &PgPool,
        min_hours: i64,
    ) -> Result<Vec<SourcerHoursDeficit>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT sourcer, \
                    SUM(CASE WHEN model_type = 'Hourly' THEN COALESCE(hours_or_hires, 0) \
                             ELSE roles_count * $2 END)::BIGINT AS total_hours \
             FROM projects \
             WHERE status = 'active' \
             GROUP BY sourcer \
             HAVING SUM(CASE WHEN model_type = 'Hourly' THEN COALESCE(hours_or_hires, 0) \
                             ELSE roles_count * $2 END) < $1 \
             ORDER BY total_hours ASC",
        )
        .bind(min_hours)
        .bind(SUCCESS_HOURS_PER_ROLE)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(sourcer, total_hours)| SourcerHoursDeficit {
                sourcer,
                total_hours,
                missing_hours: min_hours - total_hours,
            })
            .collect())
    }

    /// Most recent `limit` projects by creation time.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC LIMIT $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Project starts per calendar month over the trailing `months` months,
    /// chronologically ascending. Rows without a start date are excluded.
    pub async fn timeline(pool: &PgPool, months: i32) -> Result<Vec<TimelineBucket>, sqlx::Error> {
        sqlx::query_as::<_, TimelineBucket>(
            "SELECT DATE_TRUNC('month', start_date)::DATE AS month, \
                    COUNT(*)::BIGINT AS count, \
                    COALESCE(SUM(roles_count), 0)::BIGINT AS total_roles \
             FROM projects \
             WHERE start_date IS NOT NULL \
               AND start_date >= (NOW() - make_interval(months => $1))::DATE \
             GROUP BY month \
             ORDER BY month ASC",
        )
        .bind(months)
        .fetch_all(pool)
        .await
    }

    /// Projects matching the export filter subset, newest first. Feeds the
    /// CSV export.
    pub async fn export_projects(
        pool: &PgPool,
        filter: &ExportFilter,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_values: Vec<String> = Vec::new();
        let mut bind_idx = 1u32;

        if let Some(status) = filter.status {
            conditions.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(status.as_str().to_string());
        }
        if let Some(group_type) = filter.group_type {
            conditions.push(format!("group_type = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(group_type.as_str().to_string());
        }
        if let Some(model_type) = filter.model_type {
            conditions.push(format!("model_type = ${bind_idx}"));
            let _ = bind_idx;
            bind_values.push(model_type.as_str().to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query =
            format!("SELECT {COLUMNS} FROM projects {where_clause} ORDER BY created_at DESC");
        let mut q = sqlx::query_as::<_, Project>(&query);
        for val in &bind_values {
            q = q.bind(val.as_str());
        }
        q.fetch_all(pool).await
    }
}

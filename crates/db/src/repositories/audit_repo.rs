//! Repository for the `audit_logs` table.
//!
//! Strictly append-only: there is an insert and a read path for
//! traceability, nothing else.

use sourcedesk_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::audit::{AuditLog, CreateAuditLog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, action, entity_type, entity_id, old_values, new_values, created_at";

/// Provides append and traceability reads for audit logs.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append one audit entry, returning the created row.
    ///
    /// Generic over the executor so callers can run the insert inside the
    /// same transaction as the mutation being recorded.
    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        entry: &CreateAuditLog,
    ) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs (user_id, action, entity_type, entity_id, old_values, new_values)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.user_id)
            .bind(entry.action)
            .bind(&entry.entity_type)
            .bind(entry.entity_id)
            .bind(&entry.old_values)
            .bind(&entry.new_values)
            .fetch_one(executor)
            .await
    }

    /// List entries for one entity, newest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs
             WHERE entity_type = $1 AND entity_id = $2
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }
}

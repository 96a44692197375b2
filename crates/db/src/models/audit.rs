//! Audit log entity model and create DTO.
//!
//! Audit entries are immutable once written (no `updated_at`); the table is
//! append-only and the application never reads it back for business
//! decisions.

use serde::{Deserialize, Serialize};
use sourcedesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Action recorded for an audited mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Archive,
}

/// A single audit log entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    /// Null when the actor is unknown or has since been deleted.
    pub user_id: Option<DbId>,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: DbId,
    /// Pre-mutation snapshot; null on CREATE.
    pub old_values: Option<serde_json::Value>,
    /// Post-mutation snapshot; null on DELETE.
    pub new_values: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for appending a new audit log entry.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub user_id: Option<DbId>,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: DbId,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
}

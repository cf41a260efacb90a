//! Audit trail entity model and query DTOs.
//!
//! Audit entries are immutable records (no `updated_at`); consumers read
//! newest-first by timestamp.

use far_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single audit trail entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditEntry {
    pub id: DbId,
    pub asset_id: String,
    pub action: String,
    /// `None` for whole-row actions (delete).
    pub field: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_by: String,
    pub user_role: String,
    pub details: String,
    pub integrity_hash: Option<String>,
    pub timestamp: Timestamp,
}

/// DTO for inserting a new audit entry.
#[derive(Debug, Clone)]
pub struct CreateAuditEntry {
    pub asset_id: String,
    pub action: String,
    pub field: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_by: String,
    pub user_role: String,
    pub details: String,
    pub integrity_hash: Option<String>,
}

/// Filter parameters for querying the audit trail.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub asset_id: Option<String>,
    pub action: Option<String>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated response for audit queries.
#[derive(Debug, Clone, Serialize)]
pub struct AuditPage {
    pub items: Vec<AuditEntry>,
    pub total: i64,
}

/// Result of an audit trail hash-chain verification.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityCheckResult {
    /// Number of entries verified.
    pub verified_entries: i64,
    /// Whether the entire chain is valid.
    pub chain_valid: bool,
    /// ID of the first entry where the chain breaks, if any.
    pub first_break: Option<DbId>,
}

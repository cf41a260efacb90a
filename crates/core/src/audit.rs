//! Audit trail actions, detail formatting, and the integrity hash chain.
//!
//! Audit entries are append-only and immutable once created. Each entry's
//! integrity hash chains it to the previous entry so after-the-fact edits to
//! the trail are detectable.

use serde::{Deserialize, Serialize};

use crate::hashing;
use crate::roles::Role;

/// The action recorded by one audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Insert,
    Update,
    Delete,
}

impl AuditAction {
    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pending audit record produced by reconciliation.
///
/// The timestamp is assigned by the database on insert; everything else is
/// decided here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    pub asset_id: String,
    pub action: AuditAction,
    /// `None` for whole-row actions (delete).
    pub field: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_by: String,
    pub user_role: Role,
    pub details: String,
}

/// Human-readable summary for a field update.
pub fn update_detail(field: &str, old_value: &str, new_value: &str) -> String {
    format!("{field} updated from '{old_value}' to '{new_value}'")
}

/// Synthetic detail for one field of a newly inserted asset.
pub fn insert_detail(field: &str, value: &str) -> String {
    format!("{field} = {value}")
}

/// Summary for a whole-row delete.
pub fn delete_detail(asset_id: &str) -> String {
    format!("asset '{asset_id}' deleted")
}

// ---------------------------------------------------------------------------
// Integrity hash chain
// ---------------------------------------------------------------------------

/// Known seed value for the first entry in the hash chain.
const CHAIN_SEED: &str = "FAR_AUDIT_CHAIN_SEED_V1";

/// Compute the SHA-256 integrity hash for an audit entry.
///
/// `prev_hash` is the integrity hash of the previous entry, or `None` for the
/// first entry in the chain (which uses a known seed value). `entry_data` is
/// a canonical string representation of the entry's content.
pub fn compute_integrity_hash(prev_hash: Option<&str>, entry_data: &str) -> String {
    let prev = prev_hash.unwrap_or(CHAIN_SEED);
    let combined = format!("{prev}|{entry_data}");
    hashing::sha256_hex(combined.as_bytes())
}

/// Canonical string representation of an audit record for hashing.
pub fn canonical_entry_data(record: &AuditRecord) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}",
        record.asset_id,
        record.action,
        record.field.as_deref().unwrap_or(""),
        record.old_value.as_deref().unwrap_or(""),
        record.new_value.as_deref().unwrap_or(""),
        record.changed_by,
        record.user_role,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AuditRecord {
        AuditRecord {
            asset_id: "A1".to_string(),
            action: AuditAction::Update,
            field: Some("cost".to_string()),
            old_value: Some("100".to_string()),
            new_value: Some("150".to_string()),
            changed_by: "alice".to_string(),
            user_role: Role::Admin,
            details: update_detail("cost", "100", "150"),
        }
    }

    #[test]
    fn action_as_str() {
        assert_eq!(AuditAction::Insert.as_str(), "insert");
        assert_eq!(AuditAction::Update.as_str(), "update");
        assert_eq!(AuditAction::Delete.as_str(), "delete");
    }

    #[test]
    fn detail_formats() {
        assert_eq!(
            update_detail("cost", "100", "150"),
            "cost updated from '100' to '150'"
        );
        assert_eq!(insert_detail("status", "new"), "status = new");
        assert_eq!(delete_detail("A2"), "asset 'A2' deleted");
    }

    #[test]
    fn first_entry_uses_seed() {
        let hash = compute_integrity_hash(None, "entry");
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn chained_entry_differs_from_first() {
        let first = compute_integrity_hash(None, "entry_1");
        let second = compute_integrity_hash(Some(&first), "entry_2");
        assert_ne!(first, second);
    }

    #[test]
    fn same_input_produces_same_hash() {
        assert_eq!(
            compute_integrity_hash(None, "same"),
            compute_integrity_hash(None, "same")
        );
    }

    #[test]
    fn different_prev_hash_produces_different_result() {
        let a = compute_integrity_hash(Some("hash_a"), "same");
        let b = compute_integrity_hash(Some("hash_b"), "same");
        assert_ne!(a, b);
    }

    #[test]
    fn canonical_data_covers_identity_and_values() {
        let data = canonical_entry_data(&record());
        assert_eq!(data, "A1|update|cost|100|150|alice|admin");
    }
}

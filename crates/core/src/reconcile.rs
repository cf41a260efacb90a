//! The Register Reconciler.
//!
//! Diffs the previous snapshot of the asset table against the user-edited
//! candidate and returns a pure description of the row-level operations:
//! per-field updates, whole-row inserts, and whole-row deletes, each with its
//! matching audit record. Applying the result to the store is the caller's
//! job, which keeps this algorithm independently testable.
//!
//! Ordering guarantees:
//! - updates come before inserts, inserts before deletes;
//! - rows follow the candidate table's row order (previous order for deletes);
//! - fields follow the declared column order in [`crate::asset::FIELDS`].

use serde::Serialize;

use crate::asset;
use crate::audit::{self, AuditAction, AuditRecord};
use crate::error::CoreError;
use crate::numeric;
use crate::roles::Role;
use crate::snapshot::{FieldMap, Snapshot};

/// The actor an edit session is attributed to.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

/// One field-level update on an existing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldUpdate {
    pub asset_id: String,
    pub field: String,
    pub old_value: String,
    pub new_value: String,
}

/// One whole-row insert, fields in declared column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowInsert {
    pub asset_id: String,
    pub fields: Vec<(String, String)>,
}

/// One whole-row delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowDelete {
    pub asset_id: String,
}

/// A numeric field whose raw value could not be parsed and was coerced to
/// zero. Surfaced so data-entry errors are flagged rather than silently
/// zeroed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoercionWarning {
    pub asset_id: String,
    pub field: String,
    pub raw: String,
}

/// The full output of one reconciliation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileResult {
    pub updates: Vec<FieldUpdate>,
    pub inserts: Vec<RowInsert>,
    pub deletes: Vec<RowDelete>,
    /// Audit records in apply order: updates, then inserts, then deletes.
    pub audit: Vec<AuditRecord>,
    pub warnings: Vec<CoercionWarning>,
}

impl ReconcileResult {
    /// True when the candidate matched the previous snapshot exactly.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.inserts.is_empty() && self.deletes.is_empty()
    }
}

/// Diff `previous` against `candidate` and describe the changes.
///
/// Both tables are keyed by asset_id. Numeric fields are normalized before
/// comparison so formatting differences alone never trigger a diff, and the
/// derived `net_block` column is never compared (the caller recomputes it
/// whenever cost or accumulated depreciation changes).
pub fn reconcile(
    previous: &Snapshot,
    candidate: &Snapshot,
    actor: &Actor,
) -> Result<ReconcileResult, CoreError> {
    let mut result = ReconcileResult::default();

    // Field-level updates for rows present in both tables, in candidate row
    // order.
    for asset_id in candidate.ids() {
        let Some(old_row) = previous.get(asset_id) else {
            continue;
        };
        let new_row = candidate
            .get(asset_id)
            .ok_or_else(|| CoreError::Internal(format!("candidate lost row '{asset_id}'")))?;

        for &field in asset::FIELDS {
            let old_value = field_value(old_row, field, asset_id, &mut result.warnings);
            let new_value = field_value(new_row, field, asset_id, &mut result.warnings);
            if old_value == new_value {
                continue;
            }

            result.audit.push(AuditRecord {
                asset_id: asset_id.to_string(),
                action: AuditAction::Update,
                field: Some(field.to_string()),
                old_value: Some(old_value.clone()),
                new_value: Some(new_value.clone()),
                changed_by: actor.id.clone(),
                user_role: actor.role,
                details: audit::update_detail(field, &old_value, &new_value),
            });
            result.updates.push(FieldUpdate {
                asset_id: asset_id.to_string(),
                field: field.to_string(),
                old_value,
                new_value,
            });
        }
    }

    // Whole-row inserts for rows only in the candidate.
    for asset_id in candidate.ids() {
        if previous.contains(asset_id) {
            continue;
        }
        let row = candidate
            .get(asset_id)
            .ok_or_else(|| CoreError::Internal(format!("candidate lost row '{asset_id}'")))?;

        let mut fields = Vec::with_capacity(asset::FIELDS.len());
        for &field in asset::FIELDS {
            let value = field_value(row, field, asset_id, &mut result.warnings);
            result.audit.push(AuditRecord {
                asset_id: asset_id.to_string(),
                action: AuditAction::Insert,
                field: Some(field.to_string()),
                old_value: None,
                new_value: Some(value.clone()),
                changed_by: actor.id.clone(),
                user_role: actor.role,
                details: audit::insert_detail(field, &value),
            });
            fields.push((field.to_string(), value));
        }
        result.inserts.push(RowInsert {
            asset_id: asset_id.to_string(),
            fields,
        });
    }

    // Whole-row deletes for rows only in the previous snapshot, in previous
    // row order.
    for asset_id in previous.ids() {
        if candidate.contains(asset_id) {
            continue;
        }
        result.audit.push(AuditRecord {
            asset_id: asset_id.to_string(),
            action: AuditAction::Delete,
            field: None,
            old_value: None,
            new_value: None,
            changed_by: actor.id.clone(),
            user_role: actor.role,
            details: audit::delete_detail(asset_id),
        });
        result.deletes.push(RowDelete {
            asset_id: asset_id.to_string(),
        });
    }

    Ok(result)
}

/// Look up one field on a row, normalizing numeric columns.
///
/// Missing fields read as empty strings; a coerced numeric value is recorded
/// as a warning (deduplicated per asset/field).
fn field_value(
    row: &FieldMap,
    field: &str,
    asset_id: &str,
    warnings: &mut Vec<CoercionWarning>,
) -> String {
    let raw = row.get(field).map(String::as_str).unwrap_or("");
    if !asset::is_numeric_field(field) {
        return raw.to_string();
    }

    // An absent or blank cell is not a data-entry error; it reads as zero
    // without a warning.
    if raw.trim().is_empty() {
        return "0".to_string();
    }

    let normalized = numeric::normalize(raw);
    if normalized.coerced
        && !warnings
            .iter()
            .any(|w| w.asset_id == asset_id && w.field == field && w.raw == raw)
    {
        warnings.push(CoercionWarning {
            asset_id: asset_id.to_string(),
            field: field.to_string(),
            raw: raw.to_string(),
        });
    }
    normalized.value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::FieldMap;

    fn actor() -> Actor {
        Actor {
            id: "alice".to_string(),
            role: Role::Admin,
        }
    }

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn snapshot(rows: &[(&str, &[(&str, &str)])]) -> Snapshot {
        Snapshot::from_rows(
            rows.iter()
                .map(|(id, pairs)| (id.to_string(), fields(pairs))),
        )
        .unwrap()
    }

    #[test]
    fn identical_tables_reconcile_empty() {
        let table = snapshot(&[
            ("A1", &[("name", "Printer"), ("cost", "100")]),
            ("A2", &[("name", "Desk"), ("cost", "50")]),
        ]);
        let result = reconcile(&table, &table, &actor()).unwrap();
        assert!(result.is_empty());
        assert!(result.audit.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn update_insert_delete_partition_by_key_sets() {
        let previous = snapshot(&[
            ("A1", &[("cost", "100"), ("status", "active")]),
            ("A3", &[("cost", "30")]),
        ]);
        let candidate = snapshot(&[
            ("A1", &[("cost", "150"), ("status", "active")]),
            ("A2", &[("cost", "50"), ("status", "new")]),
        ]);

        let result = reconcile(&previous, &candidate, &actor()).unwrap();

        assert_eq!(result.updates.len(), 1);
        assert_eq!(
            result.updates[0],
            FieldUpdate {
                asset_id: "A1".to_string(),
                field: "cost".to_string(),
                old_value: "100".to_string(),
                new_value: "150".to_string(),
            }
        );

        assert_eq!(result.inserts.len(), 1);
        assert_eq!(result.inserts[0].asset_id, "A2");

        assert_eq!(result.deletes.len(), 1);
        assert_eq!(result.deletes[0].asset_id, "A3");
    }

    #[test]
    fn formatting_only_numeric_changes_produce_no_diff() {
        let previous = snapshot(&[("A1", &[("cost", "100")])]);
        let candidate = snapshot(&[("A1", &[("cost", "100.0")])]);
        let result = reconcile(&previous, &candidate, &actor()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn real_numeric_changes_diff_with_normalized_values() {
        let previous = snapshot(&[("A1", &[("cost", "10")])]);
        let candidate = snapshot(&[("A1", &[("cost", "10.5")])]);
        let result = reconcile(&previous, &candidate, &actor()).unwrap();
        assert_eq!(result.updates.len(), 1);
        assert_eq!(result.updates[0].old_value, "10");
        assert_eq!(result.updates[0].new_value, "10.5");
    }

    #[test]
    fn net_block_is_never_diffed() {
        let previous = snapshot(&[("A1", &[("cost", "100"), ("net_block", "80")])]);
        let candidate = snapshot(&[("A1", &[("cost", "150"), ("net_block", "999")])]);
        let result = reconcile(&previous, &candidate, &actor()).unwrap();

        assert_eq!(result.updates.len(), 1);
        assert_eq!(result.updates[0].field, "cost");
        assert!(result.updates.iter().all(|u| u.field != "net_block"));
    }

    #[test]
    fn update_fields_follow_declared_column_order() {
        let previous = snapshot(&[(
            "A1",
            &[("status", "active"), ("name", "Printer"), ("cost", "100")],
        )]);
        let candidate = snapshot(&[(
            "A1",
            &[("status", "retired"), ("name", "Scanner"), ("cost", "200")],
        )]);
        let result = reconcile(&previous, &candidate, &actor()).unwrap();

        let changed: Vec<_> = result.updates.iter().map(|u| u.field.as_str()).collect();
        // Declared order: name before status before cost.
        assert_eq!(changed, vec!["name", "status", "cost"]);
    }

    #[test]
    fn updates_precede_inserts_precede_deletes_in_audit() {
        let previous = snapshot(&[("A1", &[("cost", "100")]), ("A3", &[("cost", "30")])]);
        let candidate = snapshot(&[("A1", &[("cost", "150")]), ("A2", &[("cost", "50")])]);
        let result = reconcile(&previous, &candidate, &actor()).unwrap();

        let actions: Vec<_> = result.audit.iter().map(|r| r.action).collect();
        let first_insert = actions
            .iter()
            .position(|a| *a == AuditAction::Insert)
            .unwrap();
        let first_delete = actions
            .iter()
            .position(|a| *a == AuditAction::Delete)
            .unwrap();
        assert!(actions[0] == AuditAction::Update);
        assert!(first_insert < first_delete);
    }

    #[test]
    fn insert_emits_one_synthetic_detail_per_field() {
        let previous = snapshot(&[]);
        let candidate = snapshot(&[("A2", &[("cost", "50"), ("status", "new")])]);
        let result = reconcile(&previous, &candidate, &actor()).unwrap();

        let insert_records: Vec<_> = result
            .audit
            .iter()
            .filter(|r| r.action == AuditAction::Insert)
            .collect();
        assert_eq!(insert_records.len(), asset::FIELDS.len());

        let cost_record = insert_records
            .iter()
            .find(|r| r.field.as_deref() == Some("cost"))
            .unwrap();
        assert_eq!(cost_record.details, "cost = 50");
        assert_eq!(cost_record.new_value.as_deref(), Some("50"));
        assert_eq!(cost_record.old_value, None);
    }

    #[test]
    fn delete_emits_single_whole_row_entry() {
        let previous = snapshot(&[("A1", &[("cost", "1")]), ("A2", &[("cost", "2")])]);
        let candidate = snapshot(&[("A1", &[("cost", "1")])]);
        let result = reconcile(&previous, &candidate, &actor()).unwrap();

        assert_eq!(result.deletes.len(), 1);
        let delete_records: Vec<_> = result
            .audit
            .iter()
            .filter(|r| r.action == AuditAction::Delete)
            .collect();
        assert_eq!(delete_records.len(), 1);
        assert_eq!(delete_records[0].asset_id, "A2");
        assert_eq!(delete_records[0].field, None);
    }

    #[test]
    fn unparsable_numeric_degrades_to_zero_with_warning() {
        let previous = snapshot(&[("A1", &[("cost", "100")])]);
        let candidate = snapshot(&[("A1", &[("cost", "garbage")])]);
        let result = reconcile(&previous, &candidate, &actor()).unwrap();

        // The bad value normalizes to zero and still produces a diff entry,
        // never an abort.
        assert_eq!(result.updates.len(), 1);
        assert_eq!(result.updates[0].new_value, "0");

        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].asset_id, "A1");
        assert_eq!(result.warnings[0].field, "cost");
        assert_eq!(result.warnings[0].raw, "garbage");
    }

    #[test]
    fn audit_records_carry_actor_identity() {
        let previous = snapshot(&[("A1", &[("cost", "100")])]);
        let candidate = snapshot(&[("A1", &[("cost", "200")])]);
        let result = reconcile(&previous, &candidate, &actor()).unwrap();

        assert_eq!(result.audit.len(), 1);
        assert_eq!(result.audit[0].changed_by, "alice");
        assert_eq!(result.audit[0].user_role, Role::Admin);
    }

    #[test]
    fn insert_rows_follow_candidate_order() {
        let previous = snapshot(&[]);
        let candidate = snapshot(&[("B2", &[]), ("B1", &[])]);
        let result = reconcile(&previous, &candidate, &actor()).unwrap();
        let ids: Vec<_> = result.inserts.iter().map(|i| i.asset_id.as_str()).collect();
        assert_eq!(ids, vec!["B2", "B1"]);
    }
}

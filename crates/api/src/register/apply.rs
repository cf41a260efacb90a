//! Applies a [`ReconcileResult`] to the row store.
//!
//! Each change's row mutation and its audit entry run in one database
//! transaction so the pair commits or fails together -- "saved" is never
//! reported when only one side succeeded. A failure applying one change does
//! not abort the rest: failures are collected per change and reported
//! distinctly.
//!
//! After a committed insert, the QR artifact for the new asset_id is
//! generated unless one already exists; after a committed delete, the
//! artifact is discarded.

use std::future::Future;

use serde::Serialize;
use sqlx::PgPool;

use far_core::asset;
use far_core::audit::{canonical_entry_data, compute_integrity_hash, AuditRecord};
use far_core::qr::{artifact_on_insert, payload_url, ArtifactAction, QrEncoder};
use far_core::reconcile::{CoercionWarning, ReconcileResult};
use far_db::models::audit::CreateAuditEntry;
use far_db::repositories::{AssetRepo, AuditRepo, QrArtifactRepo};

/// Storage seam for QR artifacts: the Postgres repository in production, an
/// in-memory store in tests.
pub(crate) trait ArtifactStore: Sync {
    fn exists(&self, asset_id: &str) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
    fn put(
        &self,
        asset_id: &str,
        png: &[u8],
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
    fn remove(&self, asset_id: &str) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
}

struct PgArtifacts<'a>(&'a PgPool);

impl ArtifactStore for PgArtifacts<'_> {
    async fn exists(&self, asset_id: &str) -> Result<bool, sqlx::Error> {
        QrArtifactRepo::exists(self.0, asset_id).await
    }

    async fn put(&self, asset_id: &str, png: &[u8]) -> Result<(), sqlx::Error> {
        QrArtifactRepo::upsert(self.0, asset_id, png).await
    }

    async fn remove(&self, asset_id: &str) -> Result<(), sqlx::Error> {
        QrArtifactRepo::delete(self.0, asset_id).await
    }
}

/// One change that could not be applied.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyFailure {
    pub asset_id: String,
    /// `None` for whole-row changes and artifact generation.
    pub field: Option<String>,
    pub message: String,
}

/// Outcome of applying one reconciliation result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    pub updates_applied: usize,
    pub inserts_applied: usize,
    pub deletes_applied: usize,
    /// Asset ids whose QR artifact was generated during this apply.
    pub qr_generated: Vec<String>,
    pub failures: Vec<ApplyFailure>,
    /// Numeric values that were coerced to zero during reconciliation.
    pub warnings: Vec<CoercionWarning>,
}

/// Apply every change in `result`, collecting per-change failures.
pub async fn apply_changes(
    pool: &PgPool,
    encoder: &dyn QrEncoder,
    qr_base_url: &str,
    result: &ReconcileResult,
) -> ApplyReport {
    let mut report = ApplyReport {
        warnings: result.warnings.clone(),
        ..ApplyReport::default()
    };
    let artifacts = PgArtifacts(pool);

    // Audit records preserve the reconciler's emission order, so they pair
    // positionally with updates and deletes, and group by asset_id for
    // inserts.
    let update_records: Vec<&AuditRecord> = result
        .audit
        .iter()
        .filter(|r| r.action == far_core::audit::AuditAction::Update)
        .collect();

    for (update, record) in result.updates.iter().zip(update_records) {
        let outcome = apply_update(pool, update, record).await;
        match outcome {
            Ok(()) => report.updates_applied += 1,
            Err(e) => {
                tracing::warn!(
                    asset_id = %update.asset_id,
                    field = %update.field,
                    error = %e,
                    "Failed to apply field update",
                );
                report.failures.push(ApplyFailure {
                    asset_id: update.asset_id.clone(),
                    field: Some(update.field.clone()),
                    message: e.to_string(),
                });
            }
        }
    }

    for insert in &result.inserts {
        let records: Vec<&AuditRecord> = result
            .audit
            .iter()
            .filter(|r| {
                r.action == far_core::audit::AuditAction::Insert && r.asset_id == insert.asset_id
            })
            .collect();

        match apply_insert(pool, &insert.asset_id, &insert.fields, &records).await {
            Ok(()) => {
                report.inserts_applied += 1;
                generate_artifact(&artifacts, encoder, qr_base_url, &insert.asset_id, &mut report)
                    .await;
            }
            Err(e) => {
                tracing::warn!(asset_id = %insert.asset_id, error = %e, "Failed to apply insert");
                report.failures.push(ApplyFailure {
                    asset_id: insert.asset_id.clone(),
                    field: None,
                    message: e.to_string(),
                });
            }
        }
    }

    let delete_records: Vec<&AuditRecord> = result
        .audit
        .iter()
        .filter(|r| r.action == far_core::audit::AuditAction::Delete)
        .collect();

    for (delete, record) in result.deletes.iter().zip(delete_records) {
        match apply_delete(pool, &delete.asset_id, record).await {
            Ok(()) => {
                report.deletes_applied += 1;
                discard_artifact(&artifacts, &delete.asset_id, &mut report).await;
            }
            Err(e) => {
                tracing::warn!(asset_id = %delete.asset_id, error = %e, "Failed to apply delete");
                report.failures.push(ApplyFailure {
                    asset_id: delete.asset_id.clone(),
                    field: None,
                    message: e.to_string(),
                });
            }
        }
    }

    report
}

/// One field update + audit entry, in one transaction.
async fn apply_update(
    pool: &PgPool,
    update: &far_core::reconcile::FieldUpdate,
    record: &AuditRecord,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    AssetRepo::update_field(&mut tx, &update.asset_id, &update.field, &update.new_value).await?;
    if asset::affects_net_block(&update.field) {
        AssetRepo::recompute_net_block(&mut tx, &update.asset_id).await?;
    }
    append_audit(&mut tx, record).await?;
    tx.commit().await
}

/// Whole-row insert + one audit entry per field, in one transaction.
async fn apply_insert(
    pool: &PgPool,
    asset_id: &str,
    fields: &[(String, String)],
    records: &[&AuditRecord],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    AssetRepo::insert_row(&mut tx, asset_id, fields).await?;
    for record in records {
        append_audit(&mut tx, record).await?;
    }
    tx.commit().await
}

/// Whole-row delete + single audit entry, in one transaction.
async fn apply_delete(
    pool: &PgPool,
    asset_id: &str,
    record: &AuditRecord,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    AssetRepo::delete(&mut tx, asset_id).await?;
    append_audit(&mut tx, record).await?;
    tx.commit().await
}

/// Append one audit entry, chaining its integrity hash off the previous
/// entry inside the same transaction.
async fn append_audit(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    record: &AuditRecord,
) -> Result<(), sqlx::Error> {
    let prev_hash = AuditRepo::find_last_hash_in_tx(tx).await?;
    let hash = compute_integrity_hash(prev_hash.as_deref(), &canonical_entry_data(record));

    let entry = CreateAuditEntry {
        asset_id: record.asset_id.clone(),
        action: record.action.as_str().to_string(),
        field: record.field.clone(),
        old_value: record.old_value.clone(),
        new_value: record.new_value.clone(),
        changed_by: record.changed_by.clone(),
        user_role: record.user_role.as_str().to_string(),
        details: record.details.clone(),
        integrity_hash: Some(hash),
    };
    AuditRepo::insert_in_tx(tx, &entry).await?;
    Ok(())
}

/// Generate the QR artifact for a newly inserted asset, skipping
/// regeneration when one already exists.
async fn generate_artifact<S: ArtifactStore>(
    store: &S,
    encoder: &dyn QrEncoder,
    qr_base_url: &str,
    asset_id: &str,
    report: &mut ApplyReport,
) {
    let exists = match store.exists(asset_id).await {
        Ok(exists) => exists,
        Err(e) => {
            report.failures.push(ApplyFailure {
                asset_id: asset_id.to_string(),
                field: None,
                message: format!("QR artifact lookup failed: {e}"),
            });
            return;
        }
    };
    if artifact_on_insert(exists) == ArtifactAction::Keep {
        return;
    }

    let url = payload_url(qr_base_url, asset_id);
    let png = match encoder.encode(&url) {
        Ok(png) => png,
        Err(e) => {
            report.failures.push(ApplyFailure {
                asset_id: asset_id.to_string(),
                field: None,
                message: format!("QR artifact generation failed: {e}"),
            });
            return;
        }
    };

    match store.put(asset_id, &png).await {
        Ok(()) => report.qr_generated.push(asset_id.to_string()),
        Err(e) => report.failures.push(ApplyFailure {
            asset_id: asset_id.to_string(),
            field: None,
            message: format!("QR artifact store failed: {e}"),
        }),
    }
}

/// Discard the artifact for a deleted asset. A store failure here surfaces
/// in the report like any other per-change failure.
async fn discard_artifact<S: ArtifactStore>(
    store: &S,
    asset_id: &str,
    report: &mut ApplyReport,
) {
    if let Err(e) = store.remove(asset_id).await {
        tracing::warn!(asset_id = %asset_id, error = %e, "Failed to discard QR artifact");
        report.failures.push(ApplyFailure {
            asset_id: asset_id.to_string(),
            field: None,
            message: format!("QR artifact discard failed: {e}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use far_core::error::CoreError;

    #[derive(Default)]
    struct MemoryArtifacts {
        stored: Mutex<HashSet<String>>,
        puts: Mutex<usize>,
        fail_remove: bool,
    }

    impl ArtifactStore for MemoryArtifacts {
        async fn exists(&self, asset_id: &str) -> Result<bool, sqlx::Error> {
            Ok(self.stored.lock().unwrap().contains(asset_id))
        }

        async fn put(&self, asset_id: &str, _png: &[u8]) -> Result<(), sqlx::Error> {
            *self.puts.lock().unwrap() += 1;
            self.stored.lock().unwrap().insert(asset_id.to_string());
            Ok(())
        }

        async fn remove(&self, asset_id: &str) -> Result<(), sqlx::Error> {
            if self.fail_remove {
                return Err(sqlx::Error::PoolClosed);
            }
            self.stored.lock().unwrap().remove(asset_id);
            Ok(())
        }
    }

    struct FixedEncoder;

    impl QrEncoder for FixedEncoder {
        fn encode(&self, _url: &str) -> Result<Vec<u8>, CoreError> {
            Ok(vec![0x89, b'P', b'N', b'G'])
        }
    }

    const BASE: &str = "http://localhost:3000/assets";

    #[tokio::test]
    async fn insert_generates_exactly_one_artifact() {
        let store = MemoryArtifacts::default();

        let mut report = ApplyReport::default();
        generate_artifact(&store, &FixedEncoder, BASE, "A1", &mut report).await;
        assert_eq!(report.qr_generated, vec!["A1".to_string()]);
        assert!(report.failures.is_empty());
        assert_eq!(*store.puts.lock().unwrap(), 1);

        // Applying the same insert a second time regenerates nothing.
        let mut report = ApplyReport::default();
        generate_artifact(&store, &FixedEncoder, BASE, "A1", &mut report).await;
        assert!(report.qr_generated.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(*store.puts.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_artifact_discard_surfaces_in_report() {
        let store = MemoryArtifacts {
            fail_remove: true,
            ..MemoryArtifacts::default()
        };

        let mut report = ApplyReport::default();
        discard_artifact(&store, "A2", &mut report).await;

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].asset_id, "A2");
        assert_eq!(report.failures[0].field, None);
    }
}

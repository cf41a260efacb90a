//! Repository for the `audit_log` table.
//!
//! Inserts run inside the same transaction as the row mutation they describe,
//! so the pair commits or fails together.

use sqlx::{PgPool, Postgres, Transaction};

use far_core::types::Timestamp;

use crate::models::audit::{AuditEntry, AuditQuery, CreateAuditEntry};

/// Column list for `audit_log` SELECT queries.
const COLUMNS: &str = "\
    id, asset_id, action, field, old_value, new_value, \
    changed_by, user_role, details, integrity_hash, timestamp";

/// Column list for INSERT (excludes auto-generated `id` and `timestamp`).
const INSERT_COLUMNS: &str = "\
    asset_id, action, field, old_value, new_value, \
    changed_by, user_role, details, integrity_hash";

/// Provides insert and query operations for the audit trail.
pub struct AuditRepo;

impl AuditRepo {
    /// Insert one audit entry inside an open transaction.
    pub async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        entry: &CreateAuditEntry,
    ) -> Result<AuditEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_log ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(&entry.asset_id)
            .bind(&entry.action)
            .bind(&entry.field)
            .bind(&entry.old_value)
            .bind(&entry.new_value)
            .bind(&entry.changed_by)
            .bind(&entry.user_role)
            .bind(&entry.details)
            .bind(&entry.integrity_hash)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find the integrity hash of the most recent entry, for chaining.
    ///
    /// Runs inside the insert's transaction so concurrent appenders cannot
    /// chain off the same predecessor.
    pub async fn find_last_hash_in_tx(
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<String>>(
            "SELECT integrity_hash FROM audit_log ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&mut **tx)
        .await
        .map(|opt| opt.flatten())
    }

    /// Query the audit trail newest-first with filtering and pagination.
    pub async fn query(
        pool: &PgPool,
        params: &AuditQuery,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        let (limit, offset) = page_bounds(params.limit, params.offset);

        let (where_clause, bind_values, bind_idx) = build_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM audit_log {where_clause} \
             ORDER BY timestamp DESC, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_values
            .iter()
            .fold(sqlx::query_as::<_, AuditEntry>(&query), |q, v| match v {
                BindValue::Text(s) => q.bind(s.as_str()),
                BindValue::Timestamp(t) => q.bind(*t),
            });
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count entries matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &AuditQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_filter(params);
        let query = format!("SELECT COUNT(*)::BIGINT FROM audit_log {where_clause}");

        let q = bind_values
            .iter()
            .fold(sqlx::query_scalar::<_, i64>(&query), |q, v| match v {
                BindValue::Text(s) => q.bind(s.as_str()),
                BindValue::Timestamp(t) => q.bind(*t),
            });
        q.fetch_one(pool).await
    }

    /// Export entries within a time range, oldest first.
    pub async fn export_range(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_log \
             WHERE timestamp >= $1 AND timestamp <= $2 \
             ORDER BY timestamp ASC, id ASC"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Fetch all entries ordered by id for sequential hash-chain checking.
    pub async fn fetch_for_integrity_check(
        pool: &PgPool,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM audit_log ORDER BY id ASC");
        sqlx::query_as::<_, AuditEntry>(&query).fetch_all(pool).await
    }
}

/// Clamp requested pagination to what Postgres accepts: LIMIT in 0..=500,
/// OFFSET never negative.
fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(50).clamp(0, 500);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

/// Typed bind value for dynamically-built audit queries.
enum BindValue {
    Text(String),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from the filter parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
fn build_filter(params: &AuditQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(ref asset_id) = params.asset_id {
        conditions.push(format!("asset_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(asset_id.clone()));
    }

    if let Some(ref action) = params.action {
        conditions.push(format!("action = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(action.clone()));
    }

    if let Some(from) = params.from {
        conditions.push(format!("timestamp >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = params.to {
        conditions.push(format!("timestamp <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_default_to_first_page() {
        assert_eq!(page_bounds(None, None), (50, 0));
    }

    #[test]
    fn page_bounds_cap_the_limit() {
        assert_eq!(page_bounds(Some(10_000), None), (500, 0));
    }

    #[test]
    fn negative_pagination_clamps_to_zero() {
        assert_eq!(page_bounds(Some(-5), Some(-20)), (0, 0));
    }
}

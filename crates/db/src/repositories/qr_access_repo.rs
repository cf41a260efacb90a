//! Repository for the `qr_access_log` table (one grant timestamp per asset).

use sqlx::PgPool;

use far_core::types::Timestamp;

/// Provides grant-window bookkeeping for the passcode gate.
pub struct QrAccessRepo;

impl QrAccessRepo {
    /// When access to this asset was last granted, if ever.
    pub async fn last_granted_at(
        pool: &PgPool,
        asset_id: &str,
    ) -> Result<Option<Timestamp>, sqlx::Error> {
        sqlx::query_scalar::<_, Timestamp>(
            "SELECT last_granted_at FROM qr_access_log WHERE asset_id = $1",
        )
        .bind(asset_id)
        .fetch_optional(pool)
        .await
    }

    /// Record a fresh grant for this asset.
    pub async fn record_grant(
        pool: &PgPool,
        asset_id: &str,
        granted_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO qr_access_log (asset_id, last_granted_at) VALUES ($1, $2) \
             ON CONFLICT (asset_id) DO UPDATE SET last_granted_at = $2",
        )
        .bind(asset_id)
        .bind(granted_at)
        .execute(pool)
        .await?;
        Ok(())
    }
}

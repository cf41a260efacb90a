//! Repository for the `qr_artifacts` table.
//!
//! Artifacts are derived state: insert skips regeneration when one already
//! exists, and delete is a no-op when none does.

use sqlx::PgPool;

use crate::models::qr::QrArtifact;

/// Provides storage for generated QR PNGs.
pub struct QrArtifactRepo;

impl QrArtifactRepo {
    /// True when an artifact already exists for this asset.
    pub async fn exists(pool: &PgPool, asset_id: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)::BIGINT FROM qr_artifacts WHERE asset_id = $1",
        )
        .bind(asset_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    /// Fetch an artifact.
    pub async fn find(pool: &PgPool, asset_id: &str) -> Result<Option<QrArtifact>, sqlx::Error> {
        sqlx::query_as::<_, QrArtifact>(
            "SELECT asset_id, png, generated_at FROM qr_artifacts WHERE asset_id = $1",
        )
        .bind(asset_id)
        .fetch_optional(pool)
        .await
    }

    /// Store an artifact, replacing any previous bytes for the same asset.
    pub async fn upsert(pool: &PgPool, asset_id: &str, png: &[u8]) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO qr_artifacts (asset_id, png) VALUES ($1, $2) \
             ON CONFLICT (asset_id) DO UPDATE SET png = $2, generated_at = now()",
        )
        .bind(asset_id)
        .bind(png)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Discard the artifact for a deleted asset. Missing rows are fine.
    pub async fn delete(pool: &PgPool, asset_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM qr_artifacts WHERE asset_id = $1")
            .bind(asset_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

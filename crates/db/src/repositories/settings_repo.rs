//! Repository for the key/value `settings` table.

use sqlx::PgPool;

/// Setting key holding the QR viewer passcode.
pub const QR_VIEWER_PASSCODE: &str = "qr_viewer_passcode";

/// Provides get/set over the settings table.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Read a setting value, or `None` if the key is absent.
    pub async fn get(pool: &PgPool, key: &str) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Upsert a setting value.
    pub async fn set(pool: &PgPool, key: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = now()",
        )
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;
        Ok(())
    }
}

//! QR artifact and access-grant models.

use far_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// Derived PNG artifact for one asset's QR deep link. Regenerable at any
/// time from the asset_id alone.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QrArtifact {
    pub asset_id: String,
    #[serde(skip_serializing)]
    pub png: Vec<u8>,
    pub generated_at: Timestamp,
}

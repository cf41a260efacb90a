//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` (or an open transaction, where a row mutation and its
//! audit entry must commit together) as the first argument.

pub mod asset_repo;
pub mod audit_repo;
pub mod qr_access_repo;
pub mod qr_artifact_repo;
pub mod settings_repo;
pub mod user_repo;

pub use asset_repo::AssetRepo;
pub use audit_repo::AuditRepo;
pub use qr_access_repo::QrAccessRepo;
pub use qr_artifact_repo::QrArtifactRepo;
pub use settings_repo::{SettingsRepo, QR_VIEWER_PASSCODE};
pub use user_repo::UserRepo;

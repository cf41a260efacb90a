//! User roles and their capability sets.
//!
//! Access decisions are capability checks (`can_edit`, `can_view_audit`,
//! `can_view_qr`) rather than per-screen role comparisons. Legacy role names
//! from older deployments normalize into the three canonical roles on parse.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Canonical user roles.
///
/// - `Admin`       -- full access, including register edits.
/// - `Auditor`     -- read access to the register and the audit trail.
/// - `AssetViewer` -- read access to single assets via QR deep links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Auditor,
    AssetViewer,
}

impl Role {
    /// String representation for display, JWT claims, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Auditor => "auditor",
            Self::AssetViewer => "asset_viewer",
        }
    }

    /// Parse a role name, accepting legacy variants.
    ///
    /// Older deployments used `Developer`/`Client` for editing roles and
    /// `QR Viewer` for the passcode-gated viewer; those map onto the
    /// canonical roles here.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "admin" | "developer" | "client" => Ok(Self::Admin),
            "auditor" => Ok(Self::Auditor),
            "asset_viewer" | "qr_viewer" | "viewer" => Ok(Self::AssetViewer),
            other => Err(CoreError::Validation(format!("Unknown role '{other}'"))),
        }
    }

    /// May submit register edits (insert/update/delete asset rows).
    pub fn can_edit(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// May read the audit trail.
    pub fn can_view_audit(&self) -> bool {
        matches!(self, Self::Admin | Self::Auditor)
    }

    /// May fetch QR artifacts and follow QR deep links.
    pub fn can_view_qr(&self) -> bool {
        true
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_parse() {
        assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
        assert_eq!(Role::parse("auditor").unwrap(), Role::Auditor);
        assert_eq!(Role::parse("asset_viewer").unwrap(), Role::AssetViewer);
    }

    #[test]
    fn legacy_names_normalize() {
        assert_eq!(Role::parse("Developer").unwrap(), Role::Admin);
        assert_eq!(Role::parse("Client").unwrap(), Role::Admin);
        assert_eq!(Role::parse("QR Viewer").unwrap(), Role::AssetViewer);
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(Role::parse("superuser").is_err());
    }

    #[test]
    fn capability_sets() {
        assert!(Role::Admin.can_edit());
        assert!(!Role::Auditor.can_edit());
        assert!(!Role::AssetViewer.can_edit());

        assert!(Role::Admin.can_view_audit());
        assert!(Role::Auditor.can_view_audit());
        assert!(!Role::AssetViewer.can_view_audit());

        assert!(Role::AssetViewer.can_view_qr());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", Role::Auditor), "auditor");
    }
}

//! QR artifact payload and the encoder seam.
//!
//! A QR artifact is derived state: PNG bytes encoding a deep-link URL that
//! carries the asset_id as a query parameter. It is regenerable at any time
//! from the asset_id alone, so nothing here is authoritative.

use crate::error::CoreError;

/// Build the payload URL embedded in an asset's QR code:
/// `<base_url>?asset_id=<id>`.
///
/// The asset_id is percent-encoded conservatively (only unreserved characters
/// pass through) so ids with spaces or separators survive the round trip.
pub fn payload_url(base_url: &str, asset_id: &str) -> String {
    let base = base_url.trim_end_matches(['?', '&']);
    format!("{base}?asset_id={}", percent_encode(asset_id))
}

/// Encodes a payload URL into PNG bytes. Implemented in the api crate; kept
/// as a trait here so the reconcile/apply flow stays free of image concerns.
pub trait QrEncoder: Send + Sync {
    fn encode(&self, url: &str) -> Result<Vec<u8>, CoreError>;
}

/// Artifact lifecycle decision for an applied row insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactAction {
    /// Encode and store a new artifact.
    Generate,
    /// Leave the existing artifact untouched.
    Keep,
}

/// Decide artifact generation for a newly inserted asset.
///
/// Generation is idempotent per asset_id: applying the same insert twice
/// produces exactly one artifact, never a regeneration.
pub fn artifact_on_insert(artifact_exists: bool) -> ArtifactAction {
    if artifact_exists {
        ArtifactAction::Keep
    } else {
        ArtifactAction::Generate
    }
}

fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_carries_asset_id_query_parameter() {
        assert_eq!(
            payload_url("https://far.example.com/assets", "A1"),
            "https://far.example.com/assets?asset_id=A1"
        );
    }

    #[test]
    fn trailing_separator_on_base_is_tolerated() {
        assert_eq!(
            payload_url("https://far.example.com/assets?", "A1"),
            "https://far.example.com/assets?asset_id=A1"
        );
    }

    #[test]
    fn asset_id_is_percent_encoded() {
        assert_eq!(
            payload_url("https://far.example.com/a", "FA 01/B"),
            "https://far.example.com/a?asset_id=FA%2001%2FB"
        );
    }

    #[test]
    fn insert_without_artifact_generates() {
        assert_eq!(artifact_on_insert(false), ArtifactAction::Generate);
    }

    #[test]
    fn reapplied_insert_keeps_existing_artifact() {
        assert_eq!(artifact_on_insert(true), ArtifactAction::Keep);
    }
}

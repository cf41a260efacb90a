//! Passcode gate for QR deep links.
//!
//! A successful passcode entry grants access to one asset for a fixed window
//! (one hour by default). Within the window the caller is not re-prompted;
//! after it expires the passcode must be entered again. Reading the secret
//! and recording the grant timestamp are the caller's responsibility.

use chrono::Duration;

use crate::types::Timestamp;

/// Default grant window: one hour from the last successful entry.
pub const DEFAULT_GRANT_WINDOW_MINS: i64 = 60;

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access granted. `record_grant` is true when the caller should record a
    /// fresh grant timestamp (i.e. the passcode was entered, not a window
    /// carry-over).
    Granted { record_grant: bool },
    Denied,
}

/// Decide access for one asset.
///
/// A prior grant within `window` is honored without checking the entered
/// value; otherwise the entered value must match the secret exactly.
pub fn check_access(
    secret: &str,
    entered: &str,
    last_granted_at: Option<Timestamp>,
    now: Timestamp,
    window: Duration,
) -> AccessDecision {
    if let Some(granted_at) = last_granted_at {
        if now - granted_at < window && now >= granted_at {
            return AccessDecision::Granted {
                record_grant: false,
            };
        }
    }

    if !secret.is_empty() && entered == secret {
        AccessDecision::Granted { record_grant: true }
    } else {
        AccessDecision::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn correct_passcode_grants_and_records() {
        let now = Utc::now();
        let decision = check_access("s3cret", "s3cret", None, now, Duration::minutes(60));
        assert_eq!(decision, AccessDecision::Granted { record_grant: true });
    }

    #[test]
    fn wrong_passcode_denies() {
        let now = Utc::now();
        let decision = check_access("s3cret", "wrong", None, now, Duration::minutes(60));
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn grant_within_window_skips_reentry() {
        let now = Utc::now();
        let granted_at = now - Duration::minutes(30);
        let decision = check_access(
            "s3cret",
            "",
            Some(granted_at),
            now,
            Duration::minutes(60),
        );
        assert_eq!(
            decision,
            AccessDecision::Granted {
                record_grant: false
            }
        );
    }

    #[test]
    fn expired_grant_requires_reentry() {
        let now = Utc::now();
        let granted_at = now - Duration::minutes(90);
        let decision = check_access(
            "s3cret",
            "",
            Some(granted_at),
            now,
            Duration::minutes(60),
        );
        assert_eq!(decision, AccessDecision::Denied);

        // Re-entering the passcode after expiry grants again.
        let decision = check_access(
            "s3cret",
            "s3cret",
            Some(granted_at),
            now,
            Duration::minutes(60),
        );
        assert_eq!(decision, AccessDecision::Granted { record_grant: true });
    }

    #[test]
    fn empty_secret_never_grants() {
        let now = Utc::now();
        let decision = check_access("", "", None, now, Duration::minutes(60));
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn future_grant_timestamp_is_ignored() {
        // A clock skew putting the grant in the future must not grant.
        let now = Utc::now();
        let granted_at = now + Duration::minutes(5);
        let decision = check_access("s3cret", "", Some(granted_at), now, Duration::minutes(60));
        assert_eq!(decision, AccessDecision::Denied);
    }
}

//! First-run admin provisioning.
//!
//! A fresh database has an empty `users` table, which would leave every
//! authenticated route unreachable. On startup, when no users exist, one
//! admin account is created from `ADMIN_USERNAME` / `ADMIN_PASSWORD` (with
//! development defaults, mirroring the seeded viewer passcode). The default
//! password is flagged loudly so it gets changed before real use.

use far_core::roles::Role;
use far_db::models::user::CreateUser;
use far_db::repositories::UserRepo;
use far_db::DbPool;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// Development default credentials, matching the seeded `qr_viewer_passcode`
/// convention.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "changeme";

/// Credentials for the first-run admin account.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl BootstrapAdmin {
    /// Load bootstrap credentials from environment variables.
    ///
    /// | Env Var          | Default    |
    /// |------------------|------------|
    /// | `ADMIN_USERNAME` | `admin`    |
    /// | `ADMIN_PASSWORD` | `changeme` |
    pub fn from_env() -> Self {
        Self {
            username: std::env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.into()),
            password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.into()),
        }
    }

    /// True when the account would be created with the development default
    /// password.
    pub fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_ADMIN_PASSWORD
    }
}

/// Create the bootstrap admin when the users table is empty.
///
/// Returns the created username, or `None` when users already exist and
/// nothing was done.
pub async fn ensure_admin_user(
    pool: &DbPool,
    creds: &BootstrapAdmin,
) -> AppResult<Option<String>> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(None);
    }

    let password_hash = hash_password(&creds.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: creds.username.clone(),
            password_hash,
            role: Role::Admin.as_str().to_string(),
        },
    )
    .await?;

    if creds.uses_default_password() {
        tracing::warn!(
            username = %user.username,
            "Created bootstrap admin with the default password; change it before real use",
        );
    } else {
        tracing::info!(username = %user.username, "Created bootstrap admin user");
    }

    Ok(Some(user.username))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;

    #[test]
    fn default_credentials_hash_and_verify() {
        let creds = BootstrapAdmin {
            username: DEFAULT_ADMIN_USERNAME.into(),
            password: DEFAULT_ADMIN_PASSWORD.into(),
        };
        assert!(creds.uses_default_password());

        let hash = hash_password(&creds.password).unwrap();
        assert!(verify_password(&creds.password, &hash).unwrap());
    }

    #[test]
    fn custom_password_is_not_flagged_as_default() {
        let creds = BootstrapAdmin {
            username: "ops".into(),
            password: "s0mething-else".into(),
        };
        assert!(!creds.uses_default_password());
    }

    #[test]
    fn bootstrap_role_can_edit_the_register() {
        let role = Role::parse(Role::Admin.as_str()).unwrap();
        assert!(role.can_edit());
        assert!(role.can_view_audit());
    }
}

//! Capability-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role lacks
//! the required capability. Role differences are capability checks on the
//! [`far_core::roles::Role`] enum, not per-route role comparisons.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use far_core::error::CoreError;
use far_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the edit capability (register inserts/updates/deletes).
///
/// ```ignore
/// async fn save(RequireEditor(user): RequireEditor) -> AppResult<Json<()>> {
///     // user.role.can_edit() is guaranteed here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireEditor(pub AuthUser);

impl FromRequestParts<AppState> for RequireEditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.can_edit() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Edit capability required".into(),
            )));
        }
        Ok(RequireEditor(user))
    }
}

/// Requires the audit-view capability.
pub struct RequireAuditView(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuditView {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.can_view_audit() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Audit view capability required".into(),
            )));
        }
        Ok(RequireAuditView(user))
    }
}

/// Requires the admin role (integrity verification, user management).
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for use in
/// route definitions where the intent "this route requires authentication"
/// should be self-documenting.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

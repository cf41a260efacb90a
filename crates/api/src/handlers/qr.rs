//! Handlers for QR artifacts and the public passcode gate.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use far_core::access::{check_access, AccessDecision};
use far_core::error::CoreError;
use far_core::qr::payload_url;
use far_db::models::asset::Asset;
use far_db::repositories::{
    AssetRepo, QrAccessRepo, QrArtifactRepo, SettingsRepo, QR_VIEWER_PASSCODE,
};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/register/{asset_id}/qr
///
/// Serve the stored QR PNG for an asset. Artifacts are derived state, so a
/// missing artifact for an existing asset is regenerated rather than 404'd.
pub async fn get_artifact(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(asset_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !user.role.can_view_qr() {
        return Err(AppError::Core(CoreError::Forbidden(
            "QR view capability required".into(),
        )));
    }

    let asset = AssetRepo::find_by_asset_id(&state.pool, &asset_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "asset",
            id: asset_id.clone(),
        }))?;

    let png = match QrArtifactRepo::find(&state.pool, &asset.asset_id).await? {
        Some(artifact) => artifact.png,
        None => {
            let url = payload_url(&state.config.qr_base_url, &asset.asset_id);
            let png = state
                .qr_encoder
                .encode(&url)
                .map_err(AppError::Core)?;
            QrArtifactRepo::upsert(&state.pool, &asset.asset_id, &png).await?;
            tracing::info!(asset_id = %asset.asset_id, "QR artifact regenerated on demand");
            png
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}.png\"", asset.asset_id),
            ),
        ],
        png,
    ))
}

/// Request body for the passcode gate.
#[derive(Debug, Deserialize)]
pub struct AccessRequest {
    /// The entered passcode. Empty when the caller is probing for an active
    /// grant window.
    #[serde(default)]
    pub passcode: String,
}

/// Response for a granted access check.
#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub granted: bool,
    pub asset: Asset,
}

/// POST /api/v1/qr/{asset_id}/access
///
/// Public passcode gate behind QR deep links. A prior grant within the
/// configured window is honored without re-entry; otherwise the entered
/// passcode must match the stored secret.
pub async fn check_asset_access(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    Json(input): Json<AccessRequest>,
) -> AppResult<impl IntoResponse> {
    let asset = AssetRepo::find_by_asset_id(&state.pool, &asset_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "asset",
            id: asset_id.clone(),
        }))?;

    let secret = SettingsRepo::get(&state.pool, QR_VIEWER_PASSCODE)
        .await?
        .unwrap_or_default();
    let last_granted_at = QrAccessRepo::last_granted_at(&state.pool, &asset.asset_id).await?;

    let now = chrono::Utc::now();
    let window = chrono::Duration::minutes(state.config.qr_access_window_mins);

    match check_access(&secret, &input.passcode, last_granted_at, now, window) {
        AccessDecision::Granted { record_grant } => {
            if record_grant {
                QrAccessRepo::record_grant(&state.pool, &asset.asset_id, now).await?;
                tracing::info!(asset_id = %asset.asset_id, "QR access granted");
            }
            Ok(Json(DataResponse {
                data: AccessResponse {
                    granted: true,
                    asset,
                },
            }))
        }
        AccessDecision::Denied => Err(AppError::Core(CoreError::Forbidden(
            "Invalid passcode".into(),
        ))),
    }
}

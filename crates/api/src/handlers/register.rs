//! Handlers for the `/register` resource: the editable fixed asset register.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use far_core::error::CoreError;
use far_core::export::build_csv;
use far_core::reconcile::{self, Actor, ReconcileResult};
use far_core::snapshot::{FieldMap, Snapshot};
use far_db::models::asset::Asset;
use far_db::repositories::AssetRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::register::{apply_changes, ApplyReport};
use crate::response::DataResponse;
use crate::state::AppState;

/// One row of the edited candidate table as submitted by the client.
///
/// All values arrive as strings; numeric coercion happens during
/// reconciliation. Unknown fields are rejected so a client-side schema drift
/// cannot silently drop edits.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AssetRowInput {
    #[validate(length(min = 1, message = "asset_id must be non-empty"))]
    pub asset_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub purchase_date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub accumulated_depreciation: String,
    #[serde(default)]
    pub useful_life: String,
    #[serde(default)]
    pub depreciation_rate: String,
}

impl AssetRowInput {
    fn into_row(self) -> (String, FieldMap) {
        let mut fields = FieldMap::new();
        fields.insert("name".into(), self.name);
        fields.insert("description".into(), self.description);
        fields.insert("purchase_date".into(), self.purchase_date);
        fields.insert("location".into(), self.location);
        fields.insert("status".into(), self.status);
        fields.insert("cost".into(), self.cost);
        fields.insert(
            "accumulated_depreciation".into(),
            self.accumulated_depreciation,
        );
        fields.insert("useful_life".into(), self.useful_life);
        fields.insert("depreciation_rate".into(), self.depreciation_rate);
        (self.asset_id, fields)
    }
}

/// Response body for a register save: what was detected and what happened
/// when it was applied.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub updates: usize,
    pub inserts: usize,
    pub deletes: usize,
    pub report: ApplyReport,
}

/// GET /api/v1/register
///
/// List the full register in stable row order.
pub async fn list_register(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<impl IntoResponse> {
    let assets = AssetRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: assets }))
}

/// GET /api/v1/register/{asset_id}
pub async fn get_asset(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(asset_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let asset = AssetRepo::find_by_asset_id(&state.pool, &asset_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "asset",
            id: asset_id,
        }))?;
    Ok(Json(DataResponse { data: asset }))
}

/// PUT /api/v1/register
///
/// Submit the edited table. The current register is snapshotted, diffed
/// against the candidate, and each detected change is applied with its audit
/// entry in one transaction. Per-change failures are reported distinctly,
/// never rolled into a blanket "saved".
pub async fn save_register(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Json(input): Json<Vec<AssetRowInput>>,
) -> AppResult<impl IntoResponse> {
    for row in &input {
        row.validate()
            .map_err(|e| AppError::BadRequest(format!("Invalid row: {e}")))?;
    }

    // Baseline snapshot, captured immediately before the diff.
    let current = AssetRepo::list_all(&state.pool).await?;
    let previous = Snapshot::from_rows(
        current
            .iter()
            .map(|a| (a.asset_id.clone(), a.to_field_map())),
    )
    .map_err(AppError::Core)?;

    let candidate = Snapshot::from_rows(input.into_iter().map(AssetRowInput::into_row))
        .map_err(AppError::Core)?;

    let actor = Actor {
        id: user.username.clone(),
        role: user.role,
    };
    let result: ReconcileResult =
        reconcile::reconcile(&previous, &candidate, &actor).map_err(AppError::Core)?;

    tracing::info!(
        updates = result.updates.len(),
        inserts = result.inserts.len(),
        deletes = result.deletes.len(),
        warnings = result.warnings.len(),
        changed_by = %actor.id,
        "Register reconciled",
    );

    let report = apply_changes(
        &state.pool,
        state.qr_encoder.as_ref(),
        &state.config.qr_base_url,
        &result,
    )
    .await;

    Ok(Json(DataResponse {
        data: SaveResponse {
            updates: result.updates.len(),
            inserts: result.inserts.len(),
            deletes: result.deletes.len(),
            report,
        },
    }))
}

/// GET /api/v1/register/export
///
/// Download the register as CSV: header row of field names, one row per
/// asset.
pub async fn export_register(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<impl IntoResponse> {
    let assets = AssetRepo::list_all(&state.pool).await?;

    let header = [
        "asset_id",
        "name",
        "description",
        "purchase_date",
        "location",
        "status",
        "cost",
        "accumulated_depreciation",
        "net_block",
        "useful_life",
        "depreciation_rate",
    ];
    let rows: Vec<Vec<String>> = assets.iter().map(asset_csv_row).collect();
    let csv = build_csv(
        &header,
        rows.iter().map(|r| r.iter().map(String::as_str)),
    );

    Ok(csv_response("fixed-asset-register.csv", csv))
}

fn asset_csv_row(asset: &Asset) -> Vec<String> {
    vec![
        asset.asset_id.clone(),
        asset.name.clone(),
        asset.description.clone(),
        asset.purchase_date.clone(),
        asset.location.clone(),
        asset.status.clone(),
        asset.cost.to_string(),
        asset.accumulated_depreciation.to_string(),
        asset.net_block.to_string(),
        asset.useful_life.to_string(),
        asset.depreciation_rate.to_string(),
    ]
}

/// Build a `text/csv` attachment response.
pub(crate) fn csv_response(filename: &str, body: String) -> axum::response::Response {
    axum::response::Response::builder()
        .status(200)
        .header("Content-Type", "text/csv")
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        )
        .body(axum::body::Body::from(body))
        .unwrap_or_else(|_| {
            AppError::InternalError("Failed to build CSV response".into()).into_response()
        })
}

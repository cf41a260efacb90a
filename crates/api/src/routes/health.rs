//! Liveness endpoint, mounted at the root rather than under `/api/v1` so
//! load balancers can probe it without credentials.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use far_db::repositories::AssetRepo;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the register is reachable, `degraded` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database answered.
    pub db_healthy: bool,
    /// Rows currently in the register, when the database answered.
    pub registered_assets: Option<i64>,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // One round trip doubles as both the liveness probe and the row count.
    let registered_assets = AssetRepo::count(&state.pool).await.ok();
    let db_healthy = registered_assets.is_some();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        registered_assets,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

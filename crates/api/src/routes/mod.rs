pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                      login (public)
///
/// /register                        list (GET, auth), save edited table (PUT, editor)
/// /register/export                 CSV download (GET, auth)
/// /register/{asset_id}             single asset (GET, auth)
/// /register/{asset_id}/qr          QR PNG (GET, auth + QR view capability)
///
/// /audit                           query trail (GET, audit view)
/// /audit/export                    CSV download (GET, audit view)
/// /audit/integrity                 hash chain verification (GET, admin)
///
/// /qr/{asset_id}/access            passcode gate (POST, public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/register",
            get(handlers::register::list_register).put(handlers::register::save_register),
        )
        .route("/register/export", get(handlers::register::export_register))
        .route("/register/{asset_id}", get(handlers::register::get_asset))
        .route("/register/{asset_id}/qr", get(handlers::qr::get_artifact))
        .route("/audit", get(handlers::audit::query_audit))
        .route("/audit/export", get(handlers::audit::export_audit))
        .route("/audit/integrity", get(handlers::audit::check_integrity))
        .route(
            "/qr/{asset_id}/access",
            post(handlers::qr::check_asset_access),
        )
}

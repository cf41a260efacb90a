use std::sync::Arc;

use far_core::qr::QrEncoder;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: far_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// QR payload encoder used when inserts trigger artifact generation.
    pub qr_encoder: Arc<dyn QrEncoder>,
}

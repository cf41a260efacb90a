use crate::auth::jwt::JwtConfig;
use far_core::access::DEFAULT_GRANT_WINDOW_MINS;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL embedded in QR payloads; the asset_id is appended as a query
    /// parameter.
    pub qr_base_url: String,
    /// Passcode grant window for QR deep links, in minutes (default: `60`).
    pub qr_access_window_mins: i64,
    /// JWT token configuration (secret, expiry duration).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                           |
    /// |-------------------------|-----------------------------------|
    /// | `HOST`                  | `0.0.0.0`                         |
    /// | `PORT`                  | `3000`                            |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`           |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                              |
    /// | `QR_BASE_URL`           | `http://localhost:3000/assets`    |
    /// | `QR_ACCESS_WINDOW_MINS` | `60`                              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let qr_base_url = std::env::var("QR_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/assets".into());

        let qr_access_window_mins: i64 = std::env::var("QR_ACCESS_WINDOW_MINS")
            .unwrap_or_else(|_| DEFAULT_GRANT_WINDOW_MINS.to_string())
            .parse()
            .expect("QR_ACCESS_WINDOW_MINS must be a valid i64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            qr_base_url,
            qr_access_window_mins,
            jwt,
        }
    }
}

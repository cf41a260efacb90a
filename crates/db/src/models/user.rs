//! User entity model for the static credential-role lookup.

use far_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A login-capable user. Password hashes are Argon2id PHC strings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user (the hash is computed by the caller).
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

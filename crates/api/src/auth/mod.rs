//! Authentication primitives: JWT tokens, password hashing, and first-run
//! admin provisioning.

pub mod bootstrap;
pub mod jwt;
pub mod password;

//! Pure domain logic for the fixed asset register.
//!
//! This crate has no I/O: the reconciler, the access gate, and the export
//! builders all return plain descriptions that the api crate applies against
//! the database.

pub mod access;
pub mod asset;
pub mod audit;
pub mod error;
pub mod export;
pub mod hashing;
pub mod numeric;
pub mod qr;
pub mod reconcile;
pub mod roles;
pub mod snapshot;
pub mod types;

//! HTTP handlers, one module per resource.

pub mod audit;
pub mod auth;
pub mod qr;
pub mod register;

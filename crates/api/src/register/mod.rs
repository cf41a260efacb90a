//! The register edit flow: snapshot, reconcile, apply.

pub mod apply;

pub use apply::{apply_changes, ApplyFailure, ApplyReport};

//! Shared module - Common types and utilities
//!
//! Identifiers, resolution slots, annotations, access levels and diagnostics
//! used by every feature. Nothing here depends on a feature module.

pub mod models;

// Re-exports for convenience
pub use models::*;

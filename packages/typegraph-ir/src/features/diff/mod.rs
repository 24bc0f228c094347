//! Snapshot diff
//!
//! Structural before/after comparison of two resolved graphs, keyed by
//! module-qualified type name.

pub mod domain;
pub mod infrastructure;

pub use domain::{DeclarationChange, GraphDiff};
pub use infrastructure::diff_declarations;

//! Index Builder
//!
//! Pure derivation of the query indexes from a resolved graph: kind
//! lists, based-on sets, direct subtypes and conformers, class chains,
//! protocol conformance and flattened compositions.

pub mod domain;
pub mod infrastructure;

pub use domain::{IndexQueryError, Indexes};
pub use infrastructure::IndexBuilder;

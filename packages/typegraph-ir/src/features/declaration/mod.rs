//! Declaration model
//!
//! Input fragments (`FileParseResult`, `TypeFragment`, `AliasFragment`)
//! and the canonical entities the registry builds from them.

pub mod domain;

pub use domain::*;

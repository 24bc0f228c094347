//! Resolution Engine
//!
//! Fixed-point rewrite of every `TypeName` slot to the canonical
//! declaration it names, with alias indirection and generic binding,
//! followed by back-reference population.

pub mod domain;
pub mod infrastructure;

pub use domain::{is_builtin_type, PassStats, ResolvedGraph};
pub use infrastructure::ResolutionEngine;

//! Type references as written in source
//!
//! - domain/         - `TypeName` and its structured shapes
//! - infrastructure/ - text parser for inheritance clauses and member types

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::parse_type_name;

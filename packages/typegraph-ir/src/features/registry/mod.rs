//! Registry Builder
//!
//! Groups per-file fragments by identity `(module, scope path, name)`,
//! merges extensions into their primary declaration and builds the name
//! lookup table. Output is one canonical `Declaration` per logical type.

pub mod domain;
pub mod infrastructure;

pub use domain::{Registry, Symbol, SymbolTable};
pub use infrastructure::RegistryBuilder;

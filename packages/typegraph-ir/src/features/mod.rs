//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure data types and queries
//! - infrastructure/ - The algorithms that build them
//!
//! Leaf-first: `type_name` and `declaration` are the model, `registry`
//! merges fragments, `resolution` fills every slot, `indexes` derives the
//! query tables, `diff` compares two snapshots.

pub mod type_name;

pub mod declaration;

pub mod registry;

pub mod resolution;

pub mod indexes;

pub mod diff;

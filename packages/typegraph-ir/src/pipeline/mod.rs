//! Pipeline orchestration

pub mod type_graph;

pub use type_graph::{build_type_graph, ResolutionStats, TypeGraph};

mod builtin_types;
mod resolved_graph;

pub use builtin_types::{is_builtin_type, BUILTIN_TYPES};
pub use resolved_graph::{PassStats, ResolvedGraph};

mod graph_diff;

pub use graph_diff::{DeclarationChange, GraphDiff};

mod back_references;
mod engine;
mod scope_lookup;

pub use engine::ResolutionEngine;

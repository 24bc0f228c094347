mod registry;
mod symbol_table;

pub use registry::Registry;
pub use symbol_table::{Symbol, SymbolTable};

//! Output of the resolution engine

use serde::{Deserialize, Serialize};

use crate::features::declaration::{Alias, Declaration, FreeFunction};
use crate::features::registry::{Registry, SymbolTable};
use crate::shared::models::{AliasId, DeclId, Diagnostics};

/// Fixed-point loop statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassStats {
    /// Passes run, including the confirming pass that changed nothing
    pub passes: usize,
    pub converged: bool,
    /// Resolution slots filled across all passes
    pub resolved: usize,
    /// Reference sites left unresolved (one diagnostic each)
    pub unresolved: usize,
}

/// Registry with every resolvable slot filled and back references populated
#[derive(Debug, Clone)]
pub struct ResolvedGraph {
    pub(crate) registry: Registry,
    pub(crate) stats: PassStats,
}

impl ResolvedGraph {
    pub fn declarations(&self) -> &[Declaration] {
        self.registry.declarations()
    }

    pub fn aliases(&self) -> &[Alias] {
        self.registry.aliases()
    }

    pub fn functions(&self) -> &[FreeFunction] {
        self.registry.functions()
    }

    pub fn symbols(&self) -> &SymbolTable {
        self.registry.symbols()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        self.registry.diagnostics()
    }

    pub fn stats(&self) -> PassStats {
        self.stats
    }

    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.registry.get(id)
    }

    pub fn alias(&self, id: AliasId) -> Option<&Alias> {
        self.registry.alias(id)
    }

    pub fn find(&self, name: &str) -> Option<&Declaration> {
        self.registry.find(name)
    }

    /// Hand the registry back, e.g. to run resolution again
    pub fn into_registry(self) -> Registry {
        self.registry
    }
}

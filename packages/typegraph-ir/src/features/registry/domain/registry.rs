//! Registry - the merged, not yet resolved, declaration arena

use crate::features::declaration::{Alias, Declaration, FreeFunction};
use crate::shared::models::{AliasId, DeclId, Diagnostics};

use super::symbol_table::SymbolTable;

/// One canonical declaration per logical type, in first-registration order
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub(crate) declarations: Vec<Declaration>,
    pub(crate) aliases: Vec<Alias>,
    pub(crate) functions: Vec<FreeFunction>,
    pub(crate) symbols: SymbolTable,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) file_count: usize,
}

impl Registry {
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    pub fn functions(&self) -> &[FreeFunction] {
        &self.functions
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.declarations.get(id.index())
    }

    pub fn alias(&self, id: AliasId) -> Option<&Alias> {
        self.aliases.get(id.index())
    }

    /// Every declaration registered under a scope-qualified name
    pub fn by_name(&self, global_name: &str) -> impl Iterator<Item = &Declaration> {
        self.symbols
            .types(global_name)
            .iter()
            .filter_map(move |id| self.get(*id))
    }

    /// First-registered declaration for `Outer.Inner` or `Module.Outer.Inner`
    pub fn find(&self, name: &str) -> Option<&Declaration> {
        if let Some(id) = self.symbols.types(name).first() {
            return self.get(*id);
        }
        let (module, rest) = self.symbols.strip_module(name)?;
        self.by_name(rest)
            .find(|decl| decl.module_name.as_deref() == Some(module))
    }
}

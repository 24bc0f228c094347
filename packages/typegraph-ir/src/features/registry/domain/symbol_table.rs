//! Name → declaration lookup table
//!
//! Keys are scope-qualified names (`Outer.Inner`). One key maps to several
//! declarations only across distinct modules; values keep registration
//! order so the first-registered candidate is always `[0]`. `symbols`
//! keeps types and aliases in one list, in the order they were registered.

use ahash::{AHashMap, AHashSet};

use crate::shared::models::{AliasId, DeclId};

/// A named entity registered under a scope-qualified name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Type(DeclId),
    Alias(AliasId),
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    types_by_name: AHashMap<String, Vec<DeclId>>,
    aliases_by_name: AHashMap<String, Vec<AliasId>>,
    symbols_by_name: AHashMap<String, Vec<Symbol>>,
    modules: AHashSet<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_type(&mut self, global_name: &str, id: DeclId) {
        let entry = self.types_by_name.entry(global_name.to_string()).or_default();
        if !entry.contains(&id) {
            entry.push(id);
            self.push_symbol(global_name, Symbol::Type(id));
        }
    }

    pub(crate) fn insert_alias(&mut self, global_name: &str, id: AliasId) {
        let entry = self
            .aliases_by_name
            .entry(global_name.to_string())
            .or_default();
        if !entry.contains(&id) {
            entry.push(id);
            self.push_symbol(global_name, Symbol::Alias(id));
        }
    }

    fn push_symbol(&mut self, global_name: &str, symbol: Symbol) {
        self.symbols_by_name
            .entry(global_name.to_string())
            .or_default()
            .push(symbol);
    }

    pub(crate) fn insert_module(&mut self, module_name: &str) {
        self.modules.insert(module_name.to_string());
    }

    /// Declarations registered under a scope-qualified name
    pub fn types(&self, global_name: &str) -> &[DeclId] {
        self.types_by_name
            .get(global_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn aliases(&self, global_name: &str) -> &[AliasId] {
        self.aliases_by_name
            .get(global_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Types and aliases under one name, in registration order
    pub fn symbols(&self, global_name: &str) -> &[Symbol] {
        self.symbols_by_name
            .get(global_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_module(&self, name: &str) -> bool {
        self.modules.contains(name)
    }

    /// `Module.Outer.Inner` → `Outer.Inner` when `Module` is a scanned module
    pub fn strip_module<'a>(&self, name: &'a str) -> Option<(&'a str, &'a str)> {
        let (head, rest) = name.split_once('.')?;
        if self.is_module(head) && !rest.is_empty() {
            Some((head, rest))
        } else {
            None
        }
    }

    pub fn type_name_count(&self) -> usize {
        self.types_by_name.len()
    }
}

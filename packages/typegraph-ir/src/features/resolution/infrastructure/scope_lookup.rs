//! Scope-aware name lookup
//!
//! Lookup order for the head of a (possibly dotted) name:
//! 1. lexical chain: nested types and aliases of the referencing
//!    declaration, then of each enclosing declaration
//! 2. nested types of resolved supertypes along the same chain
//! 3. global scope, with the module tie-break
//!
//! Remaining segments are looked up as members of whatever the head
//! resolved to. Lookups read a per-pass snapshot, never the declarations
//! being written.

use ahash::AHashSet;

use crate::features::declaration::{Alias, Declaration};
use crate::features::registry::{Symbol, SymbolTable};
use crate::features::type_name::TypeName;
use crate::shared::models::{AliasId, DeclId, Diagnostic, DiagnosticKind, Diagnostics};

#[derive(Debug, Clone)]
pub(crate) struct DeclScope {
    pub global_name: String,
    pub module_name: Option<String>,
    pub parent: Option<DeclId>,
    pub generic_parameters: Vec<String>,
    pub associated_types: Vec<String>,
    pub supertypes: Vec<DeclId>,
}

#[derive(Debug, Clone)]
pub(crate) struct AliasScope {
    pub global_name: String,
    pub module_name: Option<String>,
    pub parent: Option<DeclId>,
    pub type_name: TypeName,
    pub generic_parameters: Vec<String>,
}

/// Read-only view of the arena taken at the start of a pass
#[derive(Debug, Clone, Default)]
pub(crate) struct ScopeSnapshot {
    pub decls: Vec<DeclScope>,
    pub aliases: Vec<AliasScope>,
}

impl ScopeSnapshot {
    pub fn capture(decls: &[Declaration], aliases: &[Alias]) -> Self {
        let mut snapshot = Self {
            decls: decls
                .iter()
                .map(|decl| DeclScope {
                    global_name: decl.global_name.clone(),
                    module_name: decl.module_name.clone(),
                    parent: decl.parent(),
                    generic_parameters: decl.generic_parameters.clone(),
                    associated_types: decl.associated_types().to_vec(),
                    supertypes: Vec::new(),
                })
                .collect(),
            aliases: aliases
                .iter()
                .map(|alias| AliasScope {
                    global_name: alias.global_name.clone(),
                    module_name: alias.module_name.clone(),
                    parent: alias.parent(),
                    type_name: alias.type_name.clone(),
                    generic_parameters: alias.generic_parameters.clone(),
                })
                .collect(),
        };
        snapshot.refresh_supertypes(decls);
        snapshot
    }

    pub fn refresh_supertypes(&mut self, decls: &[Declaration]) {
        for (scope, decl) in self.decls.iter_mut().zip(decls) {
            scope.supertypes = decl
                .links
                .inherited_resolution
                .iter()
                .flatten()
                .copied()
                .filter(|id| *id != decl.id())
                .collect();
        }
    }

    fn decl(&self, id: DeclId) -> Option<&DeclScope> {
        self.decls.get(id.index())
    }

    /// Declaration an alias currently expands to, if known
    pub fn alias_target(&self, id: AliasId) -> Option<DeclId> {
        let alias = self.aliases.get(id.index())?;
        alias
            .type_name
            .actual_type_name()
            .and_then(TypeName::resolved)
            .or_else(|| alias.type_name.resolved())
    }
}

/// Where a reference is written
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'a> {
    /// Innermost enclosing declaration
    pub decl: Option<DeclId>,
    pub module_name: Option<&'a str>,
    /// Method or alias generic parameters
    pub local_generics: &'a [String],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup {
    Type(DeclId),
    Alias(AliasId),
    /// Generic parameter, associated type or `Self`: not a declaration
    Placeholder,
    Missing,
}

pub(crate) struct ScopeResolver<'a> {
    symbols: &'a SymbolTable,
    snapshot: &'a ScopeSnapshot,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(symbols: &'a SymbolTable, snapshot: &'a ScopeSnapshot) -> Self {
        Self { symbols, snapshot }
    }

    pub fn lookup(
        &self,
        name: &str,
        scope: &Scope<'_>,
        diagnostics: &mut Diagnostics,
        site: &str,
    ) -> Lookup {
        if let Some((module, rest)) = self.symbols.strip_module(name) {
            let found = self.lookup_in_module(module, rest);
            if found != Lookup::Missing {
                return found;
            }
        }

        let (head, tail) = match name.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (name, None),
        };

        if self.is_placeholder(head, scope) {
            return Lookup::Placeholder;
        }

        let found = self
            .lexical(head, scope)
            .or_else(|| self.inherited(head, scope))
            .or_else(|| self.global(head, scope, diagnostics, site));

        match (found, tail) {
            (Some(found), Some(tail)) => self.walk(found, tail),
            (Some(found), None) => found,
            (None, _) => Lookup::Missing,
        }
    }

    fn lookup_in_module(&self, module: &str, name: &str) -> Lookup {
        let (head, tail) = match name.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (name, None),
        };
        let in_module = |candidate: &Option<String>| candidate.as_deref() == Some(module);

        let found = self
            .symbols
            .types(head)
            .iter()
            .copied()
            .find(|id| self.snapshot.decl(*id).map_or(false, |d| in_module(&d.module_name)))
            .map(Lookup::Type)
            .or_else(|| {
                self.symbols
                    .aliases(head)
                    .iter()
                    .copied()
                    .find(|id| {
                        self.snapshot
                            .aliases
                            .get(id.index())
                            .map_or(false, |a| in_module(&a.module_name))
                    })
                    .map(Lookup::Alias)
            });

        match (found, tail) {
            (Some(found), Some(tail)) => self.walk(found, tail),
            (Some(found), None) => found,
            (None, _) => Lookup::Missing,
        }
    }

    /// Resolve `tail` segment by segment as members of `start`
    fn walk(&self, start: Lookup, tail: &str) -> Lookup {
        let mut current = start;
        for segment in tail.split('.') {
            let owner = match current {
                Lookup::Type(id) => id,
                Lookup::Alias(alias) => match self.snapshot.alias_target(alias) {
                    Some(id) => id,
                    None => return Lookup::Missing,
                },
                Lookup::Placeholder | Lookup::Missing => return Lookup::Missing,
            };
            current = match self
                .direct_member(owner, segment)
                .or_else(|| self.inherited_member(owner, segment))
            {
                Some(found) => found,
                None => return Lookup::Missing,
            };
        }
        current
    }

    fn chain(&self, start: Option<DeclId>) -> Vec<DeclId> {
        let mut chain = Vec::new();
        let mut cursor = start;
        while let Some(id) = cursor {
            if chain.contains(&id) {
                break;
            }
            chain.push(id);
            cursor = self.snapshot.decl(id).and_then(|d| d.parent);
        }
        chain
    }

    fn is_placeholder(&self, head: &str, scope: &Scope<'_>) -> bool {
        if head == "Self" || scope.local_generics.iter().any(|g| g == head) {
            return true;
        }
        self.chain(scope.decl).into_iter().any(|id| {
            self.snapshot.decl(id).map_or(false, |d| {
                d.generic_parameters.iter().any(|g| g == head)
                    || d.associated_types.iter().any(|a| a == head)
            })
        })
    }

    fn lexical(&self, head: &str, scope: &Scope<'_>) -> Option<Lookup> {
        self.chain(scope.decl)
            .into_iter()
            .find_map(|id| self.direct_member(id, head))
    }

    fn inherited(&self, head: &str, scope: &Scope<'_>) -> Option<Lookup> {
        self.chain(scope.decl)
            .into_iter()
            .find_map(|id| self.inherited_member(id, head))
    }

    /// Nested type or alias declared directly inside `owner`
    fn direct_member(&self, owner: DeclId, name: &str) -> Option<Lookup> {
        let scope = self.snapshot.decl(owner)?;
        let key = format!("{}.{}", scope.global_name, name);

        self.symbols
            .types(&key)
            .iter()
            .copied()
            .find(|id| {
                self.snapshot
                    .decl(*id)
                    .map_or(false, |d| d.module_name == scope.module_name)
            })
            .map(Lookup::Type)
            .or_else(|| {
                self.symbols
                    .aliases(&key)
                    .iter()
                    .copied()
                    .find(|id| {
                        self.snapshot
                            .aliases
                            .get(id.index())
                            .map_or(false, |a| a.module_name == scope.module_name)
                    })
                    .map(Lookup::Alias)
            })
    }

    /// Nested type or alias of a (transitive) resolved supertype of `owner`,
    /// breadth-first
    fn inherited_member(&self, owner: DeclId, name: &str) -> Option<Lookup> {
        let mut visited: AHashSet<DeclId> = AHashSet::new();
        visited.insert(owner);
        let mut queue: Vec<DeclId> = self.snapshot.decl(owner)?.supertypes.clone();
        let mut cursor = 0;

        while cursor < queue.len() {
            let id = queue[cursor];
            cursor += 1;
            if !visited.insert(id) {
                continue;
            }
            if let Some(found) = self.direct_member(id, name) {
                return Some(found);
            }
            if let Some(scope) = self.snapshot.decl(id) {
                queue.extend(scope.supertypes.iter().copied());
            }
        }
        None
    }

    /// Top-level candidates, types and aliases alike: same module first,
    /// then first registered
    fn global(
        &self,
        head: &str,
        scope: &Scope<'_>,
        diagnostics: &mut Diagnostics,
        site: &str,
    ) -> Option<Lookup> {
        let mut candidates: Vec<(Lookup, Option<&str>)> = Vec::new();
        for symbol in self.symbols.symbols(head) {
            match *symbol {
                Symbol::Type(id) => {
                    if let Some(decl) = self.snapshot.decl(id) {
                        candidates.push((Lookup::Type(id), decl.module_name.as_deref()));
                    }
                }
                Symbol::Alias(id) => {
                    if let Some(alias) = self.snapshot.aliases.get(id.index()) {
                        candidates.push((Lookup::Alias(id), alias.module_name.as_deref()));
                    }
                }
            }
        }

        match candidates.len() {
            0 => None,
            1 => Some(candidates[0].0),
            _ => {
                if let Some((found, _)) = candidates
                    .iter()
                    .find(|(_, module)| *module == scope.module_name)
                {
                    return Some(*found);
                }
                let modules: Vec<&str> = candidates
                    .iter()
                    .map(|(_, module)| module.unwrap_or("<none>"))
                    .collect();
                diagnostics.push_unique(
                    Diagnostic::new(
                        DiagnosticKind::AmbiguousReference,
                        head,
                        format!(
                            "`{}` matches declarations in modules [{}]; using the first registered",
                            head,
                            modules.join(", ")
                        ),
                    )
                    .with_site(site),
                );
                Some(candidates[0].0)
            }
        }
    }
}

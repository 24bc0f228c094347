//! Fixed-point resolution engine
//!
//! Each pass:
//! 1. snapshot the arena (names, scopes, resolved supertypes, alias bodies)
//! 2. resolve inheritance clauses, then refresh supertypes in the snapshot
//! 3. resolve every other `TypeName` slot (members, enum raw types,
//!    composition members, alias bodies, free functions)
//!
//! Only empty slots are attempted, so a pass that fills nothing means the
//! graph has converged. A final reporting pass records one
//! `UnresolvedReference` per reference site that is still missing.

use ahash::{AHashMap, AHashSet};
use std::time::Instant;
use tracing::{debug, warn};

use super::back_references::populate_back_references;
use super::scope_lookup::{Lookup, Scope, ScopeResolver, ScopeSnapshot};
use crate::config::ResolutionConfig;
use crate::features::declaration::{Alias, Declaration, FreeFunction, Method, TypeKind};
use crate::features::registry::{Registry, SymbolTable};
use crate::features::resolution::domain::{is_builtin_type, PassStats, ResolvedGraph};
use crate::features::type_name::TypeName;
use crate::shared::models::{AliasId, DeclId, Diagnostic, DiagnosticKind, Diagnostics};

#[derive(Debug, Clone)]
pub struct ResolutionEngine {
    max_alias_depth: usize,
    max_passes: Option<usize>,
    report_builtin_references: bool,
    extra_builtin_types: AHashSet<String>,
}

impl Default for ResolutionEngine {
    fn default() -> Self {
        Self::new(&ResolutionConfig::default())
    }
}

impl ResolutionEngine {
    pub fn new(config: &ResolutionConfig) -> Self {
        Self {
            max_alias_depth: config.max_alias_depth,
            max_passes: config.max_passes,
            report_builtin_references: config.report_builtin_references,
            extra_builtin_types: config.extra_builtin_types.iter().cloned().collect(),
        }
    }

    /// Resolve every reachable type reference. Never fails; whatever
    /// cannot be resolved is reported in the diagnostics.
    pub fn resolve(&self, registry: Registry) -> ResolvedGraph {
        let start = Instant::now();
        let Registry {
            mut declarations,
            mut aliases,
            mut functions,
            symbols,
            mut diagnostics,
            file_count,
        } = registry;

        let bound = self
            .max_passes
            .unwrap_or(declarations.len() + 1)
            .max(1);

        let mut stats = PassStats::default();
        let mut last_changes = 0;

        while stats.passes < bound {
            stats.passes += 1;
            let changes = self.run_pass(
                &symbols,
                &mut declarations,
                &mut aliases,
                &mut functions,
                &mut diagnostics,
                false,
            );
            stats.resolved += changes;
            last_changes = changes;
            debug!("Resolution pass {}: {} slots filled", stats.passes, changes);

            if changes == 0 {
                break;
            }
        }

        stats.converged = last_changes == 0;
        if !stats.converged {
            warn!(
                "Resolution did not converge within {} passes ({} slots still changing)",
                bound, last_changes
            );
            diagnostics.push_unique(Diagnostic::new(
                DiagnosticKind::NonConvergence,
                "<graph>",
                format!(
                    "type resolution still changing after {} passes; result is best-effort",
                    bound
                ),
            ));
        }

        let before = diagnostics.count_of(DiagnosticKind::UnresolvedReference);
        stats.resolved += self.run_pass(
            &symbols,
            &mut declarations,
            &mut aliases,
            &mut functions,
            &mut diagnostics,
            true,
        );
        stats.unresolved = diagnostics.count_of(DiagnosticKind::UnresolvedReference);

        fill_composed_types(&mut declarations);
        populate_back_references(&mut declarations, &mut diagnostics);

        debug!(
            "Resolution finished in {:?}: {} passes, {} slots, {} new unresolved",
            start.elapsed(),
            stats.passes,
            stats.resolved,
            stats.unresolved - before
        );

        ResolvedGraph {
            registry: Registry {
                declarations,
                aliases,
                functions,
                symbols,
                diagnostics,
                file_count,
            },
            stats,
        }
    }

    fn run_pass(
        &self,
        symbols: &SymbolTable,
        declarations: &mut [Declaration],
        aliases: &mut [Alias],
        functions: &mut [FreeFunction],
        diagnostics: &mut Diagnostics,
        report: bool,
    ) -> usize {
        let mut snapshot = ScopeSnapshot::capture(declarations, aliases);
        let mut changes = 0;

        {
            let resolver = NameResolver::new(self, symbols, &snapshot, report);
            for decl in declarations.iter_mut() {
                changes += resolver.resolve_inheritance(decl, diagnostics);
            }
        }

        snapshot.refresh_supertypes(declarations);
        let resolver = NameResolver::new(self, symbols, &snapshot, report);

        for decl in declarations.iter_mut() {
            changes += resolver.resolve_members(decl, diagnostics);
        }
        for alias in aliases.iter_mut() {
            let scope = Scope {
                decl: alias.links.parent,
                module_name: alias.module_name.as_deref(),
                local_generics: &alias.generic_parameters,
            };
            let site = alias.global_name.clone();
            changes += resolver.resolve(&mut alias.type_name, &scope, &site, 0, diagnostics, report);
        }
        for function in functions.iter_mut() {
            let site = function.method.name.clone();
            changes += resolver.resolve_method(
                &mut function.method,
                None,
                function.module_name.as_deref(),
                &site,
                diagnostics,
            );
        }

        changes
    }

    fn is_exempt(&self, name: &str) -> bool {
        if self.extra_builtin_types.contains(name) {
            return true;
        }
        !self.report_builtin_references && is_builtin_type(name)
    }
}

/// Resolves `TypeName`s against one pass snapshot
struct NameResolver<'a> {
    engine: &'a ResolutionEngine,
    snapshot: &'a ScopeSnapshot,
    lookup: ScopeResolver<'a>,
    /// Final pass: report missing names and settle pending alias expansions
    report: bool,
}

impl<'a> NameResolver<'a> {
    fn new(
        engine: &'a ResolutionEngine,
        symbols: &'a SymbolTable,
        snapshot: &'a ScopeSnapshot,
        report: bool,
    ) -> Self {
        Self {
            engine,
            snapshot,
            lookup: ScopeResolver::new(symbols, snapshot),
            report,
        }
    }

    /// Inheritance clauses are written in the enclosing scope
    fn resolve_inheritance(&self, decl: &mut Declaration, diagnostics: &mut Diagnostics) -> usize {
        let count = decl.inherited_type_names.len();
        decl.links.inherited_resolution.resize(count, None);

        let scope = Scope {
            decl: decl.links.parent,
            module_name: decl.module_name.as_deref(),
            local_generics: &decl.generic_parameters,
        };

        let mut changes = 0;
        for (index, name) in decl.inherited_type_names.iter().enumerate() {
            if decl.links.inherited_resolution[index].is_some() {
                continue;
            }
            let mut type_name = TypeName::parse(name);
            self.resolve(&mut type_name, &scope, &decl.global_name, 0, diagnostics, self.report);
            if let Some(target) = type_name.resolved() {
                decl.links.inherited_resolution[index] = Some(target);
                changes += 1;
            }
        }
        changes
    }

    /// Members see the declaration's own nested types
    fn resolve_members(&self, decl: &mut Declaration, diagnostics: &mut Diagnostics) -> usize {
        let id = decl.links.id;
        let module_name = decl.module_name.as_deref();
        let owner = decl.global_name.as_str();
        let scope = Scope {
            decl: Some(id),
            module_name,
            local_generics: &[],
        };
        let mut changes = 0;

        for variable in decl.variables.iter_mut() {
            let site = format!("{}.{}", owner, variable.name);
            changes += self.resolve(&mut variable.type_name, &scope, &site, 0, diagnostics, self.report);
        }

        for method in decl.methods.iter_mut() {
            let site = format!("{}.{}", owner, method.name);
            changes += self.resolve_method(method, Some(id), module_name, &site, diagnostics);
        }

        for (index, subscript) in decl.subscripts.iter_mut().enumerate() {
            let site = format!("{}.subscript#{}", owner, index);
            for parameter in subscript.parameters.iter_mut() {
                changes +=
                    self.resolve(&mut parameter.type_name, &scope, &site, 0, diagnostics, self.report);
            }
            changes += self.resolve(
                &mut subscript.return_type_name,
                &scope,
                &site,
                0,
                diagnostics,
                self.report,
            );
        }

        match decl.kind {
            TypeKind::Enum(ref mut details) => {
                if let Some(ref mut raw) = details.raw_type_name {
                    changes += self.resolve(raw, &scope, owner, 0, diagnostics, self.report);
                }
                for case in details.cases.iter_mut() {
                    let site = format!("{}.{}", owner, case.name);
                    for value in case.associated_values.iter_mut() {
                        changes +=
                            self.resolve(&mut value.type_name, &scope, &site, 0, diagnostics, self.report);
                    }
                }
            }
            TypeKind::ProtocolComposition(ref mut details) => {
                let outer = Scope {
                    decl: decl.links.parent,
                    module_name,
                    local_generics: &[],
                };
                for member in details.composed_type_names.iter_mut() {
                    changes += self.resolve(member, &outer, owner, 0, diagnostics, self.report);
                }
            }
            _ => {}
        }

        changes
    }

    fn resolve_method(
        &self,
        method: &mut Method,
        owner: Option<DeclId>,
        module_name: Option<&str>,
        site: &str,
        diagnostics: &mut Diagnostics,
    ) -> usize {
        let scope = Scope {
            decl: owner,
            module_name,
            local_generics: &method.generic_parameters,
        };
        let mut changes = 0;
        for parameter in method.parameters.iter_mut() {
            let parameter_site = format!("{}.{}", site, parameter.name);
            changes += self.resolve(
                &mut parameter.type_name,
                &scope,
                &parameter_site,
                0,
                diagnostics,
                self.report,
            );
        }
        changes += self.resolve(
            &mut method.return_type_name,
            &scope,
            site,
            0,
            diagnostics,
            self.report,
        );
        changes
    }

    /// Resolve one name and everything nested in it. Returns the number
    /// of slots filled.
    fn resolve(
        &self,
        type_name: &mut TypeName,
        scope: &Scope<'_>,
        site: &str,
        depth: usize,
        diagnostics: &mut Diagnostics,
        report: bool,
    ) -> usize {
        let mut changes = 0;
        type_name.for_each_child_mut(&mut |child| {
            changes += self.resolve(child, scope, site, depth, diagnostics, report);
        });

        if type_name.is_settled() {
            return changes;
        }
        let Some(name) = type_name.lookup_name().map(str::to_string) else {
            return changes;
        };

        match self.lookup.lookup(&name, scope, diagnostics, site) {
            Lookup::Type(id) => {
                type_name.set_resolved(id);
                self.bind_generics(type_name, id);
                changes += 1;
            }
            Lookup::Alias(alias) => {
                if let Some(actual) = self.expand_alias(alias, type_name, site, depth, diagnostics) {
                    if let Some(id) = actual.resolved() {
                        type_name.set_resolved(id);
                    }
                    type_name.set_actual_type_name(actual);
                    changes += 1;
                }
            }
            Lookup::Placeholder => {}
            Lookup::Missing => {
                if report && !self.engine.is_exempt(&name) {
                    diagnostics.push_unique(
                        Diagnostic::new(
                            DiagnosticKind::UnresolvedReference,
                            name.clone(),
                            format!("`{}` does not name a type in the scanned sources", name),
                        )
                        .with_site(site),
                    );
                }
            }
        }
        changes
    }

    /// Expanded form of `reference` through `alias`, resolved in the
    /// alias's own scope. `None` while the body is still pending, or when
    /// indirection exceeds the depth bound.
    fn expand_alias(
        &self,
        alias: AliasId,
        reference: &TypeName,
        site: &str,
        depth: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<TypeName> {
        let body = self.snapshot.aliases.get(alias.index())?;

        if depth >= self.engine.max_alias_depth {
            diagnostics.push_unique(
                Diagnostic::new(
                    DiagnosticKind::AliasCycle,
                    body.global_name.clone(),
                    format!(
                        "typealias `{}` exceeds the indirection depth of {}",
                        body.global_name, self.engine.max_alias_depth
                    ),
                )
                .with_site(site),
            );
            return None;
        }

        let mut actual = match reference.generic {
            Some(ref generic) if !body.generic_parameters.is_empty() => {
                let bindings: AHashMap<String, TypeName> = body
                    .generic_parameters
                    .iter()
                    .cloned()
                    .zip(generic.type_parameters.iter().map(|p| p.type_name.clone()))
                    .collect();
                body.type_name.substitute(&bindings)
            }
            _ => body.type_name.clone(),
        };

        let alias_scope = Scope {
            decl: body.parent,
            module_name: body.module_name.as_deref(),
            local_generics: &body.generic_parameters,
        };
        self.resolve(&mut actual, &alias_scope, site, depth + 1, diagnostics, false);

        // alias of an alias: keep the innermost expansion
        if let Some(inner) = actual.actual_type_name() {
            let mut inner = inner.clone();
            inner.is_optional |= actual.is_optional;
            inner.is_implicitly_unwrapped_optional |= actual.is_implicitly_unwrapped_optional;
            actual = inner;
        }
        actual.is_optional |= reference.is_optional;
        actual.is_implicitly_unwrapped_optional |= reference.is_implicitly_unwrapped_optional;

        if actual.resolved().is_some() || actual.lookup_name().is_none() {
            return Some(actual);
        }
        if !self.report {
            return None;
        }

        // Final pass: an external body settles, a cyclic one does not
        let name = actual.lookup_name()?.to_string();
        match self.lookup.lookup(&name, &alias_scope, diagnostics, site) {
            Lookup::Alias(_) => None,
            _ => Some(actual),
        }
    }

    fn bind_generics(&self, type_name: &mut TypeName, id: DeclId) {
        if !type_name.is_generic() {
            return;
        }
        if let Some(decl) = self.snapshot.decls.get(id.index()) {
            if !decl.generic_parameters.is_empty() {
                type_name.bind_generic_parameters(&decl.generic_parameters);
            }
        }
    }
}

fn fill_composed_types(declarations: &mut [Declaration]) {
    for decl in declarations.iter_mut() {
        if let TypeKind::ProtocolComposition(ref mut details) = decl.kind {
            let ids: Vec<DeclId> = details
                .composed_type_names
                .iter()
                .filter_map(TypeName::resolved)
                .collect();
            details.set_composed_types(ids);
        }
    }
}

//! Registry construction
//!
//! Sequential passes over the lowered files, in input order:
//! 1. note which identities have a primary declaration
//! 2. key every extension to the identity it extends; types and aliases
//!    nested in an extension move under that identity
//! 3. register or merge every fragment, then link parents, nested types,
//!    aliases and `defined_in`
//!
//! Grouping depends only on input file order, never on hash order.

use ahash::{AHashMap, AHashSet};
use tracing::{debug, warn};

use super::lowering::{lower_files, LoweredAlias, LoweredFile, LoweredType};
use crate::errors::Result;
use crate::features::declaration::domain::{AliasLinks, DeclLinks};
use crate::features::declaration::{
    Alias, Declaration, ExtensionRecord, FileParseResult, TypeFragment, TypeKind,
};
use crate::features::registry::domain::{Registry, SymbolTable};
use crate::shared::models::{
    merge_annotations, AliasId, DeclId, Diagnostic, DiagnosticKind, Diagnostics,
};

type IdentityKey = (Option<String>, String);

pub struct RegistryBuilder {
    declarations: Vec<Declaration>,
    /// Whether a non-extension fragment established the node
    has_primary: Vec<bool>,
    type_index: AHashMap<IdentityKey, DeclId>,

    aliases: Vec<Alias>,
    alias_index: AHashMap<IdentityKey, AliasId>,

    /// Identities with a primary declaration anywhere in the input
    primary_keys: AHashSet<IdentityKey>,
    /// Global name → modules declaring it as a primary, first-seen order
    primary_modules: AHashMap<String, Vec<Option<String>>>,

    symbols: SymbolTable,
    diagnostics: Diagnostics,
}

impl RegistryBuilder {
    fn new() -> Self {
        Self {
            declarations: Vec::new(),
            has_primary: Vec::new(),
            type_index: AHashMap::new(),
            aliases: Vec::new(),
            alias_index: AHashMap::new(),
            primary_keys: AHashSet::new(),
            primary_modules: AHashMap::new(),
            symbols: SymbolTable::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Build the registry from every file's parse result.
    ///
    /// Fails only on contract violations (a fragment with an empty name);
    /// conflicts in the input become diagnostics.
    pub fn build(files: &[FileParseResult]) -> Result<Registry> {
        let mut lowered = lower_files(files)?;
        let mut builder = Self::new();

        for file in &lowered {
            if let Some(ref module) = file.module_name {
                builder.symbols.insert_module(module);
            }
            for (ty, inside) in file.types.iter().zip(extension_membership(file)) {
                if !inside {
                    builder.note_primary(ty);
                }
            }
        }

        for file in &mut lowered {
            builder.reroot(file);
        }

        let mut functions = Vec::new();
        for file in lowered {
            for ty in file.types {
                builder.register_type(ty);
            }
            for alias in file.aliases {
                builder.register_alias(alias);
            }
            functions.extend(file.functions);
        }

        builder.link();

        debug!(
            "Registry built: {} declarations, {} aliases, {} functions, {} diagnostics",
            builder.declarations.len(),
            builder.aliases.len(),
            functions.len(),
            builder.diagnostics.len()
        );

        Ok(Registry {
            declarations: builder.declarations,
            aliases: builder.aliases,
            functions,
            symbols: builder.symbols,
            diagnostics: builder.diagnostics,
            file_count: files.len(),
        })
    }

    fn note_primary(&mut self, ty: &LoweredType) {
        let key = (ty.module_name.clone(), ty.global_name.clone());
        if self.primary_keys.insert(key) {
            self.primary_modules
                .entry(ty.global_name.clone())
                .or_default()
                .push(ty.module_name.clone());
        }
    }

    /// Identity an extension attaches to.
    ///
    /// `extension Other.Foo` targets module `Other`. A bare name targets
    /// the own module's primary when there is one, else the first module
    /// that declares a primary with that name, else stays in the own
    /// module as an extension-only node.
    fn extension_key(&self, ty: &LoweredType) -> IdentityKey {
        if let Some((module, rest)) = self.symbols.strip_module(&ty.global_name) {
            if ty.module_name.as_deref() != Some(module) {
                return (Some(module.to_string()), rest.to_string());
            }
        }

        let own = (ty.module_name.clone(), ty.global_name.clone());
        if self.primary_keys.contains(&own) {
            return own;
        }
        match self
            .primary_modules
            .get(&ty.global_name)
            .and_then(|modules| modules.first())
        {
            Some(module) => (module.clone(), ty.global_name.clone()),
            None => own,
        }
    }

    /// Rewrite identities inside extensions, in pre-order. A root
    /// extension takes its `extension_key`; everything below it is keyed
    /// under its parent's new identity.
    fn reroot(&mut self, file: &mut LoweredFile) {
        let in_extension = extension_membership(file);
        let mut keys: Vec<IdentityKey> = Vec::with_capacity(file.types.len());

        for (index, ty) in file.types.iter_mut().enumerate() {
            let key = match ty.parent {
                None if ty.fragment.is_extension => self.extension_key(ty),
                Some(parent) if in_extension[index] => {
                    let (ref module, ref scope) = keys[parent];
                    (module.clone(), format!("{}.{}", scope, ty.fragment.name))
                }
                _ => (ty.module_name.clone(), ty.global_name.clone()),
            };

            if in_extension[index] {
                ty.module_name = key.0.clone();
                ty.global_name = key.1.clone();
                if ty.parent.is_some() && !ty.fragment.is_extension {
                    self.note_primary(ty);
                }
            }
            keys.push(key);
        }

        for alias in &mut file.aliases {
            let Some(parent) = alias.parent else {
                continue;
            };
            if in_extension[parent] {
                let (ref module, ref scope) = keys[parent];
                alias.module_name = module.clone();
                alias.global_name = format!("{}.{}", scope, alias.fragment.name);
            }
        }
    }

    fn register_type(&mut self, ty: LoweredType) {
        let key = (ty.module_name.clone(), ty.global_name.clone());

        let Some(&id) = self.type_index.get(&key) else {
            let id = DeclId::from_index(self.declarations.len());
            let is_primary = !ty.fragment.is_extension;
            let declaration = new_declaration(id, key.0.clone(), key.1.clone(), ty);
            self.symbols.insert_type(&declaration.global_name, id);
            self.type_index.insert(key, id);
            self.declarations.push(declaration);
            self.has_primary.push(is_primary);
            return;
        };

        let index = id.index();
        if !ty.fragment.is_extension {
            if self.has_primary[index] {
                let existing = &self.declarations[index];
                warn!(
                    "Duplicate declaration of {} in {} (keeping {})",
                    existing.global_name, ty.file, existing.file
                );
                self.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::StructuralConflict,
                        existing.global_name.clone(),
                        format!(
                            "duplicate declaration of `{}`; keeping the one from {}",
                            existing.global_name, existing.file
                        ),
                    )
                    .with_file(ty.file),
                );
                return;
            }
            promote(&mut self.declarations[index], ty);
            self.has_primary[index] = true;
            return;
        }

        merge_extension(&mut self.declarations[index], &ty.fragment, &ty.file);
    }

    fn register_alias(&mut self, lowered: LoweredAlias) {
        let key = (lowered.module_name.clone(), lowered.global_name.clone());

        if let Some(&id) = self.alias_index.get(&key) {
            let existing = &mut self.aliases[id.index()];
            let incoming = &lowered.fragment;
            if existing.type_name == incoming.type_name
                && existing.generic_parameters == incoming.generic_parameters
            {
                return;
            }

            warn!(
                "Alias {} redeclared in {} with a different target",
                existing.global_name, lowered.file
            );
            self.diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::StructuralConflict,
                    existing.global_name.clone(),
                    format!(
                        "typealias `{}` redeclared as `{}` (was `{}`)",
                        existing.global_name,
                        incoming.type_name.as_source(),
                        existing.type_name.as_source()
                    ),
                )
                .with_file(lowered.file.clone()),
            );
            existing.type_name = incoming.type_name.clone();
            existing.generic_parameters = incoming.generic_parameters.clone();
            existing.access_level = incoming.access_level;
            existing.annotations = incoming.annotations.clone();
            existing.file = lowered.file;
            return;
        }

        let id = AliasId::from_index(self.aliases.len());
        let fragment = lowered.fragment;
        self.symbols.insert_alias(&lowered.global_name, id);
        self.alias_index.insert(key, id);
        self.aliases.push(Alias {
            name: fragment.name,
            global_name: lowered.global_name,
            module_name: lowered.module_name,
            type_name: fragment.type_name,
            generic_parameters: fragment.generic_parameters,
            access_level: fragment.access_level,
            annotations: fragment.annotations,
            file: lowered.file,
            links: AliasLinks {
                id,
                parent: None,
            },
        });
    }

    /// Parent / nested links from the scope path, then `defined_in`
    fn link(&mut self) {
        for index in 0..self.declarations.len() {
            let (module, global_name) = {
                let decl = &self.declarations[index];
                (decl.module_name.clone(), decl.global_name.clone())
            };
            let Some((scope, _)) = global_name.rsplit_once('.') else {
                continue;
            };
            if let Some(&parent) = self.type_index.get(&(module, scope.to_string())) {
                let child = DeclId::from_index(index);
                self.declarations[index].links.parent = Some(parent);
                self.declarations[parent.index()]
                    .links
                    .contained_types
                    .push(child);
            }
        }

        for index in 0..self.aliases.len() {
            let alias = &self.aliases[index];
            let Some((scope, _)) = alias.global_name.rsplit_once('.') else {
                continue;
            };
            let key = (alias.module_name.clone(), scope.to_string());
            if let Some(&parent) = self.type_index.get(&key) {
                let id = AliasId::from_index(index);
                self.aliases[index].links.parent = Some(parent);
                self.declarations[parent.index()].links.typealiases.push(id);
            }
        }

        for decl in &mut self.declarations {
            let id = decl.links.id;
            decl.variables.iter_mut().for_each(|v| v.set_defined_in(id));
            decl.methods.iter_mut().for_each(|m| m.set_defined_in(id));
            decl.subscripts.iter_mut().for_each(|s| s.set_defined_in(id));
            if let TypeKind::Enum(ref mut details) = decl.kind {
                details.cases.iter_mut().for_each(|c| c.set_defined_in(id));
            }
        }
    }
}

fn new_declaration(
    id: DeclId,
    module_name: Option<String>,
    global_name: String,
    ty: LoweredType,
) -> Declaration {
    let LoweredType { fragment, file, .. } = ty;
    let name = global_name
        .rsplit_once('.')
        .map(|(_, last)| last.to_string())
        .unwrap_or_else(|| global_name.clone());

    let extensions = if fragment.is_extension {
        vec![extension_record(&fragment, &file)]
    } else {
        Vec::new()
    };

    Declaration {
        name,
        global_name,
        module_name,
        access_level: fragment.access_level,
        is_extension: fragment.is_extension,
        kind: fragment.kind,
        inherited_type_names: dedup_names(fragment.inherited_type_names),
        generic_parameters: fragment.generic_parameters,
        modifiers: fragment.modifiers,
        variables: dedup(fragment.variables),
        methods: dedup(fragment.methods),
        subscripts: dedup(fragment.subscripts),
        annotations: fragment.annotations,
        extensions,
        file,
        links: DeclLinks {
            id,
            ..Default::default()
        },
    }
}

/// Whether each lowered type is an extension or sits inside one
fn extension_membership(file: &LoweredFile) -> Vec<bool> {
    let mut inside: Vec<bool> = Vec::with_capacity(file.types.len());
    for ty in &file.types {
        let parent_inside = ty.parent.map(|p| inside[p]).unwrap_or(false);
        inside.push(parent_inside || ty.fragment.is_extension);
    }
    inside
}

fn extension_record(fragment: &TypeFragment, file: &str) -> ExtensionRecord {
    ExtensionRecord {
        file: file.to_string(),
        inherited_type_names: fragment.inherited_type_names.clone(),
        annotations: fragment.annotations.clone(),
    }
}

fn merge_extension(target: &mut Declaration, fragment: &TypeFragment, file: &str) {
    for variable in &fragment.variables {
        push_unique(&mut target.variables, variable.clone());
    }
    for method in &fragment.methods {
        push_unique(&mut target.methods, method.clone());
    }
    for subscript in &fragment.subscripts {
        push_unique(&mut target.subscripts, subscript.clone());
    }
    for name in &fragment.inherited_type_names {
        push_unique(&mut target.inherited_type_names, name.clone());
    }
    merge_annotations(&mut target.annotations, &fragment.annotations);

    let record = extension_record(fragment, file);
    if !target.extensions.contains(&record) {
        target.extensions.push(record);
    }
}

/// An extension-only node meets its primary: primary content goes first,
/// previously merged extension content follows
fn promote(target: &mut Declaration, ty: LoweredType) {
    let LoweredType { fragment, file, .. } = ty;

    let extension_variables = std::mem::replace(&mut target.variables, dedup(fragment.variables));
    let extension_methods = std::mem::replace(&mut target.methods, dedup(fragment.methods));
    let extension_subscripts =
        std::mem::replace(&mut target.subscripts, dedup(fragment.subscripts));
    let extension_names = std::mem::replace(
        &mut target.inherited_type_names,
        dedup_names(fragment.inherited_type_names),
    );

    for variable in extension_variables {
        push_unique(&mut target.variables, variable);
    }
    for method in extension_methods {
        push_unique(&mut target.methods, method);
    }
    for subscript in extension_subscripts {
        push_unique(&mut target.subscripts, subscript);
    }
    for name in extension_names {
        push_unique(&mut target.inherited_type_names, name);
    }

    let mut annotations = fragment.annotations;
    merge_annotations(&mut annotations, &target.annotations);
    target.annotations = annotations;

    target.kind = fragment.kind;
    target.is_extension = false;
    target.access_level = fragment.access_level;
    target.generic_parameters = fragment.generic_parameters;
    target.modifiers = fragment.modifiers;
    target.file = file;
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        push_unique(&mut out, item);
    }
    out
}

fn dedup_names(names: Vec<String>) -> Vec<String> {
    dedup(names)
}

//! Declaration-level snapshot comparison
//!
//! Content equality ignores arena links, so two snapshots built from the
//! same input compare equal even if their id layouts differ. Accepted
//! inheritance edges are compared by target name for the same reason.

use ahash::AHashMap;

use crate::features::declaration::Declaration;
use crate::features::diff::domain::{DeclarationChange, GraphDiff};

pub fn diff_declarations(before: &[Declaration], after: &[Declaration]) -> GraphDiff {
    let old_by_name = by_qualified_name(before);
    let new_by_name = by_qualified_name(after);
    let mut diff = GraphDiff::new();

    for decl in after {
        let name = decl.qualified_name();
        match old_by_name.get(name.as_str()) {
            None => diff.added.push(name),
            Some(old) => {
                let fields = changed_fields(old, before, decl, after);
                if !fields.is_empty() {
                    diff.changed.push(DeclarationChange { name, fields });
                }
            }
        }
    }

    for decl in before {
        let name = decl.qualified_name();
        if !new_by_name.contains_key(name.as_str()) {
            diff.removed.push(name);
        }
    }

    diff
}

fn by_qualified_name(decls: &[Declaration]) -> AHashMap<String, &Declaration> {
    let mut map = AHashMap::with_capacity(decls.len());
    for decl in decls {
        map.entry(decl.qualified_name()).or_insert(decl);
    }
    map
}

fn changed_fields(
    old: &Declaration,
    old_arena: &[Declaration],
    new: &Declaration,
    new_arena: &[Declaration],
) -> Vec<&'static str> {
    let mut fields = Vec::new();
    macro_rules! compare {
        ($($field:ident),*) => {
            $(
                if old.$field != new.$field {
                    fields.push(stringify!($field));
                }
            )*
        };
    }
    compare!(
        access_level,
        is_extension,
        kind,
        inherited_type_names,
        generic_parameters,
        modifiers,
        variables,
        methods,
        subscripts,
        annotations,
        extensions,
        file
    );

    if accepted_parents(old, old_arena) != accepted_parents(new, new_arena) {
        fields.push("inherited_types");
    }
    fields
}

fn accepted_parents(decl: &Declaration, arena: &[Declaration]) -> Vec<String> {
    decl.inherited_types()
        .iter()
        .filter_map(|id| arena.get(id.index()))
        .map(Declaration::qualified_name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolutionConfig;
    use crate::features::declaration::{FileParseResult, Method, TypeFragment};
    use crate::features::registry::RegistryBuilder;
    use crate::features::resolution::ResolutionEngine;
    use crate::shared::models::Modifier;
    use pretty_assertions::assert_eq;

    fn resolve(file: FileParseResult) -> Vec<Declaration> {
        let registry = RegistryBuilder::build(&[file]).unwrap();
        ResolutionEngine::new(&ResolutionConfig::default())
            .resolve(registry)
            .into_registry()
            .declarations
    }

    #[test]
    fn test_identical_snapshots_have_no_diff() {
        let file = FileParseResult::new("A.swift")
            .in_module("App")
            .with_type(TypeFragment::class("A"))
            .with_type(TypeFragment::class("B").inheriting("A"));

        let diff = diff_declarations(&resolve(file.clone()), &resolve(file));
        assert!(diff.is_empty());
    }

    #[test]
    fn test_added_removed_and_changed() {
        let before = FileParseResult::new("A.swift")
            .in_module("App")
            .with_type(TypeFragment::class("A"))
            .with_type(TypeFragment::struct_("Gone"));
        let after = FileParseResult::new("A.swift")
            .in_module("App")
            .with_type(TypeFragment::class("A").with_method(Method::new("run")))
            .with_type(TypeFragment::struct_("New"));

        let diff = diff_declarations(&resolve(before), &resolve(after));

        assert_eq!(diff.added, vec!["App.New".to_string()]);
        assert_eq!(diff.removed, vec!["App.Gone".to_string()]);
        assert_eq!(
            diff.changed,
            vec![DeclarationChange {
                name: "App.A".to_string(),
                fields: vec!["methods"],
            }]
        );
    }

    #[test]
    fn test_newly_resolved_parent_is_a_change() {
        let before = FileParseResult::new("A.swift")
            .in_module("App")
            .with_type(TypeFragment::class("B").inheriting("A"));
        let after = before.clone().with_type(TypeFragment::class("A"));

        let diff = diff_declarations(&resolve(before), &resolve(after));

        assert_eq!(diff.added, vec!["App.A".to_string()]);
        assert_eq!(diff.changed.len(), 1);
        assert_eq!(diff.changed[0].fields, vec!["inherited_types"]);
    }

    #[test]
    fn test_modifier_change_is_reported() {
        let before = FileParseResult::new("A.swift")
            .in_module("App")
            .with_type(TypeFragment::class("A").with_method(Method::new("run()")));
        let after = FileParseResult::new("A.swift").in_module("App").with_type(
            TypeFragment::class("A")
                .with_modifier(Modifier::new("final"))
                .with_method(Method::new("run()").with_modifier(Modifier::new("final"))),
        );

        let diff = diff_declarations(&resolve(before), &resolve(after));

        assert_eq!(diff.changed.len(), 1);
        assert_eq!(diff.changed[0].fields, vec!["modifiers", "methods"]);
    }
}

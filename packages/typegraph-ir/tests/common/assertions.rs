//! Custom assertions for test verification

use typegraph_ir::{DeclId, DiagnosticKind, TypeGraph, TypeName};

/// Global names of the given declarations, in order
pub fn names(graph: &TypeGraph, ids: &[DeclId]) -> Vec<String> {
    ids.iter()
        .map(|id| {
            graph
                .get(*id)
                .map(|d| d.global_name.clone())
                .unwrap_or_else(|| format!("<missing {}>", id))
        })
        .collect()
}

/// Type of `owner.field`
pub fn field_type<'g>(graph: &'g TypeGraph, owner: &str, field: &str) -> &'g TypeName {
    let decl = graph
        .find(owner)
        .unwrap_or_else(|| panic!("no declaration named {}", owner));
    &decl
        .variables
        .iter()
        .find(|v| v.name == field)
        .unwrap_or_else(|| panic!("{} has no field {}", owner, field))
        .type_name
}

/// Assert that `owner.field` resolved to the declaration named `target`
pub fn assert_field_resolves_to(graph: &TypeGraph, owner: &str, field: &str, target: &str) {
    let expected = graph
        .find(target)
        .unwrap_or_else(|| panic!("no declaration named {}", target))
        .id();
    assert_eq!(
        field_type(graph, owner, field).resolved(),
        Some(expected),
        "Expected {}.{} to resolve to {}",
        owner,
        field,
        target
    );
}

/// Assert the number of diagnostics of one kind
pub fn assert_diagnostic_count(graph: &TypeGraph, kind: DiagnosticKind, expected: usize) {
    let found: Vec<_> = graph.diagnostics().iter().filter(|d| d.kind == kind).collect();
    assert_eq!(
        found.len(),
        expected,
        "Expected {expected} {kind} diagnostics, got: {:?}",
        found
    );
}

//! End-to-end properties of the type graph pipeline
//!
//! Each test builds a small source set through `build_type_graph` and
//! checks one observable guarantee of the resolved snapshot.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use typegraph_ir::{
    AliasFragment, DiagnosticKind, FileParseResult, IndexQueryError, Method, ResolutionConfig,
    TypeFragment, TypeName,
};

#[test]
fn test_duplicate_declaration_merges_idempotently() {
    let fragment = || {
        TypeFragment::struct_("D")
            .inheriting("Equatable")
            .with_variable(field("id", "Int"))
            .with_method(Method::new("reset"))
    };
    let once = GraphFixture::new().with_types("D.swift", vec![fragment()]).build();
    let twice = GraphFixture::new()
        .with_types("D.swift", vec![fragment()])
        .with_types("D+Copy.swift", vec![fragment()])
        .build();

    assert_eq!(once.declarations(), twice.declarations());
    assert_diagnostic_count(&once, DiagnosticKind::StructuralConflict, 0);
    assert_diagnostic_count(&twice, DiagnosticKind::StructuralConflict, 1);
}

#[test]
fn test_extension_merges_into_primary() {
    let graph = GraphFixture::new()
        .with_types("Foo.swift", vec![TypeFragment::class("Foo").inheriting("Bar")])
        .with_types(
            "Foo+Baz.swift",
            vec![TypeFragment::extension("Foo")
                .inheriting("Baz")
                .with_method(Method::new("m"))],
        )
        .build();

    assert_eq!(graph.declarations().len(), 1);
    let foo = graph.find("Foo").unwrap();
    assert_eq!(foo.inherited_type_names, vec!["Bar".to_string(), "Baz".to_string()]);
    assert_eq!(foo.methods.len(), 1);
    assert_eq!(foo.methods[0].name, "m");
    assert!(!foo.is_extension);
    assert_eq!(foo.extensions.len(), 1);
    assert_eq!(foo.extensions[0].file, "Foo+Baz.swift");
}

#[test]
fn test_alias_indirection_resolves_to_target() {
    let graph = GraphFixture::new()
        .with_file(
            FileParseResult::new("Alias.swift")
                .in_module("App")
                .with_alias(AliasFragment::new("A", TypeName::new("B")))
                .with_type(TypeFragment::struct_("B"))
                .with_type(TypeFragment::struct_("Holder").with_variable(field("value", "A"))),
        )
        .build();

    assert_field_resolves_to(&graph, "Holder", "value", "B");
    let value = field_type(&graph, "Holder", "value");
    assert_eq!(value.actual_type_name().map(|t| t.name.as_str()), Some("B"));
    assert!(graph.diagnostics().is_empty());
}

#[test]
fn test_reference_cycle_terminates() {
    let graph = GraphFixture::new()
        .with_types(
            "Cycle.swift",
            vec![
                TypeFragment::struct_("A").with_variable(field("b", "B")),
                TypeFragment::struct_("B").with_variable(field("c", "C")),
                TypeFragment::struct_("C").with_variable(field("a", "A")),
            ],
        )
        .build();

    assert!(graph.stats().converged);
    assert_field_resolves_to(&graph, "A", "b", "B");
    assert_field_resolves_to(&graph, "B", "c", "C");
    assert_field_resolves_to(&graph, "C", "a", "A");
    assert!(graph.diagnostics().is_empty());
}

#[test]
fn test_inheritance_cycle_is_broken() {
    let graph = GraphFixture::new()
        .with_types(
            "Cycle.swift",
            vec![
                TypeFragment::class("A").inheriting("C"),
                TypeFragment::class("B").inheriting("A"),
                TypeFragment::class("C").inheriting("B"),
            ],
        )
        .build();

    assert!(graph.stats().converged);
    assert_diagnostic_count(&graph, DiagnosticKind::InheritanceCycle, 1);
    assert!(graph.find("C").unwrap().inherited_types().is_empty());

    let indexes = graph.indexes();
    assert!(indexes.direct_subtypes("B").is_empty());
    assert_eq!(names(&graph, indexes.direct_subtypes("C")), vec!["A"]);
    assert_eq!(names(&graph, indexes.based_on("A")), vec!["B"]);
    assert!(indexes.inheriting("B").unwrap().is_empty());
    assert_eq!(names(&graph, indexes.inheriting("C").unwrap()), vec!["A", "B"]);
}

#[test]
fn test_type_nested_in_cross_module_extension_resolves() {
    let graph = GraphFixture::new()
        .with_file(
            FileParseResult::new("Core/User.swift")
                .in_module("Core")
                .with_type(TypeFragment::struct_("User")),
        )
        .with_file(
            FileParseResult::new("App/User+Row.swift").in_module("App").with_type(
                TypeFragment::extension("User")
                    .with_nested(TypeFragment::struct_("Row"))
                    .with_variable(field("row", "Row")),
            ),
        )
        .build();

    assert_diagnostic_count(&graph, DiagnosticKind::UnresolvedReference, 0);
    assert_field_resolves_to(&graph, "User", "row", "Core.User.Row");
    let row = graph.find("Core.User.Row").unwrap();
    assert_eq!(row.parent(), Some(graph.find("User").unwrap().id()));
}

#[test]
fn test_unknown_type_stays_unresolved() {
    let graph = GraphFixture::new()
        .with_types(
            "Model.swift",
            vec![TypeFragment::struct_("Model").with_variable(field("thing", "ExternalThing"))],
        )
        .build();

    assert_eq!(field_type(&graph, "Model", "thing").resolved(), None);
    assert_diagnostic_count(&graph, DiagnosticKind::UnresolvedReference, 1);
    let diagnostic = &graph.diagnostics()[0];
    assert_eq!(diagnostic.subject, "ExternalThing");
    assert_eq!(diagnostic.site.as_deref(), Some("Model.thing"));
    assert_eq!(graph.stats().unresolved, 1);
}

#[test]
fn test_transitive_and_direct_subtype_indexes() {
    let graph = GraphFixture::new()
        .with_types(
            "Chain.swift",
            vec![
                TypeFragment::class("A"),
                TypeFragment::class("B").inheriting("A"),
                TypeFragment::class("C").inheriting("B"),
            ],
        )
        .build();
    let indexes = graph.indexes();

    assert_eq!(names(&graph, indexes.based_on("A")), vec!["B", "C"]);
    assert_eq!(names(&graph, indexes.direct_subtypes("A")), vec!["B"]);
    assert_eq!(names(&graph, indexes.inheriting("A").unwrap()), vec!["B", "C"]);
    assert_eq!(
        indexes.implementing("A"),
        Err(IndexQueryError::NotAProtocol("A".to_string()))
    );
}

#[test]
fn test_composition_flattening() {
    let graph = GraphFixture::new()
        .with_types(
            "Protocols.swift",
            vec![
                TypeFragment::protocol("S"),
                TypeFragment::protocol("Q").inheriting("S"),
                TypeFragment::protocol("R"),
                TypeFragment::composition("P", vec![TypeName::new("Q"), TypeName::new("R")]),
                TypeFragment::struct_("X").inheriting("Q"),
            ],
        )
        .build();
    let indexes = graph.indexes();

    assert_eq!(names(&graph, indexes.composed_protocols("P")), vec!["Q", "R"]);
    let based_on_s = names(&graph, indexes.based_on("S"));
    assert!(based_on_s.contains(&"Q".to_string()));
    assert!(based_on_s.contains(&"X".to_string()));
    assert_eq!(names(&graph, indexes.implementing("S").unwrap()), vec!["Q", "P", "X"]);
    assert_eq!(names(&graph, indexes.direct_conformers("Q")), vec!["X"]);
}

#[test]
fn test_composition_cycle_is_diagnosed() {
    let graph = GraphFixture::new()
        .with_types(
            "Protocols.swift",
            vec![
                TypeFragment::protocol("R"),
                TypeFragment::composition("P", vec![TypeName::new("Q"), TypeName::new("R")]),
                TypeFragment::composition("Q", vec![TypeName::new("P")]),
            ],
        )
        .build();

    assert_eq!(names(&graph, graph.indexes().composed_protocols("P")), vec!["R"]);
    assert!(graph
        .diagnostics()
        .iter()
        .any(|d| d.kind == DiagnosticKind::CompositionCycle));
}

#[test]
fn test_repeated_builds_are_identical() {
    let fixture = GraphFixture::new()
        .with_types(
            "A.swift",
            vec![
                TypeFragment::protocol("Drawable"),
                TypeFragment::class("Shape").inheriting("Drawable"),
                TypeFragment::class("Circle")
                    .inheriting("Shape")
                    .with_variable(field("radius", "Double"))
                    .with_variable(field("missing", "Unknown")),
            ],
        )
        .with_types("B.swift", vec![TypeFragment::extension("Circle").inheriting("Hashable")]);

    let first = fixture.build();
    let second = fixture.build();

    assert_eq!(first.declarations(), second.declarations());
    assert_eq!(first.indexes(), second.indexes());
    assert_eq!(first.diagnostics(), second.diagnostics());
}

#[test]
fn test_strict_mode_fails_on_diagnostics() {
    let graph = GraphFixture::new()
        .with_config(ResolutionConfig::default().strict(true))
        .with_types(
            "Model.swift",
            vec![TypeFragment::struct_("Model").with_variable(field("thing", "ExternalThing"))],
        )
        .build();

    assert!(graph.check_strict().is_err());
}

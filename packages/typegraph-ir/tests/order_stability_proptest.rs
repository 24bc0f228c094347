//! Property-based tests for the type graph pipeline
//!
//! Invariants that should hold for ALL generated source sets:
//! - Stability: two builds of the same input are identical
//! - Idempotence: feeding every file twice yields the same declarations
//! - Termination: arbitrary (cyclic) inheritance always converges
//! - Index consistency: every direct edge also appears transitively

mod common;

use common::*;
use proptest::prelude::*;
use typegraph_ir::{FileParseResult, TypeFragment};

#[derive(Debug, Clone)]
struct TypeSpec {
    is_protocol: bool,
    parents: Vec<usize>,
    fields: Vec<usize>,
}

fn type_specs() -> impl Strategy<Value = Vec<TypeSpec>> {
    (1usize..10).prop_flat_map(|count| {
        prop::collection::vec(
            (
                any::<bool>(),
                prop::collection::vec(0..count + 2, 0..3),
                prop::collection::vec(0..count + 2, 0..3),
            )
                .prop_map(|(is_protocol, parents, fields)| TypeSpec {
                    is_protocol,
                    parents,
                    fields,
                }),
            count,
        )
    })
}

/// Index `i` names `T{i}`; indices past the end name types nobody declares
fn files_for(specs: &[TypeSpec]) -> Vec<FileParseResult> {
    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let name = format!("T{}", i);
            let mut fragment = if spec.is_protocol {
                TypeFragment::protocol(name.as_str())
            } else {
                TypeFragment::class(name.as_str())
            };
            for parent in &spec.parents {
                fragment = fragment.inheriting(format!("T{}", parent));
            }
            for (n, target) in spec.fields.iter().enumerate() {
                fragment = fragment.with_variable(field(&format!("f{}", n), &format!("T{}", target)));
            }
            FileParseResult::new(format!("T{}.swift", i))
                .in_module("App")
                .with_type(fragment)
        })
        .collect()
}

fn fixture(files: Vec<FileParseResult>) -> GraphFixture {
    files
        .into_iter()
        .fold(GraphFixture::new(), |fixture, file| fixture.with_file(file))
}

proptest! {
    #[test]
    fn prop_repeated_builds_are_identical(specs in type_specs()) {
        let fixture = fixture(files_for(&specs));
        let first = fixture.build();
        let second = fixture.build();

        prop_assert_eq!(first.declarations(), second.declarations());
        prop_assert_eq!(first.indexes(), second.indexes());
        prop_assert_eq!(first.diagnostics(), second.diagnostics());
    }

    #[test]
    fn prop_duplicate_files_do_not_change_declarations(specs in type_specs()) {
        let files = files_for(&specs);
        let once = fixture(files.clone()).build();
        let twice = fixture(files.iter().cloned().chain(files.iter().cloned()).collect()).build();

        prop_assert_eq!(once.declarations(), twice.declarations());
    }

    #[test]
    fn prop_resolution_converges(specs in type_specs()) {
        let graph = fixture(files_for(&specs)).build();

        prop_assert!(graph.stats().converged);
        prop_assert_eq!(graph.declarations().len(), specs.len());
    }

    #[test]
    fn prop_direct_edges_are_transitive(specs in type_specs()) {
        let graph = fixture(files_for(&specs)).build();
        let indexes = graph.indexes();

        for decl in graph.declarations() {
            for parent in decl.inherited_types() {
                let parent_name = &graph.get(*parent).unwrap().global_name;
                prop_assert!(indexes.based_on(parent_name).contains(&decl.id()));
            }
        }
    }
}

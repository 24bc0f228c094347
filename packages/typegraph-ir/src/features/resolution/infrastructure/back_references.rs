//! Back-reference population
//!
//! Turns resolved inheritance clauses into graph edges: the parent goes
//! into the child's `inherited_types`, the child into the parent's
//! `direct_subtypes`.
//!
//! Class-like inheritance must stay acyclic. Edges between non-protocol
//! declarations are added to a petgraph `DiGraph` (child → parent) in
//! registration order; an edge whose target already reaches the child
//! would close a cycle and is rejected with an `InheritanceCycle`
//! diagnostic. Protocol edges are never checked (protocol cycles are legal).

use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::warn;

use crate::features::declaration::Declaration;
use crate::shared::models::{DeclId, Diagnostic, DiagnosticKind, Diagnostics};

pub(crate) fn populate_back_references(
    declarations: &mut [Declaration],
    diagnostics: &mut Diagnostics,
) {
    for decl in declarations.iter_mut() {
        decl.links.inherited_types.clear();
        decl.links.direct_subtypes.clear();
    }

    let mut graph: DiGraph<DeclId, ()> = DiGraph::with_capacity(declarations.len(), 0);
    let nodes: Vec<NodeIndex> = declarations
        .iter()
        .map(|decl| graph.add_node(decl.id()))
        .collect();

    let protocol_like: Vec<bool> = declarations.iter().map(Declaration::is_protocol_like).collect();
    let mut accepted: Vec<(DeclId, DeclId)> = Vec::new();

    for decl in declarations.iter() {
        let child = decl.id();
        for (index, target) in decl.links.inherited_resolution.iter().enumerate() {
            let Some(parent) = *target else {
                continue;
            };
            if parent.index() >= declarations.len() {
                continue;
            }

            let checked = parent == child
                || (!protocol_like[child.index()] && !protocol_like[parent.index()]);
            if checked {
                let closes_cycle = parent == child
                    || has_path_connecting(&graph, nodes[parent.index()], nodes[child.index()], None);
                if closes_cycle {
                    let written = decl
                        .inherited_type_names
                        .get(index)
                        .map(String::as_str)
                        .unwrap_or("?");
                    warn!(
                        "Inheritance cycle: {} inherits {}; edge dropped",
                        decl.global_name, written
                    );
                    diagnostics.push_unique(
                        Diagnostic::new(
                            DiagnosticKind::InheritanceCycle,
                            decl.global_name.clone(),
                            format!(
                                "`{}` inheriting `{}` closes an inheritance cycle; edge dropped",
                                decl.global_name, written
                            ),
                        )
                        .with_file(decl.file.clone()),
                    );
                    continue;
                }
                graph.add_edge(nodes[child.index()], nodes[parent.index()], ());
            }

            accepted.push((child, parent));
        }
    }

    for (child, parent) in accepted {
        let inherited = &mut declarations[child.index()].links.inherited_types;
        if !inherited.contains(&parent) {
            inherited.push(parent);
        }
        let subtypes = &mut declarations[parent.index()].links.direct_subtypes;
        if !subtypes.contains(&child) {
            subtypes.push(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::declaration::{FileParseResult, TypeFragment};
    use crate::features::registry::RegistryBuilder;

    fn registry_with_edges(
        fragments: Vec<TypeFragment>,
        edges: &[(usize, usize)],
    ) -> Vec<Declaration> {
        let mut file = FileParseResult::new("Cycle.swift");
        for fragment in fragments {
            file = file.with_type(fragment);
        }
        let mut declarations = RegistryBuilder::build(&[file]).unwrap().declarations;
        for decl in declarations.iter_mut() {
            let count = decl.inherited_type_names.len();
            decl.links.inherited_resolution = vec![None; count];
        }
        for (child, parent) in edges {
            let slot = declarations[*child]
                .links
                .inherited_resolution
                .iter_mut()
                .find(|s| s.is_none())
                .unwrap();
            *slot = Some(DeclId(*parent as u32));
        }
        declarations
    }

    #[test]
    fn test_class_cycle_edge_is_dropped() {
        let mut declarations = registry_with_edges(
            vec![
                TypeFragment::class("A").inheriting("C"),
                TypeFragment::class("B").inheriting("A"),
                TypeFragment::class("C").inheriting("B"),
            ],
            &[(0, 2), (1, 0), (2, 1)],
        );
        let mut diagnostics = Diagnostics::new();

        populate_back_references(&mut declarations, &mut diagnostics);

        assert_eq!(diagnostics.count_of(DiagnosticKind::InheritanceCycle), 1);
        assert_eq!(declarations[0].inherited_types(), &[DeclId(2)]);
        assert_eq!(declarations[1].inherited_types(), &[DeclId(0)]);
        assert!(declarations[2].inherited_types().is_empty());
        assert_eq!(declarations[0].direct_subtypes(), &[DeclId(1)]);
    }

    #[test]
    fn test_protocol_cycles_are_kept() {
        let mut declarations = registry_with_edges(
            vec![
                TypeFragment::protocol("P").inheriting("Q"),
                TypeFragment::protocol("Q").inheriting("P"),
            ],
            &[(0, 1), (1, 0)],
        );
        let mut diagnostics = Diagnostics::new();

        populate_back_references(&mut declarations, &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(declarations[0].inherited_types(), &[DeclId(1)]);
        assert_eq!(declarations[1].inherited_types(), &[DeclId(0)]);
    }
}

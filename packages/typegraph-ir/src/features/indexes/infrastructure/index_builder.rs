//! Index construction
//!
//! Transitive sets are computed per walk on the strongly connected
//! components of that walk's edge graph (petgraph `tarjan_scc`). Members
//! of one component share a key set. Components come out in reverse
//! topological order, so every successor set is complete before it is
//! merged into its predecessors, and a protocol cycle costs one visit.
//!
//! Inherited edges rejected by the cycle check are never followed.

use ahash::{AHashMap, AHashSet};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::BTreeMap;
use tracing::debug;

use crate::features::declaration::{Declaration, InheritedEdge};
use crate::features::indexes::domain::Indexes;
use crate::features::resolution::ResolvedGraph;
use crate::features::type_name::TypeName;
use crate::shared::models::{DeclId, Diagnostic, DiagnosticKind};

pub struct IndexBuilder;

/// Which edges a transitive walk follows and which keys it collects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    /// Every inheritance and composition edge
    Ancestors,
    /// Protocol-like ancestors, through superclasses and protocol inheritance
    Protocols,
    /// Superclass chain only
    ClassChain,
}

/// One outgoing edge of a walk
enum Step {
    /// Follow `id`; `collect` adds its own keys too
    Parent { id: DeclId, collect: bool },
    /// Unscanned name, contributes its written key
    External(String),
}

/// Index keys of every declaration.
///
/// The module-qualified name is always a key. The bare scope-qualified
/// name is a key only while no other module declares the same name.
struct KeyTable {
    keys: Vec<Vec<String>>,
}

impl KeyTable {
    fn new(decls: &[Declaration]) -> Self {
        let mut declared: AHashMap<&str, usize> = AHashMap::new();
        for decl in decls {
            *declared.entry(decl.global_name.as_str()).or_default() += 1;
        }

        let keys = decls
            .iter()
            .map(|decl| {
                let unique = declared.get(decl.global_name.as_str()).copied().unwrap_or(0) <= 1;
                let mut keys = Vec::with_capacity(2);
                if unique || decl.module_name.is_none() {
                    keys.push(decl.global_name.clone());
                }
                if decl.module_name.is_some() {
                    keys.push(decl.qualified_name());
                }
                keys
            })
            .collect();
        Self { keys }
    }

    fn of(&self, id: DeclId) -> &[String] {
        &self.keys[id.index()]
    }
}

fn steps(decls: &[Declaration], decl: &Declaration, walk: Walk) -> Vec<Step> {
    let mut out = Vec::new();
    match walk {
        Walk::ClassChain => {
            if !decl.is_class() {
                return out;
            }
            match decl.inherited_edges().next() {
                Some((_, InheritedEdge::Accepted(parent))) if decls[parent.index()].is_class() => {
                    out.push(Step::Parent {
                        id: parent,
                        collect: true,
                    });
                }
                Some((written, InheritedEdge::External)) => {
                    out.push(Step::External(written_key(written)));
                }
                _ => {}
            }
        }
        Walk::Ancestors | Walk::Protocols => {
            let inherited = decl
                .inherited_edges()
                .enumerate()
                .map(|(position, (written, edge))| (Some(position), written, edge));
            let composed = composition_edges(decl).map(|(written, edge)| (None, written, edge));

            for (position, written, edge) in inherited.chain(composed) {
                match edge {
                    InheritedEdge::Accepted(parent) => out.push(Step::Parent {
                        id: parent,
                        collect: walk == Walk::Ancestors
                            || decls[parent.index()].is_protocol_like(),
                    }),
                    InheritedEdge::External => {
                        let is_superclass = decl.is_class() && position == Some(0);
                        if walk == Walk::Ancestors || !is_superclass {
                            out.push(Step::External(written_key(written)));
                        }
                    }
                    InheritedEdge::Rejected(_) => {}
                }
            }
        }
    }
    out
}

/// Per-declaration result of one walk, shared across each component
struct TransitiveKeys {
    component_of: Vec<usize>,
    keys: Vec<Vec<String>>,
}

impl TransitiveKeys {
    fn compute(decls: &[Declaration], table: &KeyTable, walk: Walk) -> Self {
        let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(decls.len(), 0);
        let nodes: Vec<NodeIndex> = decls.iter().map(|_| graph.add_node(())).collect();
        let mut local: Vec<KeySet> = Vec::with_capacity(decls.len());

        for decl in decls {
            let mut own = KeySet::default();
            for step in steps(decls, decl, walk) {
                match step {
                    Step::Parent { id, collect } => {
                        if collect {
                            own.extend(table.of(id).iter().cloned());
                        }
                        graph.update_edge(nodes[decl.id().index()], nodes[id.index()], ());
                    }
                    Step::External(key) => own.push(key),
                }
            }
            local.push(own);
        }

        let components = tarjan_scc(&graph);
        let mut component_of = vec![0; decls.len()];
        for (component, members) in components.iter().enumerate() {
            for node in members {
                component_of[node.index()] = component;
            }
        }

        let mut keys: Vec<Vec<String>> = Vec::with_capacity(components.len());
        for (component, members) in components.iter().enumerate() {
            let mut set = KeySet::default();
            for node in members {
                set.extend(local[node.index()].items.iter().cloned());
                for successor in graph.neighbors(*node) {
                    let above = component_of[successor.index()];
                    if above != component {
                        set.extend(keys[above].iter().cloned());
                    }
                }
            }
            keys.push(set.into_vec());
        }

        Self { component_of, keys }
    }

    fn of(&self, id: DeclId) -> &[String] {
        &self.keys[self.component_of[id.index()]]
    }
}

/// Insertion-ordered string set
#[derive(Default)]
struct KeySet {
    seen: AHashSet<String>,
    items: Vec<String>,
}

impl KeySet {
    fn push(&mut self, key: String) {
        if self.seen.insert(key.clone()) {
            self.items.push(key);
        }
    }

    fn extend(&mut self, keys: impl IntoIterator<Item = String>) {
        for key in keys {
            self.push(key);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.items
    }
}

/// Unresolved inherited name as an index key: `Base<Int>` → `Base`
fn written_key(written: &str) -> String {
    TypeName::parse(written)
        .lookup_name()
        .map(str::to_string)
        .unwrap_or_else(|| written.to_string())
}

fn composition_edges(decl: &Declaration) -> impl Iterator<Item = (&str, InheritedEdge)> + '_ {
    decl.composed_type_names().iter().map(|member| {
        let edge = match member.resolved() {
            Some(id) => InheritedEdge::Accepted(id),
            None => InheritedEdge::External,
        };
        (member.name.as_str(), edge)
    })
}

fn push_value(map: &mut BTreeMap<String, Vec<DeclId>>, key: String, id: DeclId) {
    let values = map.entry(key).or_default();
    if !values.contains(&id) {
        values.push(id);
    }
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build all indexes from a resolved graph
    pub fn build_indexes(&self, graph: &ResolvedGraph) -> Indexes {
        let decls = graph.declarations();
        let table = KeyTable::new(decls);
        let mut indexes = Indexes::default();

        for decl in decls {
            if let Some(ref module) = decl.module_name {
                indexes.modules.insert(module.clone());
            }
        }

        self.build_kind_indexes(decls, &table, &mut indexes);
        self.build_transitive_indexes(decls, &table, &mut indexes);
        self.build_direct_indexes(decls, &table, &mut indexes);
        self.build_composition_index(decls, &table, &mut indexes);

        debug!(
            "Indexes built: {} declarations, {} based-on keys, {} compositions, {} diagnostics",
            indexes.all.len(),
            indexes.based.len(),
            indexes.composed.len(),
            indexes.diagnostics.len()
        );

        indexes
    }

    fn build_kind_indexes(&self, decls: &[Declaration], table: &KeyTable, indexes: &mut Indexes) {
        for decl in decls {
            let id = decl.id();
            indexes.all.push(id);
            indexes.by_kind.entry(decl.tag()).or_default().push(id);
            for key in table.of(id) {
                indexes.by_name.entry(key.clone()).or_insert(id);
                indexes.kind_of.entry(key.clone()).or_insert(decl.tag());
            }
        }
    }

    fn build_transitive_indexes(
        &self,
        decls: &[Declaration],
        table: &KeyTable,
        indexes: &mut Indexes,
    ) {
        let ancestors = TransitiveKeys::compute(decls, table, Walk::Ancestors);
        let protocols = TransitiveKeys::compute(decls, table, Walk::Protocols);
        let chain = TransitiveKeys::compute(decls, table, Walk::ClassChain);

        for decl in decls {
            let id = decl.id();
            let own = table.of(id);

            for key in ancestors.of(id).iter().filter(|key| !own.contains(*key)) {
                push_value(&mut indexes.based, key.clone(), id);
            }
            for key in protocols.of(id).iter().filter(|key| !own.contains(*key)) {
                push_value(&mut indexes.implementing, key.clone(), id);
            }
            for key in chain.of(id).iter().filter(|key| !own.contains(*key)) {
                push_value(&mut indexes.inheriting, key.clone(), id);
            }
        }
    }

    fn build_direct_indexes(&self, decls: &[Declaration], table: &KeyTable, indexes: &mut Indexes) {
        for decl in decls {
            let id = decl.id();
            for (written, edge) in decl.inherited_edges() {
                match edge {
                    InheritedEdge::Accepted(parent) => {
                        let map = if decls[parent.index()].is_protocol_like() {
                            &mut indexes.direct_conformers
                        } else {
                            &mut indexes.direct_subtypes
                        };
                        for key in table.of(parent) {
                            push_value(map, key.clone(), id);
                        }
                    }
                    InheritedEdge::External => {
                        push_value(&mut indexes.direct_subtypes, written_key(written), id)
                    }
                    InheritedEdge::Rejected(_) => {}
                }
            }
        }
    }

    fn build_composition_index(
        &self,
        decls: &[Declaration],
        table: &KeyTable,
        indexes: &mut Indexes,
    ) {
        for decl in decls.iter().filter(|d| d.is_composition()) {
            let mut members = Vec::new();
            let mut stack = vec![decl.id()];
            flatten_composition(decls, decl.id(), &mut stack, &mut members, &mut indexes.diagnostics);
            for key in table.of(decl.id()) {
                indexes.composed.insert(key.clone(), members.clone());
            }
        }
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn flatten_composition(
    decls: &[Declaration],
    id: DeclId,
    stack: &mut Vec<DeclId>,
    out: &mut Vec<DeclId>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let composition = &decls[id.index()];
    for member in composition.composed_type_names() {
        let Some(member_id) = member.resolved() else {
            continue;
        };
        let member_decl = &decls[member_id.index()];

        if member_decl.is_composition() {
            if stack.contains(&member_id) {
                let root = &decls[stack[0].index()];
                let diagnostic = Diagnostic::new(
                    DiagnosticKind::CompositionCycle,
                    root.global_name.clone(),
                    format!(
                        "protocol composition `{}` composes itself through `{}`",
                        root.global_name, member_decl.global_name
                    ),
                )
                .with_file(root.file.clone());
                if !diagnostics.contains(&diagnostic) {
                    diagnostics.push(diagnostic);
                }
                continue;
            }
            stack.push(member_id);
            flatten_composition(decls, member_id, stack, out, diagnostics);
            stack.pop();
        } else if !out.contains(&member_id) {
            out.push(member_id);
        }
    }
}

//! Canonical declarations
//!
//! One `Declaration` per logical type after extension merge. The shared
//! envelope (name, members, inheritance list, annotations) is the same for
//! every kind; kind-specific data sits in `TypeKind`.
//!
//! Graph edges (`DeclLinks`) are arena indices owned by the registry and
//! the resolver. They are excluded from equality, so two declarations
//! built from the same source compare equal regardless of arena layout.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::members::{EnumCase, Method, Subscript, Variable};
use crate::features::type_name::TypeName;
use crate::shared::models::{has_modifier, AccessLevel, AliasId, Annotations, DeclId, Modifier, Slot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Struct,
    Enum(EnumDetails),
    Protocol(ProtocolDetails),
    ProtocolComposition(CompositionDetails),
    /// Extension whose primary declaration is not in the scanned set
    Extension,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnumDetails {
    pub cases: Vec<EnumCase>,
    pub raw_type_name: Option<TypeName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProtocolDetails {
    pub associated_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionDetails {
    /// Ordered member names; this list is the identity of the composition
    pub composed_type_names: Vec<TypeName>,
    composed_types: Slot<Vec<DeclId>>,
}

impl CompositionDetails {
    pub fn new(composed_type_names: Vec<TypeName>) -> Self {
        Self {
            composed_type_names,
            composed_types: Slot::empty(),
        }
    }

    /// Resolved members, in `composed_type_names` order
    pub fn composed_types(&self) -> &[DeclId] {
        self.composed_types.as_ref().map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn set_composed_types(&mut self, ids: Vec<DeclId>) {
        self.composed_types.fill(ids);
    }
}

/// Field-less discriminant of `TypeKind`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindTag {
    Class,
    Struct,
    Enum,
    Protocol,
    ProtocolComposition,
    Extension,
}

impl KindTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            KindTag::Class => "class",
            KindTag::Struct => "struct",
            KindTag::Enum => "enum",
            KindTag::Protocol => "protocol",
            KindTag::ProtocolComposition => "protocol_composition",
            KindTag::Extension => "extension",
        }
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TypeKind {
    pub fn tag(&self) -> KindTag {
        match self {
            TypeKind::Class => KindTag::Class,
            TypeKind::Struct => KindTag::Struct,
            TypeKind::Enum(_) => KindTag::Enum,
            TypeKind::Protocol(_) => KindTag::Protocol,
            TypeKind::ProtocolComposition(_) => KindTag::ProtocolComposition,
            TypeKind::Extension => KindTag::Extension,
        }
    }
}

/// What one merged extension contributed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRecord {
    pub file: String,
    pub inherited_type_names: Vec<String>,
    pub annotations: Annotations,
}

/// Arena links of a declaration, filled by the registry and the resolver
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct DeclLinks {
    pub(crate) id: DeclId,
    pub(crate) parent: Option<DeclId>,
    pub(crate) contained_types: Vec<DeclId>,
    pub(crate) typealiases: Vec<AliasId>,
    /// One entry per `inherited_type_names` entry
    pub(crate) inherited_resolution: Vec<Option<DeclId>>,
    /// Accepted inheritance edges, in `inherited_type_names` order
    pub(crate) inherited_types: Vec<DeclId>,
    pub(crate) direct_subtypes: Vec<DeclId>,
}

impl PartialEq for DeclLinks {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for DeclLinks {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    /// Scope-qualified name, `Outer.Inner` for nested declarations
    pub global_name: String,
    pub module_name: Option<String>,
    pub access_level: AccessLevel,
    pub is_extension: bool,
    pub kind: TypeKind,
    pub inherited_type_names: Vec<String>,
    pub generic_parameters: Vec<String>,
    /// Declaration modifiers of the primary (`final`, `open`, ...)
    pub modifiers: Vec<Modifier>,
    pub variables: Vec<Variable>,
    pub methods: Vec<Method>,
    pub subscripts: Vec<Subscript>,
    pub annotations: Annotations,
    pub extensions: Vec<ExtensionRecord>,
    /// File of the primary declaration (or first extension)
    pub file: String,
    pub(crate) links: DeclLinks,
}

impl Declaration {
    pub fn id(&self) -> DeclId {
        self.links.id
    }

    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    /// `Module.Outer.Inner`, or the global name when no module is known
    pub fn qualified_name(&self) -> String {
        match self.module_name {
            Some(ref module) => format!("{}.{}", module, self.global_name),
            None => self.global_name.clone(),
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, TypeKind::Class)
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self.kind, TypeKind::Protocol(_))
    }

    pub fn is_composition(&self) -> bool {
        matches!(self.kind, TypeKind::ProtocolComposition(_))
    }

    /// Protocol or protocol composition: edges to these are conformances
    pub fn is_protocol_like(&self) -> bool {
        self.is_protocol() || self.is_composition()
    }

    /// `final class`; always false for other kinds
    pub fn is_final(&self) -> bool {
        self.is_class() && has_modifier(&self.modifiers, "final")
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    pub fn enum_cases(&self) -> &[EnumCase] {
        match self.kind {
            TypeKind::Enum(ref details) => &details.cases,
            _ => &[],
        }
    }

    pub fn raw_type_name(&self) -> Option<&TypeName> {
        match self.kind {
            TypeKind::Enum(ref details) => details.raw_type_name.as_ref(),
            _ => None,
        }
    }

    pub fn associated_types(&self) -> &[String] {
        match self.kind {
            TypeKind::Protocol(ref details) => &details.associated_types,
            _ => &[],
        }
    }

    pub fn composed_type_names(&self) -> &[TypeName] {
        match self.kind {
            TypeKind::ProtocolComposition(ref details) => &details.composed_type_names,
            _ => &[],
        }
    }

    pub fn composed_types(&self) -> &[DeclId] {
        match self.kind {
            TypeKind::ProtocolComposition(ref details) => details.composed_types(),
            _ => &[],
        }
    }

    pub fn parent(&self) -> Option<DeclId> {
        self.links.parent
    }

    pub fn contained_types(&self) -> &[DeclId] {
        &self.links.contained_types
    }

    pub fn typealiases(&self) -> &[AliasId] {
        &self.links.typealiases
    }

    /// Resolved subset of `inherited_type_names`
    pub fn inherited_types(&self) -> &[DeclId] {
        &self.links.inherited_types
    }

    pub fn direct_subtypes(&self) -> &[DeclId] {
        &self.links.direct_subtypes
    }

    /// Each inherited name with the state of its edge
    pub fn inherited_edges(&self) -> impl Iterator<Item = (&str, InheritedEdge)> + '_ {
        self.inherited_type_names
            .iter()
            .enumerate()
            .map(move |(i, name)| {
                let edge = match self.links.inherited_resolution.get(i).copied().flatten() {
                    Some(id) if self.links.inherited_types.contains(&id) => {
                        InheritedEdge::Accepted(id)
                    }
                    Some(id) => InheritedEdge::Rejected(id),
                    None => InheritedEdge::External,
                };
                (name.as_str(), edge)
            })
    }

    pub fn has_annotation(&self, key: &str) -> bool {
        self.annotations.contains_key(key)
    }

    pub fn stored_variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter().filter(|v| !v.is_computed && !v.is_static)
    }

    pub fn computed_variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter().filter(|v| v.is_computed && !v.is_static)
    }

    pub fn static_variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter().filter(|v| v.is_static)
    }

    pub fn initializers(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(|m| m.is_initializer())
    }
}

/// Outcome of resolving one inherited name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InheritedEdge {
    Accepted(DeclId),
    /// Nothing in the scanned set matched; the written name stands
    External,
    /// Resolved, but dropped because it would close an inheritance cycle
    Rejected(DeclId),
}

impl InheritedEdge {
    pub fn accepted(self) -> Option<DeclId> {
        match self {
            InheritedEdge::Accepted(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tag(), self.qualified_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration(name: &str, kind: TypeKind) -> Declaration {
        Declaration {
            name: name.to_string(),
            global_name: name.to_string(),
            module_name: Some("App".to_string()),
            access_level: AccessLevel::Internal,
            is_extension: false,
            kind,
            inherited_type_names: vec!["Base".to_string(), "Codable".to_string()],
            generic_parameters: Vec::new(),
            modifiers: Vec::new(),
            variables: Vec::new(),
            methods: Vec::new(),
            subscripts: Vec::new(),
            annotations: Annotations::new(),
            extensions: Vec::new(),
            file: "Foo.swift".to_string(),
            links: DeclLinks::default(),
        }
    }

    #[test]
    fn test_equality_ignores_links() {
        let a = declaration("Foo", TypeKind::Class);
        let mut b = a.clone();
        b.links.id = DeclId(9);
        b.links.direct_subtypes.push(DeclId(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_inherited_edges_distinguish_rejected_from_external() {
        let mut decl = declaration("Foo", TypeKind::Class);
        decl.inherited_type_names.push("Hashable".to_string());
        decl.links.inherited_resolution = vec![Some(DeclId(1)), Some(DeclId(2)), None];
        decl.links.inherited_types = vec![DeclId(2)];

        let edges: Vec<_> = decl.inherited_edges().collect();
        assert_eq!(
            edges,
            vec![
                ("Base", InheritedEdge::Rejected(DeclId(1))),
                ("Codable", InheritedEdge::Accepted(DeclId(2))),
                ("Hashable", InheritedEdge::External),
            ]
        );
    }

    #[test]
    fn test_final_applies_to_classes_only() {
        let mut class = declaration("Foo", TypeKind::Class);
        class.modifiers.push(Modifier::new("final"));
        assert!(class.is_final());

        let mut value = declaration("Bar", TypeKind::Struct);
        value.modifiers.push(Modifier::new("final"));
        assert!(!value.is_final());
    }

    #[test]
    fn test_qualified_name_and_kind() {
        let decl = declaration("Foo", TypeKind::Protocol(ProtocolDetails::default()));
        assert_eq!(decl.qualified_name(), "App.Foo");
        assert!(decl.is_protocol_like());
        assert_eq!(decl.to_string(), "protocol App.Foo");
    }
}

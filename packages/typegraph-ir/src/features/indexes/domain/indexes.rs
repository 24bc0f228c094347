//! Query indexes over a resolved graph
//!
//! Keys are type names: the module-qualified name (`App.Outer.Inner`) of
//! resolved declarations, their scope-qualified name (`Outer.Inner`) when
//! no other module declares it, and the name as written for inherited
//! names outside the scanned set.
//! Every value list is in first-registration order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::error::IndexQueryError;
use crate::features::declaration::KindTag;
use crate::shared::models::{DeclId, Diagnostic};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indexes {
    pub(crate) all: Vec<DeclId>,
    pub(crate) by_kind: BTreeMap<KindTag, Vec<DeclId>>,
    pub(crate) by_name: BTreeMap<String, DeclId>,
    pub(crate) kind_of: BTreeMap<String, KindTag>,
    pub(crate) based: BTreeMap<String, Vec<DeclId>>,
    pub(crate) direct_subtypes: BTreeMap<String, Vec<DeclId>>,
    pub(crate) direct_conformers: BTreeMap<String, Vec<DeclId>>,
    pub(crate) inheriting: BTreeMap<String, Vec<DeclId>>,
    pub(crate) implementing: BTreeMap<String, Vec<DeclId>>,
    pub(crate) composed: BTreeMap<String, Vec<DeclId>>,
    pub(crate) modules: BTreeSet<String>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Indexes {
    pub fn all(&self) -> &[DeclId] {
        &self.all
    }

    pub fn of_kind(&self, kind: KindTag) -> &[DeclId] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn classes(&self) -> &[DeclId] {
        self.of_kind(KindTag::Class)
    }

    pub fn structs(&self) -> &[DeclId] {
        self.of_kind(KindTag::Struct)
    }

    pub fn enums(&self) -> &[DeclId] {
        self.of_kind(KindTag::Enum)
    }

    pub fn protocols(&self) -> &[DeclId] {
        self.of_kind(KindTag::Protocol)
    }

    pub fn protocol_compositions(&self) -> &[DeclId] {
        self.of_kind(KindTag::ProtocolComposition)
    }

    /// Extension-only nodes (no primary declaration scanned)
    pub fn extensions(&self) -> &[DeclId] {
        self.of_kind(KindTag::Extension)
    }

    /// Canonical declaration for `Outer.Inner` or `App.Outer.Inner`.
    /// A bare name declared in several modules is not a key.
    pub fn by_name(&self, name: &str) -> Option<DeclId> {
        self.by_name.get(name).copied()
    }

    /// Declarations whose ancestors or conformances transitively contain `name`
    pub fn based_on(&self, name: &str) -> &[DeclId] {
        slice(lookup(&self.based, &self.modules, name))
    }

    /// One-hop edges to a non-protocol (or unscanned) `name`
    pub fn direct_subtypes(&self, name: &str) -> &[DeclId] {
        slice(lookup(&self.direct_subtypes, &self.modules, name))
    }

    /// One-hop edges to a protocol or protocol composition `name`
    pub fn direct_conformers(&self, name: &str) -> &[DeclId] {
        slice(lookup(&self.direct_conformers, &self.modules, name))
    }

    /// Flattened members of a protocol composition
    pub fn composed_protocols(&self, name: &str) -> &[DeclId] {
        slice(lookup(&self.composed, &self.modules, name))
    }

    /// Classes whose superclass chain contains `name`
    pub fn inheriting(&self, name: &str) -> Result<&[DeclId], IndexQueryError> {
        if let Some(found) = lookup(&self.inheriting, &self.modules, name) {
            return Ok(found);
        }
        match lookup(&self.kind_of, &self.modules, name) {
            Some(KindTag::Protocol) | Some(KindTag::ProtocolComposition) => {
                Err(IndexQueryError::NotAClass(name.to_string()))
            }
            Some(_) => Ok(&[]),
            None => self.unknown_or_empty(name),
        }
    }

    /// Declarations conforming to protocol `name`, directly, through
    /// protocol inheritance or through a superclass
    pub fn implementing(&self, name: &str) -> Result<&[DeclId], IndexQueryError> {
        if let Some(found) = lookup(&self.implementing, &self.modules, name) {
            return Ok(found);
        }
        match lookup(&self.kind_of, &self.modules, name) {
            Some(KindTag::Class) => Err(IndexQueryError::NotAProtocol(name.to_string())),
            Some(_) => Ok(&[]),
            None => self.unknown_or_empty(name),
        }
    }

    /// Composition cycles found while flattening
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn unknown_or_empty(&self, name: &str) -> Result<&[DeclId], IndexQueryError> {
        if lookup(&self.based, &self.modules, name).is_some() {
            Ok(&[])
        } else {
            Err(IndexQueryError::UnknownType(name.to_string()))
        }
    }
}

/// Exact key, then the key with a scanned module prefix removed
fn lookup<'a, V>(
    map: &'a BTreeMap<String, V>,
    modules: &BTreeSet<String>,
    name: &str,
) -> Option<&'a V> {
    if let Some(found) = map.get(name) {
        return Some(found);
    }
    let (head, rest) = name.split_once('.')?;
    if modules.contains(head) {
        map.get(rest)
    } else {
        None
    }
}

fn slice(found: Option<&Vec<DeclId>>) -> &[DeclId] {
    found.map(Vec::as_slice).unwrap_or(&[])
}

//! Type aliases and free functions
//!
//! Aliases never own members. Resolving a name through an alias means
//! resolving the alias's right-hand side instead.

use serde::{Deserialize, Serialize};

use super::members::Method;
use crate::features::type_name::TypeName;
use crate::shared::models::{AccessLevel, AliasId, Annotations, DeclId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct AliasLinks {
    pub(crate) id: AliasId,
    pub(crate) parent: Option<DeclId>,
}

impl PartialEq for AliasLinks {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for AliasLinks {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    /// Scope-qualified name (`Outer.Alias` for an alias nested in `Outer`)
    pub global_name: String,
    pub module_name: Option<String>,
    pub type_name: TypeName,
    pub generic_parameters: Vec<String>,
    pub access_level: AccessLevel,
    pub annotations: Annotations,
    pub file: String,
    pub(crate) links: AliasLinks,
}

impl Alias {
    pub fn id(&self) -> AliasId {
        self.links.id
    }

    pub fn parent(&self) -> Option<DeclId> {
        self.links.parent
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    pub fn qualified_name(&self) -> String {
        match self.module_name {
            Some(ref module) => format!("{}.{}", module, self.global_name),
            None => self.global_name.clone(),
        }
    }

    /// Declaration the right-hand side resolved to
    pub fn resolved(&self) -> Option<DeclId> {
        self.type_name
            .actual_type_name()
            .and_then(TypeName::resolved)
            .or_else(|| self.type_name.resolved())
    }
}

/// Top-level function with the module and file it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeFunction {
    pub module_name: Option<String>,
    pub file: String,
    pub method: Method,
}

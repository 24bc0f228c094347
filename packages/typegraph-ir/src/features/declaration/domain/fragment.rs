//! Per-file parse output
//!
//! One `FileParseResult` per source file, produced by the (external)
//! parser. Fragments are what the file declares, nested the way the file
//! nests them; nothing is resolved or merged yet.

use serde::{Deserialize, Serialize};

use super::declaration::{CompositionDetails, EnumDetails, ProtocolDetails, TypeKind};
use super::members::{EnumCase, Method, Subscript, Variable};
use crate::features::type_name::TypeName;
use crate::shared::models::{AccessLevel, AnnotationValue, Annotations, Modifier};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileParseResult {
    pub file: String,
    pub module_name: Option<String>,
    pub types: Vec<TypeFragment>,
    pub typealiases: Vec<AliasFragment>,
    /// Top-level functions
    pub functions: Vec<Method>,
}

impl FileParseResult {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Default::default()
        }
    }

    pub fn in_module(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = Some(module_name.into());
        self
    }

    pub fn with_type(mut self, fragment: TypeFragment) -> Self {
        self.types.push(fragment);
        self
    }

    pub fn with_alias(mut self, alias: AliasFragment) -> Self {
        self.typealiases.push(alias);
        self
    }

    pub fn with_function(mut self, function: Method) -> Self {
        self.functions.push(function);
        self
    }
}

/// A type declaration or extension as one file wrote it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFragment {
    /// Unqualified for nested fragments; an extension may use a dotted
    /// path (`extension Outer.Inner`)
    pub name: String,
    pub kind: TypeKind,
    pub is_extension: bool,
    pub access_level: AccessLevel,
    pub inherited_type_names: Vec<String>,
    pub generic_parameters: Vec<String>,
    pub modifiers: Vec<Modifier>,
    pub variables: Vec<Variable>,
    pub methods: Vec<Method>,
    pub subscripts: Vec<Subscript>,
    pub annotations: Annotations,
    pub contained_types: Vec<TypeFragment>,
    pub typealiases: Vec<AliasFragment>,
}

impl TypeFragment {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        let is_extension = matches!(kind, TypeKind::Extension);
        Self {
            name: name.into(),
            kind,
            is_extension,
            access_level: AccessLevel::Internal,
            inherited_type_names: Vec::new(),
            generic_parameters: Vec::new(),
            modifiers: Vec::new(),
            variables: Vec::new(),
            methods: Vec::new(),
            subscripts: Vec::new(),
            annotations: Annotations::new(),
            contained_types: Vec::new(),
            typealiases: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn struct_(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Struct)
    }

    pub fn enum_(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Enum(EnumDetails::default()))
    }

    pub fn protocol(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Protocol(ProtocolDetails::default()))
    }

    /// `typealias`-style composition `P = Q & R` declared as a named type
    pub fn composition(name: impl Into<String>, members: Vec<TypeName>) -> Self {
        Self::new(
            name,
            TypeKind::ProtocolComposition(CompositionDetails::new(members)),
        )
    }

    pub fn extension(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Extension)
    }

    pub fn inheriting(mut self, name: impl Into<String>) -> Self {
        self.inherited_type_names.push(name.into());
        self
    }

    pub fn with_access(mut self, access_level: AccessLevel) -> Self {
        self.access_level = access_level;
        self
    }

    pub fn with_generic_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.generic_parameters.push(parameter.into());
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_subscript(mut self, subscript: Subscript) -> Self {
        self.subscripts.push(subscript);
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: AnnotationValue) -> Self {
        self.annotations.insert(key.into(), value);
        self
    }

    pub fn with_nested(mut self, fragment: TypeFragment) -> Self {
        self.contained_types.push(fragment);
        self
    }

    pub fn with_alias(mut self, alias: AliasFragment) -> Self {
        self.typealiases.push(alias);
        self
    }

    /// Ignored unless the fragment is an enum
    pub fn with_case(mut self, case: EnumCase) -> Self {
        if let TypeKind::Enum(ref mut details) = self.kind {
            details.cases.push(case);
        }
        self
    }

    /// Ignored unless the fragment is an enum
    pub fn with_raw_type(mut self, raw_type_name: TypeName) -> Self {
        if let TypeKind::Enum(ref mut details) = self.kind {
            details.raw_type_name = Some(raw_type_name);
        }
        self
    }

    /// Ignored unless the fragment is a protocol
    pub fn with_associated_type(mut self, name: impl Into<String>) -> Self {
        if let TypeKind::Protocol(ref mut details) = self.kind {
            details.associated_types.push(name.into());
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasFragment {
    pub name: String,
    pub type_name: TypeName,
    pub generic_parameters: Vec<String>,
    pub access_level: AccessLevel,
    pub annotations: Annotations,
}

impl AliasFragment {
    pub fn new(name: impl Into<String>, type_name: TypeName) -> Self {
        Self {
            name: name.into(),
            type_name,
            generic_parameters: Vec::new(),
            access_level: AccessLevel::Internal,
            annotations: Annotations::new(),
        }
    }

    pub fn with_generic_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.generic_parameters.push(parameter.into());
        self
    }
}

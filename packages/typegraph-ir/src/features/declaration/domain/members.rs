//! Declaration members
//!
//! Every member carries the `TypeName`s it references and a non-owning
//! `defined_in` link back to the canonical declaration, filled once by the
//! registry. Equality is structural; `defined_in` is a slot and never
//! takes part in it.

use serde::{Deserialize, Serialize};

use crate::features::type_name::TypeName;
use crate::shared::models::{has_modifier, AccessLevel, Annotations, DeclId, Modifier, Slot};

/// Stored or computed property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub type_name: TypeName,
    pub is_computed: bool,
    pub is_static: bool,
    pub read_access: AccessLevel,
    /// `None` for read-only properties
    pub write_access: Option<AccessLevel>,
    pub default_value: Option<String>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Annotations,
    defined_in: Slot<DeclId>,
}

impl Variable {
    pub fn new(name: impl Into<String>, type_name: TypeName) -> Self {
        Self {
            name: name.into(),
            type_name,
            is_computed: false,
            is_static: false,
            read_access: AccessLevel::Internal,
            write_access: Some(AccessLevel::Internal),
            default_value: None,
            modifiers: Vec::new(),
            annotations: Annotations::new(),
            defined_in: Slot::empty(),
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn computed(mut self) -> Self {
        self.is_computed = true;
        self.write_access = None;
        self
    }

    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.write_access = None;
        self
    }

    pub fn is_mutable(&self) -> bool {
        self.write_access.is_some()
    }

    pub fn is_final(&self) -> bool {
        has_modifier(&self.modifiers, "final")
    }

    pub fn is_lazy(&self) -> bool {
        has_modifier(&self.modifiers, "lazy")
    }

    pub fn defined_in(&self) -> Option<DeclId> {
        self.defined_in.get()
    }

    pub(crate) fn set_defined_in(&mut self, id: DeclId) {
        self.defined_in.fill(id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodParameter {
    /// External label; `None` for `_`
    pub argument_label: Option<String>,
    pub name: String,
    pub type_name: TypeName,
    pub default_value: Option<String>,
    pub is_inout: bool,
    pub is_variadic: bool,
    pub annotations: Annotations,
}

impl MethodParameter {
    pub fn new(name: impl Into<String>, type_name: TypeName) -> Self {
        let name = name.into();
        Self {
            argument_label: Some(name.clone()),
            name,
            type_name,
            default_value: None,
            is_inout: false,
            is_variadic: false,
            annotations: Annotations::new(),
        }
    }

    pub fn unlabeled(mut self) -> Self {
        self.argument_label = None;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Method {
    /// Full selector, e.g. `fetch(id:completion:)`, `init(name:)`, `deinit`
    pub name: String,
    pub parameters: Vec<MethodParameter>,
    pub return_type_name: TypeName,
    pub throws: bool,
    pub rethrows: bool,
    pub is_async: bool,
    pub is_static: bool,
    pub is_class: bool,
    pub is_failable_initializer: bool,
    pub access_level: AccessLevel,
    /// Method-level generic parameters (`func map<T>(...)`)
    pub generic_parameters: Vec<String>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Annotations,
    defined_in: Slot<DeclId>,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type_name: TypeName::void(),
            throws: false,
            rethrows: false,
            is_async: false,
            is_static: false,
            is_class: false,
            is_failable_initializer: false,
            access_level: AccessLevel::Internal,
            generic_parameters: Vec::new(),
            modifiers: Vec::new(),
            annotations: Annotations::new(),
            defined_in: Slot::empty(),
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_parameter(mut self, parameter: MethodParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returning(mut self, type_name: TypeName) -> Self {
        self.return_type_name = type_name;
        self
    }

    pub fn throwing(mut self) -> Self {
        self.throws = true;
        self
    }

    pub fn with_generic_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.generic_parameters.push(parameter.into());
        self
    }

    /// Selector without the argument list: `fetch(id:)` -> `fetch`
    pub fn short_name(&self) -> &str {
        match self.name.find('(') {
            Some(pos) => &self.name[..pos],
            None => &self.name,
        }
    }

    /// Name usable at a call site, generic clause stripped: `map<T>(_:)` -> `map`
    pub fn call_name(&self) -> &str {
        let short = self.short_name();
        match short.find('<') {
            Some(pos) => &short[..pos],
            None => short,
        }
    }

    pub fn is_initializer(&self) -> bool {
        self.call_name() == "init"
    }

    pub fn is_deinitializer(&self) -> bool {
        self.name == "deinit"
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    pub fn is_convenience_initializer(&self) -> bool {
        has_modifier(&self.modifiers, "convenience")
    }

    pub fn is_required(&self) -> bool {
        has_modifier(&self.modifiers, "required")
    }

    pub fn is_final(&self) -> bool {
        has_modifier(&self.modifiers, "final")
    }

    pub fn is_mutating(&self) -> bool {
        has_modifier(&self.modifiers, "mutating")
    }

    /// `optional` requirement of an Objective-C protocol
    pub fn is_optional(&self) -> bool {
        has_modifier(&self.modifiers, "optional")
    }

    pub fn defined_in(&self) -> Option<DeclId> {
        self.defined_in.get()
    }

    pub(crate) fn set_defined_in(&mut self, id: DeclId) {
        self.defined_in.fill(id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscript {
    pub parameters: Vec<MethodParameter>,
    pub return_type_name: TypeName,
    pub read_access: AccessLevel,
    pub write_access: Option<AccessLevel>,
    pub annotations: Annotations,
    defined_in: Slot<DeclId>,
}

impl Subscript {
    pub fn new(parameters: Vec<MethodParameter>, return_type_name: TypeName) -> Self {
        Self {
            parameters,
            return_type_name,
            read_access: AccessLevel::Internal,
            write_access: None,
            annotations: Annotations::new(),
            defined_in: Slot::empty(),
        }
    }

    pub fn is_mutable(&self) -> bool {
        self.write_access.is_some()
    }

    pub fn defined_in(&self) -> Option<DeclId> {
        self.defined_in.get()
    }

    pub(crate) fn set_defined_in(&mut self, id: DeclId) {
        self.defined_in.fill(id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssociatedValue {
    pub local_name: Option<String>,
    pub external_name: Option<String>,
    pub type_name: TypeName,
    pub default_value: Option<String>,
    pub annotations: Annotations,
}

impl AssociatedValue {
    pub fn new(local_name: Option<&str>, type_name: TypeName) -> Self {
        Self {
            local_name: local_name.map(str::to_string),
            external_name: local_name.map(str::to_string),
            type_name,
            default_value: None,
            annotations: Annotations::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumCase {
    pub name: String,
    pub raw_value: Option<String>,
    pub associated_values: Vec<AssociatedValue>,
    pub indirect: bool,
    pub annotations: Annotations,
    defined_in: Slot<DeclId>,
}

impl EnumCase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_value: None,
            associated_values: Vec::new(),
            indirect: false,
            annotations: Annotations::new(),
            defined_in: Slot::empty(),
        }
    }

    pub fn with_raw_value(mut self, raw_value: impl Into<String>) -> Self {
        self.raw_value = Some(raw_value.into());
        self
    }

    pub fn with_associated_value(mut self, value: AssociatedValue) -> Self {
        self.associated_values.push(value);
        self
    }

    pub fn has_associated_value(&self) -> bool {
        !self.associated_values.is_empty()
    }

    pub fn defined_in(&self) -> Option<DeclId> {
        self.defined_in.get()
    }

    pub(crate) fn set_defined_in(&mut self, id: DeclId) {
        self.defined_in.fill(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        let method = Method::new("map<T>(_:)");
        assert_eq!(method.short_name(), "map<T>");
        assert_eq!(method.call_name(), "map");
        assert!(!method.is_initializer());

        assert!(Method::new("init(name:)").is_initializer());
        assert!(Method::new("deinit").is_deinitializer());
    }

    #[test]
    fn test_variable_mutability() {
        let stored = Variable::new("id", TypeName::new("Int"));
        assert!(stored.is_mutable());
        assert!(!stored.clone().computed().is_mutable());
        assert!(!stored.read_only().is_mutable());
    }

    #[test]
    fn test_modifier_helpers() {
        let lazy = Variable::new("cache", TypeName::new("Cache")).with_modifier(Modifier::new("lazy"));
        assert!(lazy.is_lazy());
        assert!(!lazy.is_final());

        let init = Method::new("init(name:)")
            .with_modifier(Modifier::new("convenience"))
            .with_modifier(Modifier::new("required"));
        assert!(init.is_convenience_initializer());
        assert!(init.is_required());
        assert!(!init.is_mutating());
        assert!(Method::new("reset()").with_modifier(Modifier::new("mutating")).is_mutating());
    }

    #[test]
    fn test_modifiers_take_part_in_equality() {
        let plain = Method::new("run()");
        let final_ = Method::new("run()").with_modifier(Modifier::new("final"));
        assert_ne!(plain, final_);
        assert!(final_.is_final());
    }

    #[test]
    fn test_member_equality_ignores_defined_in() {
        let mut owned = Method::new("run()");
        owned.set_defined_in(DeclId(4));
        assert_eq!(owned, Method::new("run()"));
        assert_eq!(owned.defined_in(), Some(DeclId(4)));
    }

    #[test]
    fn test_enum_case_associated_values() {
        let case = EnumCase::new("failure")
            .with_associated_value(AssociatedValue::new(None, TypeName::new("Error")));
        assert!(case.has_associated_value());
        assert!(!EnumCase::new("none").has_associated_value());
    }
}

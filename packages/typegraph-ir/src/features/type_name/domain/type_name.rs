//! TypeName - a type reference as written in source
//!
//! Structured shapes (generic arguments, tuple, closure, array and
//! dictionary sugar, optional wrapping) are kept as separate fields so the
//! printable form can always be rebuilt with `as_source()`.
//!
//! Resolution state lives in two slots that the resolver fills:
//! - `resolved`: the canonical declaration this name denotes
//! - `actual_type_name`: the alias-expanded form when the name went through aliases
//!
//! Both slots are excluded from equality and hashing.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::models::{DeclId, Slot};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    /// Bare nominal name (`Foo`, `Outer.Inner`, `Array` for `Array<Int>`).
    /// For tuple/closure/array/dictionary shapes this is the printable form.
    pub name: String,

    pub generic: Option<GenericType>,
    pub tuple: Option<Vec<TupleElement>>,
    pub closure: Option<ClosureSignature>,
    pub array: Option<ArrayType>,
    pub dictionary: Option<DictionaryType>,

    pub is_optional: bool,
    pub is_implicitly_unwrapped_optional: bool,

    resolved: Slot<DeclId>,
    actual_type_name: Slot<Box<TypeName>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericType {
    pub name: String,
    pub type_parameters: Vec<GenericTypeParameter>,
}

impl GenericType {
    pub fn as_source(&self) -> String {
        let arguments: Vec<String> = self
            .type_parameters
            .iter()
            .map(|p| p.type_name.as_source())
            .collect();
        format!("{}<{}>", self.name, arguments.join(", "))
    }
}

/// One generic argument
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericTypeParameter {
    pub type_name: TypeName,

    /// Name of the declaration's type parameter this argument binds
    /// (`T` for `Box<Int>` against `struct Box<T>`), filled by the resolver
    binding: Slot<String>,
}

impl GenericTypeParameter {
    pub fn new(type_name: TypeName) -> Self {
        Self {
            type_name,
            binding: Slot::empty(),
        }
    }

    pub fn binding(&self) -> Option<&str> {
        self.binding.as_ref().map(String::as_str)
    }

    pub(crate) fn bind(&mut self, parameter: &str) {
        self.binding.fill(parameter.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleElement {
    pub name: Option<String>,
    pub type_name: TypeName,
}

impl TupleElement {
    pub fn new(name: Option<&str>, type_name: TypeName) -> Self {
        Self {
            name: name.map(str::to_string),
            type_name,
        }
    }

    pub fn unnamed(type_name: TypeName) -> Self {
        Self::new(None, type_name)
    }

    pub fn as_source(&self) -> String {
        match self.name {
            Some(ref name) => format!("{}: {}", name, self.type_name.as_source()),
            None => self.type_name.as_source(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClosureSignature {
    pub parameters: Vec<TypeName>,
    pub return_type: Box<TypeName>,
    pub throws: bool,
    pub is_async: bool,
}

impl ClosureSignature {
    pub fn as_source(&self) -> String {
        let params: Vec<String> = self.parameters.iter().map(TypeName::as_source).collect();
        let mut out = format!("({})", params.join(", "));
        if self.is_async {
            out.push_str(" async");
        }
        if self.throws {
            out.push_str(" throws");
        }
        out.push_str(" -> ");
        out.push_str(&self.return_type.as_source());
        out
    }
}

/// `[Element]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayType {
    pub element: Box<TypeName>,
}

/// `[Key: Value]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DictionaryType {
    pub key: Box<TypeName>,
    pub value: Box<TypeName>,
}

impl TypeName {
    /// Plain nominal reference
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic: None,
            tuple: None,
            closure: None,
            array: None,
            dictionary: None,
            is_optional: false,
            is_implicitly_unwrapped_optional: false,
            resolved: Slot::empty(),
            actual_type_name: Slot::empty(),
        }
    }

    pub fn void() -> Self {
        Self::new("Void")
    }

    /// `Name<Arg1, Arg2>`
    pub fn generic(name: impl Into<String>, arguments: Vec<TypeName>) -> Self {
        let name = name.into();
        let mut type_name = Self::new(name.clone());
        type_name.generic = Some(GenericType {
            name,
            type_parameters: arguments.into_iter().map(GenericTypeParameter::new).collect(),
        });
        type_name
    }

    pub fn tuple(elements: Vec<TupleElement>) -> Self {
        let mut type_name = Self::new(String::new());
        type_name.tuple = Some(elements);
        type_name.name = type_name.structural_name();
        type_name
    }

    pub fn closure(parameters: Vec<TypeName>, return_type: TypeName, throws: bool) -> Self {
        let mut type_name = Self::new(String::new());
        type_name.closure = Some(ClosureSignature {
            parameters,
            return_type: Box::new(return_type),
            throws,
            is_async: false,
        });
        type_name.name = type_name.structural_name();
        type_name
    }

    pub fn array(element: TypeName) -> Self {
        let mut type_name = Self::new(String::new());
        type_name.array = Some(ArrayType {
            element: Box::new(element),
        });
        type_name.name = type_name.structural_name();
        type_name
    }

    pub fn dictionary(key: TypeName, value: TypeName) -> Self {
        let mut type_name = Self::new(String::new());
        type_name.dictionary = Some(DictionaryType {
            key: Box::new(key),
            value: Box::new(value),
        });
        type_name.name = type_name.structural_name();
        type_name
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self.is_implicitly_unwrapped_optional = false;
        self
    }

    pub fn implicitly_unwrapped(mut self) -> Self {
        self.is_implicitly_unwrapped_optional = true;
        self.is_optional = false;
        self
    }

    pub fn is_tuple(&self) -> bool {
        self.tuple.is_some()
    }

    pub fn is_closure(&self) -> bool {
        self.closure.is_some()
    }

    pub fn is_array(&self) -> bool {
        self.array.is_some()
    }

    pub fn is_dictionary(&self) -> bool {
        self.dictionary.is_some()
    }

    pub fn is_generic(&self) -> bool {
        self.generic.is_some()
    }

    pub fn is_void(&self) -> bool {
        matches!(self.name.as_str(), "Void" | "()")
    }

    /// Name used to look the reference up among declarations.
    /// `None` for structural shapes, which only resolve their parts.
    pub fn lookup_name(&self) -> Option<&str> {
        if self.tuple.is_some()
            || self.closure.is_some()
            || self.array.is_some()
            || self.dictionary.is_some()
        {
            return None;
        }
        match self.generic {
            Some(ref generic) => Some(generic.name.as_str()),
            None if self.name.is_empty() => None,
            None => Some(self.name.as_str()),
        }
    }

    /// Printable form without the optional marker
    pub fn unwrapped_type_name(&self) -> String {
        if let Some(ref tuple) = self.tuple {
            let elements: Vec<String> = tuple.iter().map(TupleElement::as_source).collect();
            return format!("({})", elements.join(", "));
        }
        if let Some(ref closure) = self.closure {
            return closure.as_source();
        }
        if let Some(ref array) = self.array {
            return format!("[{}]", array.element.as_source());
        }
        if let Some(ref dictionary) = self.dictionary {
            return format!(
                "[{}: {}]",
                dictionary.key.as_source(),
                dictionary.value.as_source()
            );
        }
        match self.generic {
            Some(ref generic) => generic.as_source(),
            None => self.name.clone(),
        }
    }

    /// Printable form, rebuilt from the structured fields
    pub fn as_source(&self) -> String {
        let base = self.unwrapped_type_name();
        let marker = if self.is_optional {
            "?"
        } else if self.is_implicitly_unwrapped_optional {
            "!"
        } else {
            return base;
        };
        if self.closure.is_some() {
            format!("({}){}", base, marker)
        } else {
            format!("{}{}", base, marker)
        }
    }

    fn structural_name(&self) -> String {
        self.unwrapped_type_name()
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Resolution slots
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Declaration this name resolved to, if it names one in the scanned set
    pub fn resolved(&self) -> Option<DeclId> {
        self.resolved.get()
    }

    /// Alias-expanded form, when the name was reached through an alias
    pub fn actual_type_name(&self) -> Option<&TypeName> {
        self.actual_type_name.as_ref().map(Box::as_ref)
    }

    /// Resolved or expanded through an alias
    pub fn is_settled(&self) -> bool {
        self.resolved.is_filled() || self.actual_type_name.is_filled()
    }

    pub(crate) fn set_resolved(&mut self, id: DeclId) {
        self.resolved.fill(id);
    }

    pub(crate) fn set_actual_type_name(&mut self, actual: TypeName) {
        self.actual_type_name.fill(Box::new(actual));
    }

    pub(crate) fn clear_resolution(&mut self) {
        self.resolved.clear();
        self.actual_type_name.clear();
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Traversal
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Visit the directly nested type names (generic arguments, tuple
    /// elements, closure parameters and return, collection elements)
    pub fn for_each_child(&self, f: &mut dyn FnMut(&TypeName)) {
        if let Some(ref generic) = self.generic {
            for parameter in &generic.type_parameters {
                f(&parameter.type_name);
            }
        }
        if let Some(ref tuple) = self.tuple {
            for element in tuple {
                f(&element.type_name);
            }
        }
        if let Some(ref closure) = self.closure {
            for parameter in &closure.parameters {
                f(parameter);
            }
            f(&closure.return_type);
        }
        if let Some(ref array) = self.array {
            f(&array.element);
        }
        if let Some(ref dictionary) = self.dictionary {
            f(&dictionary.key);
            f(&dictionary.value);
        }
    }

    pub fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut TypeName)) {
        if let Some(ref mut generic) = self.generic {
            for parameter in &mut generic.type_parameters {
                f(&mut parameter.type_name);
            }
        }
        if let Some(ref mut tuple) = self.tuple {
            for element in tuple {
                f(&mut element.type_name);
            }
        }
        if let Some(ref mut closure) = self.closure {
            for parameter in &mut closure.parameters {
                f(parameter);
            }
            f(&mut closure.return_type);
        }
        if let Some(ref mut array) = self.array {
            f(&mut array.element);
        }
        if let Some(ref mut dictionary) = self.dictionary {
            f(&mut dictionary.key);
            f(&mut dictionary.value);
        }
    }

    /// Replace generic placeholders by concrete arguments.
    ///
    /// Used to expand generic aliases: `typealias Pair<T> = (T, T)` used as
    /// `Pair<Int>` expands to `(Int, Int)`. Optional markers on the
    /// placeholder are kept on the substituted type.
    pub fn substitute(&self, bindings: &AHashMap<String, TypeName>) -> TypeName {
        if bindings.is_empty() {
            return self.clone();
        }

        if self.generic.is_none() {
            if let Some(replacement) = self.lookup_name().and_then(|n| bindings.get(n)) {
                let mut substituted = replacement.clone();
                substituted.is_optional |= self.is_optional;
                substituted.is_implicitly_unwrapped_optional |=
                    self.is_implicitly_unwrapped_optional;
                return substituted;
            }
        }

        let mut substituted = self.clone();
        substituted.clear_resolution();
        substituted.for_each_child_mut(&mut |child| {
            *child = child.substitute(bindings);
        });
        if substituted.lookup_name().is_none() {
            substituted.name = substituted.structural_name();
        }
        substituted
    }

    pub(crate) fn bind_generic_parameters(&mut self, parameters: &[String]) {
        if let Some(ref mut generic) = self.generic {
            for (argument, parameter) in generic.type_parameters.iter_mut().zip(parameters) {
                argument.bind(parameter);
            }
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_source())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_as_source() {
        assert_eq!(TypeName::new("Foo").as_source(), "Foo");
        assert_eq!(TypeName::new("Foo").optional().as_source(), "Foo?");
        assert_eq!(
            TypeName::new("Foo").implicitly_unwrapped().as_source(),
            "Foo!"
        );
    }

    #[test]
    fn test_generic_as_source() {
        let name = TypeName::generic(
            "Result",
            vec![TypeName::new("User"), TypeName::new("Error")],
        )
        .optional();
        assert_eq!(name.as_source(), "Result<User, Error>?");
        assert_eq!(name.lookup_name(), Some("Result"));
    }

    #[test]
    fn test_closure_optional_is_parenthesized() {
        let closure = TypeName::closure(
            vec![TypeName::new("Int")],
            TypeName::void(),
            true,
        )
        .optional();
        assert_eq!(closure.as_source(), "((Int) throws -> Void)?");
        assert_eq!(closure.lookup_name(), None);
    }

    #[test]
    fn test_collection_sugar() {
        let array = TypeName::array(TypeName::new("User"));
        assert_eq!(array.as_source(), "[User]");
        assert_eq!(array.name, "[User]");

        let dict = TypeName::dictionary(TypeName::new("String"), TypeName::array(TypeName::new("Int")));
        assert_eq!(dict.as_source(), "[String: [Int]]");
    }

    #[test]
    fn test_tuple_with_labels() {
        let tuple = TypeName::tuple(vec![
            TupleElement::new(Some("x"), TypeName::new("Double")),
            TupleElement::unnamed(TypeName::new("Point")),
        ]);
        assert_eq!(tuple.as_source(), "(x: Double, Point)");
    }

    #[test]
    fn test_equality_ignores_resolution() {
        let mut resolved = TypeName::new("Foo");
        resolved.set_resolved(DeclId(7));
        assert_eq!(resolved, TypeName::new("Foo"));
        assert_eq!(resolved.resolved(), Some(DeclId(7)));
    }

    #[test]
    fn test_substitute_generic_alias_body() {
        let body = TypeName::tuple(vec![
            TupleElement::unnamed(TypeName::new("T")),
            TupleElement::unnamed(TypeName::new("T").optional()),
        ]);
        let mut bindings = AHashMap::new();
        bindings.insert("T".to_string(), TypeName::new("Int"));

        let expanded = body.substitute(&bindings);
        assert_eq!(expanded.as_source(), "(Int, Int?)");
    }

    #[test]
    fn test_children_visit_order() {
        let name = TypeName::generic(
            "Map",
            vec![TypeName::new("K"), TypeName::array(TypeName::new("V"))],
        );
        let mut seen = Vec::new();
        name.for_each_child(&mut |child| seen.push(child.as_source()));
        assert_eq!(seen, vec!["K", "[V]"]);
    }
}

//! Declaration modifiers
//!
//! Keywords written before a declaration that are not access levels:
//! `final`, `lazy`, `mutating`, `required`, `convenience`, `optional`,
//! `dynamic`, ... An optional detail carries the parenthesized argument,
//! e.g. `set` for `private(set)`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    pub detail: Option<String>,
}

impl Modifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail {
            Some(ref detail) => write!(f, "{}({})", self.name, detail),
            None => f.write_str(&self.name),
        }
    }
}

/// Whether `modifiers` contains one named `name`
pub fn has_modifier(modifiers: &[Modifier], name: &str) -> bool {
    modifiers.iter().any(|m| m.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_detail() {
        assert_eq!(Modifier::new("final").to_string(), "final");
        assert_eq!(Modifier::new("private").with_detail("set").to_string(), "private(set)");
    }

    #[test]
    fn test_has_modifier() {
        let modifiers = vec![Modifier::new("final"), Modifier::new("lazy")];
        assert!(has_modifier(&modifiers, "lazy"));
        assert!(!has_modifier(&modifiers, "mutating"));
    }
}

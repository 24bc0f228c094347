//! Build diagnostics
//!
//! Nothing the registry, resolver or index builder sees in the input is
//! fatal. Each anomaly becomes a `Diagnostic` in an accumulated list that
//! travels beside the result; the caller decides whether any of them are
//! errors (see `ResolutionConfig::strict`).

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Duplicate primary declaration, or an alias redeclared with a different target
    StructuralConflict,
    /// A type reference that names nothing in the scanned set
    UnresolvedReference,
    /// A bare name matched several declarations; the first registered one was used
    AmbiguousReference,
    /// Alias indirection exceeded the configured depth
    AliasCycle,
    /// A protocol composition (transitively) composes itself
    CompositionCycle,
    /// Class-like inheritance loops back on itself; the closing edge is dropped
    InheritanceCycle,
    /// The fixed-point loop hit its pass bound while names were still changing
    NonConvergence,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::StructuralConflict => "structural_conflict",
            DiagnosticKind::UnresolvedReference => "unresolved_reference",
            DiagnosticKind::AmbiguousReference => "ambiguous_reference",
            DiagnosticKind::AliasCycle => "alias_cycle",
            DiagnosticKind::CompositionCycle => "composition_cycle",
            DiagnosticKind::InheritanceCycle => "inheritance_cycle",
            DiagnosticKind::NonConvergence => "non_convergence",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// The name the diagnostic is about (type name, alias name, ...)
    pub subject: String,

    /// Qualified location of the reference, e.g. `Foo.bar` for a member
    pub site: Option<String>,

    /// Originating file, when known
    pub file: Option<String>,

    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            site: None,
            file: None,
            message: message.into(),
        }
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(ref file) = self.file {
            write!(f, " ({})", file)?;
        }
        Ok(())
    }
}

/// Ordered diagnostic accumulator
///
/// `push_unique` drops exact repeats, so the fixed-point loop can report
/// the same condition on every pass without flooding the list.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    seen: AHashSet<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.seen.insert(diagnostic.clone());
        self.items.push(diagnostic);
    }

    /// Push unless an identical diagnostic was already recorded.
    /// Returns whether it was added.
    pub fn push_unique(&mut self, diagnostic: Diagnostic) -> bool {
        if self.seen.contains(&diagnostic) {
            return false;
        }
        self.push(diagnostic);
        true
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in other {
            self.push_unique(diagnostic);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind == kind)
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_unique_drops_repeats() {
        let mut diagnostics = Diagnostics::new();
        let d = Diagnostic::new(DiagnosticKind::AliasCycle, "A", "alias `A` cycles");

        assert!(diagnostics.push_unique(d.clone()));
        assert!(!diagnostics.push_unique(d));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_of_kind_preserves_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::new(DiagnosticKind::UnresolvedReference, "X", "x"));
        diagnostics.push(Diagnostic::new(DiagnosticKind::StructuralConflict, "Foo", "dup"));
        diagnostics.push(Diagnostic::new(DiagnosticKind::UnresolvedReference, "Y", "y"));

        let subjects: Vec<&str> = diagnostics
            .of_kind(DiagnosticKind::UnresolvedReference)
            .map(|d| d.subject.as_str())
            .collect();
        assert_eq!(subjects, vec!["X", "Y"]);
        assert_eq!(diagnostics.count_of(DiagnosticKind::StructuralConflict), 1);
    }

    #[test]
    fn test_display_includes_file() {
        let d = Diagnostic::new(DiagnosticKind::StructuralConflict, "Foo", "duplicate `Foo`")
            .with_file("Sources/Foo.swift");
        assert_eq!(
            d.to_string(),
            "[structural_conflict] duplicate `Foo` (Sources/Foo.swift)"
        );
    }
}

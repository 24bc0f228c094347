//! Graph diff types

use serde::Serialize;

/// Declaration-level difference between two snapshots
///
/// Names are module-qualified (`App.Outer.Inner`). Lists follow the
/// registration order of the snapshot they come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphDiff {
    /// Present only in the newer snapshot
    pub added: Vec<String>,

    /// Present only in the older snapshot
    pub removed: Vec<String>,

    /// Present in both with differing content
    pub changed: Vec<DeclarationChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationChange {
    pub name: String,
    /// Names of the fields that differ, in declaration field order
    pub fields: Vec<&'static str>,
}

impl GraphDiff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_changes(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "+{} ~{} -{} (total: {})",
            self.added.len(),
            self.changed.len(),
            self.removed.len(),
            self.total_changes()
        )
    }
}

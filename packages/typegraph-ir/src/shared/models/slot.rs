//! Resolution slots
//!
//! A `Slot` holds state that the resolver fills in after the model was
//! built (resolved declaration, alias expansion, generic binding).
//!
//! Structural identity of a model value is "what was written in source",
//! so a slot always compares equal and contributes nothing to a hash.
//! Two snapshots of the same source therefore compare equal even when
//! arena indices differ between runs.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot<T>(Option<T>);

impl<T> Slot<T> {
    pub const fn empty() -> Self {
        Self(None)
    }

    pub fn is_filled(&self) -> bool {
        self.0.is_some()
    }

    pub fn as_ref(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub(crate) fn fill(&mut self, value: T) {
        self.0 = Some(value);
    }

    pub(crate) fn clear(&mut self) {
        self.0 = None;
    }
}

impl<T: Copy> Slot<T> {
    pub fn get(&self) -> Option<T> {
        self.0
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Option<T>> for Slot<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T> PartialEq for Slot<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for Slot<T> {}

impl<T> Hash for Slot<T> {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::DeclId;

    #[test]
    fn test_slot_ignored_by_equality() {
        let mut filled = Slot::empty();
        filled.fill(DeclId(3));
        let empty: Slot<DeclId> = Slot::empty();

        assert_eq!(filled, empty);
        assert_eq!(filled.get(), Some(DeclId(3)));
        assert!(!empty.is_filled());
    }
}

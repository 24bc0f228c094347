//! Source annotations
//!
//! Free-form metadata the parser extracts from source comments using the
//! `key: value` or bare `key` convention. Values are opaque to the type
//! graph: they are stored, merged and handed out, never interpreted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    /// Bare `key` annotations are stored as `Flag(true)`
    Flag(bool),
    Int(i64),
    Text(String),
    List(Vec<AnnotationValue>),
    Map(BTreeMap<String, AnnotationValue>),
}

impl AnnotationValue {
    pub fn text(value: impl Into<String>) -> Self {
        AnnotationValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnnotationValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Ordered annotation map (key order is stable for serialization)
pub type Annotations = BTreeMap<String, AnnotationValue>;

/// Merge `incoming` into `target`.
///
/// New keys are inserted. A key present on both sides with different
/// values turns into a list holding every distinct value in encounter
/// order, the same shape the parser produces for a repeated key.
pub fn merge_annotations(target: &mut Annotations, incoming: &Annotations) {
    for (key, value) in incoming {
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), value.clone());
            }
            Some(existing) if existing == value => {}
            Some(AnnotationValue::List(items)) => {
                let additions: Vec<AnnotationValue> = match value {
                    AnnotationValue::List(values) => values.clone(),
                    other => vec![other.clone()],
                };
                for item in additions {
                    if !items.contains(&item) {
                        items.push(item);
                    }
                }
            }
            Some(existing) => {
                let previous = existing.clone();
                let mut items = vec![previous];
                match value {
                    AnnotationValue::List(values) => {
                        for item in values {
                            if !items.contains(item) {
                                items.push(item.clone());
                            }
                        }
                    }
                    other => items.push(other.clone()),
                }
                *existing = AnnotationValue::List(items);
            }
        }
    }
}

//! Shared models

mod access;
mod annotations;
mod diagnostic;
mod ids;
mod modifier;
mod slot;

pub use access::AccessLevel;
pub use annotations::{merge_annotations, AnnotationValue, Annotations};
pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use ids::{AliasId, DeclId};
pub use modifier::{has_modifier, Modifier};
pub use slot::Slot;

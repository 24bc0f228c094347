/*
 * Typegraph IR - type graph resolution core
 *
 * Feature-First Architecture:
 * - shared/      : Common models (ids, slots, annotations, diagnostics)
 * - features/    : Vertical slices (type_name → declaration → registry → resolution → indexes, diff)
 * - pipeline/    : Orchestration (build_type_graph)
 * - config/      : ResolutionConfig, YAML loading
 *
 * Parsed file fragments go in, an immutable resolved TypeGraph comes out.
 * Per-file lowering runs on rayon; resolution and indexing are sequential.
 */

#![allow(clippy::too_many_arguments)] // Resolver entry points carry scope + site + depth
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models
pub mod shared;

/// Feature modules (registry, resolution, indexes)
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ConfigError, ResolutionConfig};
pub use errors::{Result, TypegraphError};
pub use features::declaration::{
    Alias, AliasFragment, AssociatedValue, Declaration, EnumCase, FileParseResult, FreeFunction,
    InheritedEdge, KindTag, Method, MethodParameter, Subscript, TypeFragment, TypeKind, Variable,
};
pub use features::diff::{DeclarationChange, GraphDiff};
pub use features::indexes::{IndexQueryError, Indexes};
pub use features::type_name::TypeName;
pub use pipeline::{build_type_graph, ResolutionStats, TypeGraph};
pub use shared::models::{
    AccessLevel, AliasId, AnnotationValue, Annotations, DeclId, Diagnostic, DiagnosticKind,
    Modifier,
};

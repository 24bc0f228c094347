//! End-to-end type graph construction
//!
//! Registry → resolution → indexes, each stage timed and summarized with
//! one `info!` line. The result is an immutable `TypeGraph` snapshot.

use serde::Serialize;
use std::time::Instant;
use tracing::info;

use crate::config::ResolutionConfig;
use crate::errors::{Result, TypegraphError};
use crate::features::declaration::{Alias, Declaration, FileParseResult, FreeFunction};
use crate::features::diff::{diff_declarations, GraphDiff};
use crate::features::indexes::{IndexBuilder, Indexes};
use crate::features::registry::RegistryBuilder;
use crate::features::resolution::{ResolutionEngine, ResolvedGraph};
use crate::shared::models::{DeclId, Diagnostic};

/// Counts and timing for one build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub files: usize,
    pub declarations: usize,
    pub aliases: usize,
    pub functions: usize,
    pub passes: usize,
    pub converged: bool,
    pub resolved: usize,
    pub unresolved: usize,
    pub duration_ms: u64,
}

/// Immutable resolved snapshot
#[derive(Debug, Clone)]
pub struct TypeGraph {
    graph: ResolvedGraph,
    indexes: Indexes,
    stats: ResolutionStats,
    strict: bool,
}

#[derive(Serialize)]
struct TypeGraphExport<'a> {
    declarations: &'a [Declaration],
    aliases: &'a [Alias],
    functions: &'a [FreeFunction],
    indexes: &'a Indexes,
    diagnostics: &'a [Diagnostic],
    stats: &'a ResolutionStats,
}

/// Build the resolved type graph for a set of parsed files.
///
/// Fails only on an invalid configuration or a fragment that breaks the
/// input contract. Everything else ends up in `diagnostics()`.
pub fn build_type_graph(files: &[FileParseResult], config: &ResolutionConfig) -> Result<TypeGraph> {
    config.validate()?;
    let total = Instant::now();

    let start = Instant::now();
    let registry = RegistryBuilder::build(files)?;
    info!(
        "Registry: {} files → {} declarations, {} aliases in {:?}",
        files.len(),
        registry.declarations().len(),
        registry.aliases().len(),
        start.elapsed()
    );

    let start = Instant::now();
    let mut graph = ResolutionEngine::new(config).resolve(registry);
    let pass_stats = graph.stats();
    info!(
        "Resolution: {} passes (converged: {}), {} resolved, {} unresolved in {:?}",
        pass_stats.passes,
        pass_stats.converged,
        pass_stats.resolved,
        pass_stats.unresolved,
        start.elapsed()
    );

    let start = Instant::now();
    let indexes = IndexBuilder::new().build_indexes(&graph);
    graph
        .registry
        .diagnostics
        .extend(indexes.diagnostics().iter().cloned());
    info!(
        "Indexes: {} declarations, {} modules in {:?}",
        indexes.all().len(),
        indexes.modules.len(),
        start.elapsed()
    );

    let stats = ResolutionStats {
        files: files.len(),
        declarations: graph.declarations().len(),
        aliases: graph.aliases().len(),
        functions: graph.functions().len(),
        passes: pass_stats.passes,
        converged: pass_stats.converged,
        resolved: pass_stats.resolved,
        unresolved: pass_stats.unresolved,
        duration_ms: total.elapsed().as_millis() as u64,
    };
    info!(
        "Type graph built: {} declarations, {} diagnostics in {}ms",
        stats.declarations,
        graph.diagnostics().len(),
        stats.duration_ms
    );

    Ok(TypeGraph {
        graph,
        indexes,
        stats,
        strict: config.strict,
    })
}

impl TypeGraph {
    pub fn declarations(&self) -> &[Declaration] {
        self.graph.declarations()
    }

    pub fn aliases(&self) -> &[Alias] {
        self.graph.aliases()
    }

    pub fn functions(&self) -> &[FreeFunction] {
        self.graph.functions()
    }

    pub fn indexes(&self) -> &Indexes {
        &self.indexes
    }

    /// Registry, resolution and index diagnostics, in that order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.graph.diagnostics().as_slice()
    }

    pub fn stats(&self) -> &ResolutionStats {
        &self.stats
    }

    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.graph.get(id)
    }

    /// By `Outer.Inner` or `Module.Outer.Inner`
    pub fn find(&self, name: &str) -> Option<&Declaration> {
        self.graph.find(name)
    }

    pub fn resolved_graph(&self) -> &ResolvedGraph {
        &self.graph
    }

    /// In strict mode any diagnostic fails the build
    pub fn check_strict(&self) -> Result<()> {
        if !self.strict {
            return Ok(());
        }
        match self.diagnostics().first() {
            None => Ok(()),
            Some(first) => Err(TypegraphError::StrictMode {
                count: self.diagnostics().len(),
                first: Box::new(first.clone()),
            }),
        }
    }

    pub fn diff(&self, newer: &TypeGraph) -> GraphDiff {
        diff_declarations(self.declarations(), newer.declarations())
    }

    pub fn to_json(&self) -> Result<String> {
        let export = TypeGraphExport {
            declarations: self.declarations(),
            aliases: self.aliases(),
            functions: self.functions(),
            indexes: &self.indexes,
            diagnostics: self.diagnostics(),
            stats: &self.stats,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }
}

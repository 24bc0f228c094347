//! Test data builders
//!
//! `GraphFixture` collects parsed files and runs the full pipeline.

use typegraph_ir::{
    build_type_graph, FileParseResult, ResolutionConfig, TypeFragment, TypeGraph, TypeName,
    Variable,
};

/// Builder for a set of parsed files
#[derive(Debug, Default)]
pub struct GraphFixture {
    files: Vec<FileParseResult>,
    config: ResolutionConfig,
}

impl GraphFixture {
    /// Create a new fixture with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file
    pub fn with_file(mut self, file: FileParseResult) -> Self {
        self.files.push(file);
        self
    }

    /// Add a file in module `App` holding the given fragments
    pub fn with_types(self, file_name: &str, fragments: Vec<TypeFragment>) -> Self {
        let mut file = FileParseResult::new(file_name).in_module("App");
        for fragment in fragments {
            file = file.with_type(fragment);
        }
        self.with_file(file)
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: ResolutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn files(&self) -> &[FileParseResult] {
        &self.files
    }

    /// Run the pipeline
    pub fn build(&self) -> TypeGraph {
        build_type_graph(&self.files, &self.config).expect("pipeline should not fail")
    }
}

/// Stored property with a plain nominal type
pub fn field(name: &str, type_name: &str) -> Variable {
    Variable::new(name, TypeName::parse(type_name))
}

//! Configuration
//!
//! `ResolutionConfig` controls the resolution engine and strict-mode
//! escalation. It can be built in code with the builder methods or loaded
//! from a versioned YAML file.
//!
//! ```rust,ignore
//! use typegraph_ir::config::ResolutionConfig;
//!
//! let config = ResolutionConfig::default().max_alias_depth(8).strict(true);
//! let config = ResolutionConfig::from_yaml("typegraph.yaml")?;
//! ```

pub mod error;
pub mod resolution_config;

pub use error::{ConfigError, ConfigResult};
pub use resolution_config::{ResolutionConfig, MAX_ALIAS_DEPTH_LIMIT, MAX_PASSES_LIMIT};

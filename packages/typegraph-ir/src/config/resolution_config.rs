//! Resolution configuration
//!
//! YAML schema v1:
//! ```yaml
//! version: 1
//! resolution:
//!   max_alias_depth: 16
//!   max_passes: 64          # optional; default is declaration count + 1
//!   strict: false
//!   report_builtin_references: false
//!   extra_builtin_types: [UIView, CGRect]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, ConfigResult};

pub const MAX_ALIAS_DEPTH_LIMIT: usize = 256;
pub const MAX_PASSES_LIMIT: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolutionConfig {
    /// Alias hops followed before reporting an alias cycle
    pub max_alias_depth: usize,

    /// Fixed-point pass bound; `None` means declaration count + 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_passes: Option<usize>,

    /// Treat any diagnostic as an error (see `TypeGraph::check_strict`)
    pub strict: bool,

    /// Report unresolved references to built-in types (`Int`, `Array`, ...)
    pub report_builtin_references: bool,

    /// Additional names never reported as unresolved (platform SDK types)
    pub extra_builtin_types: Vec<String>,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            max_alias_depth: 16,
            max_passes: None,
            strict: false,
            report_builtin_references: false,
            extra_builtin_types: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFileV1 {
    version: Option<u32>,
    #[serde(default)]
    resolution: ResolutionConfig,
}

impl ResolutionConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_alias_depth == 0 || self.max_alias_depth > MAX_ALIAS_DEPTH_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_alias_depth",
                self.max_alias_depth,
                1,
                MAX_ALIAS_DEPTH_LIMIT,
                "Alias expansion needs at least one hop",
            ));
        }

        if let Some(n) = self.max_passes {
            if n == 0 || n > MAX_PASSES_LIMIT {
                return Err(ConfigError::range_with_hint(
                    "max_passes",
                    n,
                    1,
                    MAX_PASSES_LIMIT,
                    "Omit max_passes to bound passes by the declaration count",
                ));
            }
        }

        for name in &self.extra_builtin_types {
            let valid = !name.is_empty()
                && name
                    .split('.')
                    .all(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_'));
            if !valid {
                return Err(ConfigError::InvalidBuiltinName(name.clone()));
            }
        }

        Ok(())
    }

    /// Builder: Set alias depth
    pub fn max_alias_depth(mut self, depth: usize) -> Self {
        self.max_alias_depth = depth;
        self
    }

    /// Builder: Set pass bound
    pub fn max_passes(mut self, passes: usize) -> Self {
        self.max_passes = Some(passes);
        self
    }

    /// Builder: Enable strict mode
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn report_builtin_references(mut self, report: bool) -> Self {
        self.report_builtin_references = report;
        self
    }

    pub fn extra_builtin_type(mut self, name: impl Into<String>) -> Self {
        self.extra_builtin_types.push(name.into());
        self
    }

    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;
        match file.version {
            None => return Err(ConfigError::MissingVersion),
            Some(1) => {}
            Some(found) => {
                return Err(ConfigError::UnsupportedVersion {
                    found,
                    supported: vec![1],
                })
            }
        }
        file.resolution.validate()?;
        Ok(file.resolution)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            resolution: self.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ResolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_alias_depth_range() {
        let err = ResolutionConfig::default()
            .max_alias_depth(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Range { ref field, .. } if field == "max_alias_depth"));

        assert!(ResolutionConfig::default()
            .max_alias_depth(MAX_ALIAS_DEPTH_LIMIT + 1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_max_passes_range() {
        assert!(ResolutionConfig::default().max_passes(0).validate().is_err());
        assert!(ResolutionConfig::default().max_passes(10).validate().is_ok());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = ResolutionConfig::default()
            .max_alias_depth(4)
            .strict(true)
            .extra_builtin_type("UIView");

        let yaml = config.to_yaml().unwrap();
        let loaded = ResolutionConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_yaml_partial_uses_defaults() {
        let loaded = ResolutionConfig::from_yaml_str("version: 1\nresolution:\n  strict: true\n").unwrap();
        assert!(loaded.strict);
        assert_eq!(loaded.max_alias_depth, 16);
    }

    #[test]
    fn test_yaml_requires_version() {
        let err = ResolutionConfig::from_yaml_str("resolution:\n  strict: true\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingVersion));

        let err = ResolutionConfig::from_yaml_str("version: 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { found: 2, .. }));
    }

    #[test]
    fn test_yaml_rejects_unknown_fields() {
        let err = ResolutionConfig::from_yaml_str("version: 1\nresolution:\n  max_depth: 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_invalid_builtin_name() {
        let err = ResolutionConfig::default()
            .extra_builtin_type("UI View")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBuiltinName(_)));
    }
}

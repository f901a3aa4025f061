//! Project configuration for phpreflect.
//!
//! A configuration selects which files are built and how the builder is
//! assembled: the duplicate policy, strict parsing, and the named middleware
//! stages of the pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::model::DuplicatePolicy;
use crate::pipeline::{MiddlewareCatalog, PipelineConfig};

/// Configuration file names searched for, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["phpreflect.yaml", ".phpreflect.yaml"];

/// Commented starting point written by `phpreflect init`.
pub const DEFAULT_TEMPLATE: &str = include_str!("templates/phpreflect.yaml");

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Glob patterns, relative to the build root, of files to build.
    pub include: Vec<String>,
    /// Glob patterns of files to skip even when included.
    pub exclude: Vec<String>,
    pub duplicates: DuplicatePolicy,
    /// Fail files that contain syntax errors instead of building from the
    /// recovered tree.
    pub strict: bool,
    /// Middleware stages, outermost first.
    pub pipeline: PipelineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: vec!["**/*.php".to_string()],
            exclude: vec!["**/vendor/**".to_string()],
            duplicates: DuplicatePolicy::default(),
            strict: true,
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        // an empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Look for a configuration file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Compile the include and exclude patterns.
    pub fn path_filter(&self) -> Result<PathFilter, ConfigError> {
        Ok(PathFilter {
            include: compile(&self.include)?,
            exclude: compile(&self.exclude)?,
        })
    }

    /// Check everything that can be checked before a build.
    pub fn validate(&self, catalog: &MiddlewareCatalog) -> Result<(), ConfigError> {
        self.path_filter()?;
        catalog.resolve(&self.pipeline)?;
        Ok(())
    }
}

/// Compiled include/exclude globs.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: GlobSet,
    exclude: GlobSet,
}

impl PathFilter {
    /// Whether `path` (relative to the build root) should be built.
    pub fn is_path_included(&self, path: &Path) -> bool {
        self.include.is_match(path) && !self.is_path_excluded(path)
    }

    pub fn is_path_excluded(&self, path: &Path) -> bool {
        self.exclude.is_match(path)
    }
}

fn compile(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::Glob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::Glob {
        pattern: patterns.join(", "),
        source,
    })
}

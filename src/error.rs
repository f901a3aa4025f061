//! Error types for model building and configuration.

use thiserror::Error;

use crate::model::{Fqsen, FqsenError};

/// Failure reported by an AST provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("cannot load grammar: {0}")]
    Language(String),
    #[error("parser gave up before producing a tree")]
    Aborted,
    #[error("syntax error at {line}:{column} near {snippet:?}")]
    Syntax {
        line: usize,
        column: usize,
        snippet: String,
    },
    #[error("{0}")]
    Other(String),
}

/// Failure reported by a doc-block parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocBlockError {
    #[error("comment is not a documentation block: {0:?}")]
    NotADocBlock(String),
}

/// Failure inside a single construction strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    #[error("{kind} node has no name")]
    MissingName { kind: &'static str },
    #[error(transparent)]
    InvalidFqsen(#[from] FqsenError),
    #[error("node is not a {expected}")]
    UnsupportedNode { expected: &'static str },
    #[error("{kind} declared outside of a class, interface or trait")]
    MissingOwner { kind: &'static str },
    #[error("expected {expected} element, strategy produced {found}")]
    UnexpectedElement {
        expected: &'static str,
        found: &'static str,
    },
    #[error(transparent)]
    DocBlock(#[from] DocBlockError),
}

/// Everything that can abort a file build.
///
/// A build either returns a complete model or one of these; there is no
/// partially populated result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Provider errors pass through unchanged.
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("no strategy registered for {kind} nodes")]
    NoMatchingStrategy { kind: String },
    #[error("{strategy} strategy failed: {source}")]
    Strategy {
        strategy: &'static str,
        #[source]
        source: StrategyError,
    },
    #[error("{fqsen} is declared more than once")]
    DuplicateFqsen { fqsen: Fqsen },
    #[error("a {kind} element cannot be stored at file level")]
    MisplacedElement { kind: &'static str },
}

impl BuildError {
    pub fn strategy(strategy: &'static str, source: impl Into<StrategyError>) -> Self {
        BuildError::Strategy {
            strategy,
            source: source.into(),
        }
    }
}

/// Errors detected while assembling a pipeline or loading configuration.
///
/// These surface at construction time and never during a build.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid pipeline stage {stage:?}: {reason}")]
    InvalidConfiguration { stage: String, reason: String },
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid glob pattern {pattern:?}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

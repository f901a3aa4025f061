//! phpreflect - semantic models of PHP source files.
//!
//! phpreflect turns the syntax tree of one PHP file into a [`FileModel`]:
//! the namespaces, classes, interfaces, traits, functions and constants it
//! declares, keyed by their fully qualified names, plus the file's leading
//! documentation block.
//!
//! # Architecture
//!
//! - `ast`: provider boundary; owned syntax nodes and the tree-sitter PHP provider
//! - `strategy`: construction strategies and the registry that dispatches to them
//! - `factory`: the file model builder
//! - `pipeline`: middleware composed around every build
//! - `model`: FQSENs, elements, doc blocks and the file model
//! - `docblock`: doc-comment parsing
//! - `config`, `report`, `cli`: command-line tooling
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "tree-sitter")]
//! # fn main() -> anyhow::Result<()> {
//! use std::sync::Arc;
//! use phpreflect::{FileFactory, LocalFile, PhpAstProvider, StrategyRegistry};
//!
//! let factory = FileFactory::new(Arc::new(PhpAstProvider::new()), Vec::new());
//! let file = LocalFile::open("src/Kernel.php")?;
//! let model = factory.create(&file, &StrategyRegistry::default())?;
//! for class in model.classes().keys() {
//!     println!("{}", class);
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "tree-sitter"))]
//! # fn main() {}
//! ```
//!
//! # Adding a New Node Kind
//!
//! Emit it from a provider as `Syntax::Other`, implement
//! [`ProjectFactoryStrategy`] for it and register the strategy in front of
//! the standard set with [`StrategyRegistryBuilder`].

pub mod ast;
pub mod cli;
pub mod config;
pub mod docblock;
pub mod error;
pub mod factory;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod strategy;

#[cfg(feature = "tree-sitter")]
pub use ast::PhpAstProvider;
pub use ast::{AstProvider, Node, NodeKind, Syntax};
pub use config::Config;
pub use docblock::{DocBlockParser, StandardDocBlockParser};
pub use error::{BuildError, ConfigError, ParseError, StrategyError};
pub use factory::{BuildOptions, FileFactory};
pub use model::{DocBlock, DuplicatePolicy, Element, FileModel, Fqsen};
pub use pipeline::{CreateCommand, Middleware, MiddlewareCatalog, PipelineConfig};
pub use source::{Candidate, InMemoryFile, LocalFile, SourceFile};
pub use strategy::{Context, ProjectFactoryStrategy, StrategyRegistry, StrategyRegistryBuilder};

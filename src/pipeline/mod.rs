//! Middleware pipeline wrapped around the default file build.
//!
//! Middlewares are composed once, outermost first, into a single
//! [`Handler`]. Each one receives the command and a `next` continuation; it
//! may call `next` (optionally transforming the returned model) or return a
//! model of its own without calling it.
//!
//! ```text
//! create ──▶ trace ──▶ cache ──▶ default build
//!        ◀──       ◀──       ◀──
//! ```

mod cache;
mod catalog;
mod trace;

pub use cache::CacheMiddleware;
pub use catalog::{MiddlewareCatalog, MiddlewareConstructor};
pub use trace::TraceMiddleware;

use std::sync::Arc;

use serde::Deserialize;

use crate::error::BuildError;
use crate::model::FileModel;
use crate::source::SourceFile;
use crate::strategy::StrategyRegistry;

/// Request to build the model of one file.
#[derive(Clone, Copy)]
pub struct CreateCommand<'a> {
    pub file: &'a dyn SourceFile,
    pub strategies: &'a StrategyRegistry,
}

impl<'a> CreateCommand<'a> {
    pub fn new(file: &'a dyn SourceFile, strategies: &'a StrategyRegistry) -> Self {
        Self { file, strategies }
    }
}

/// Continuation handed to a middleware.
pub type Next<'n> = &'n dyn Fn(CreateCommand<'_>) -> Result<FileModel, BuildError>;

/// A composed pipeline, callable for any command.
pub type Handler =
    Arc<dyn for<'a> Fn(CreateCommand<'a>) -> Result<FileModel, BuildError> + Send + Sync>;

/// A stage wrapped around the file build.
pub trait Middleware: Send + Sync {
    fn execute(&self, command: CreateCommand<'_>, next: Next<'_>) -> Result<FileModel, BuildError>;
}

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: for<'a> Fn(CreateCommand<'a>) -> Result<FileModel, BuildError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Fold `middlewares` around `terminal`; the first middleware is outermost.
pub fn compose(middlewares: Vec<Arc<dyn Middleware>>, terminal: Handler) -> Handler {
    middlewares
        .into_iter()
        .rev()
        .fold(terminal, |next, middleware| {
            handler(move |command| middleware.execute(command, &*next))
        })
}

/// Named pipeline stages, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PipelineConfig {
    pub stages: Vec<String>,
}

impl PipelineConfig {
    pub fn new<I, S>(stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stages: stages.into_iter().map(Into::into).collect(),
        }
    }
}

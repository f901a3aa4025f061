use std::time::Instant;

use super::{CreateCommand, Middleware, Next};
use crate::error::BuildError;
use crate::model::FileModel;

/// Logs every build passing through it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceMiddleware;

impl Middleware for TraceMiddleware {
    fn execute(&self, command: CreateCommand<'_>, next: Next<'_>) -> Result<FileModel, BuildError> {
        let path = command.file.path().to_string();
        let started = Instant::now();
        tracing::debug!(path = %path, "building file model");

        let result = next(command);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        match &result {
            Ok(model) => tracing::debug!(
                path = %path,
                elapsed_ms,
                namespaces = model.namespaces().len(),
                elements = model.element_count(),
                "built file model"
            ),
            Err(e) => tracing::debug!(path = %path, elapsed_ms, error = %e, "file model build failed"),
        }
        result
    }
}

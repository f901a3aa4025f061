use std::collections::BTreeMap;
use std::sync::Arc;

use super::{CacheMiddleware, Middleware, PipelineConfig, TraceMiddleware};
use crate::error::ConfigError;

/// Creates a fresh middleware instance for a named stage.
pub type MiddlewareConstructor = fn() -> Arc<dyn Middleware>;

/// Maps stage names used in configuration to middleware constructors.
///
/// Resolution happens once, when a factory is constructed; a bad name is a
/// configuration error and never reaches a build.
#[derive(Clone, Default)]
pub struct MiddlewareCatalog {
    constructors: BTreeMap<String, MiddlewareConstructor>,
}

impl MiddlewareCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the built-in `cache` and `trace` stages.
    pub fn with_defaults() -> Self {
        Self::new()
            .register("cache", || Arc::new(CacheMiddleware::new()))
            .register("trace", || Arc::new(TraceMiddleware))
    }

    /// Add or replace a named stage.
    pub fn register(mut self, name: impl Into<String>, constructor: MiddlewareConstructor) -> Self {
        self.constructors.insert(name.into(), constructor);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Known stage names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Instantiate the stages of `config` in order.
    pub fn resolve(&self, config: &PipelineConfig) -> Result<Vec<Arc<dyn Middleware>>, ConfigError> {
        config
            .stages
            .iter()
            .map(|stage| {
                let name = stage.trim();
                if name.is_empty() {
                    return Err(ConfigError::InvalidConfiguration {
                        stage: stage.clone(),
                        reason: "stage name is empty".to_string(),
                    });
                }
                self.constructors
                    .get(name)
                    .map(|construct| construct())
                    .ok_or_else(|| ConfigError::InvalidConfiguration {
                        stage: stage.clone(),
                        reason: format!(
                            "not a known middleware (available: {})",
                            self.names().collect::<Vec<_>>().join(", ")
                        ),
                    })
            })
            .collect()
    }
}

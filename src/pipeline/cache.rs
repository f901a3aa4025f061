use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{CreateCommand, Middleware, Next};
use crate::error::BuildError;
use crate::model::FileModel;

/// Reuses the model of a file whose contents have not changed.
///
/// Entries are keyed by path and only returned while the stored fingerprint
/// and the registry that built the model both match the current command; on
/// a hit the rest of the pipeline is skipped.
#[derive(Debug, Default)]
pub struct CacheMiddleware {
    models: RwLock<HashMap<String, Entry>>,
}

#[derive(Debug)]
struct Entry {
    registry: u64,
    model: FileModel,
}

impl CacheMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.models.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.models
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Middleware for CacheMiddleware {
    fn execute(&self, command: CreateCommand<'_>, next: Next<'_>) -> Result<FileModel, BuildError> {
        let path = command.file.path().to_string();
        let hash = command.file.hash();
        let registry = command.strategies.id();

        {
            let models = self.models.read().unwrap_or_else(PoisonError::into_inner);
            let hit = models
                .get(&path)
                .filter(|e| e.registry == registry && e.model.hash() == hash);
            if let Some(entry) = hit {
                tracing::debug!(path = %path, "file model served from cache");
                return Ok(entry.model.clone());
            }
        }

        let model = next(command)?;
        self.models.write().unwrap_or_else(PoisonError::into_inner).insert(
            path,
            Entry {
                registry,
                model: model.clone(),
            },
        );
        Ok(model)
    }
}

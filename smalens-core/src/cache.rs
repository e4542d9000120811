//! Source-keyed memoization of pipeline results.
//!
//! Each distinct source runs the pipeline once; later lookups share the same
//! `Arc<Dataset>`. Keys are source identity (canonical path), not content, so
//! an edited file keeps serving the old table until `reload` or `invalidate`.
//! Failed runs are never stored.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::data::PipelineError;
use crate::pipeline::{Dataset, Pipeline};

#[derive(Debug, Default)]
pub struct TableCache {
    pipeline: Pipeline,
    entries: RwLock<HashMap<PathBuf, Arc<Dataset>>>,
}

impl TableCache {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cached dataset for `source`, running the pipeline on first use.
    pub fn get_or_load(&self, source: &Path) -> Result<Arc<Dataset>, PipelineError> {
        let key = source_key(source);
        if let Some(hit) = self.read().get(&key) {
            debug!(source = %key.display(), "table cache hit");
            return Ok(Arc::clone(hit));
        }

        debug!(source = %key.display(), "table cache miss");
        let dataset = Arc::new(self.pipeline.run(source)?);

        // Another caller may have raced us here; keep whichever landed first.
        let mut entries = self.write();
        let entry = entries.entry(key).or_insert(dataset);
        Ok(Arc::clone(entry))
    }

    /// Recompute `source` unconditionally and replace the cached entry.
    ///
    /// On failure the previous entry is left in place.
    pub fn reload(&self, source: &Path) -> Result<Arc<Dataset>, PipelineError> {
        let key = source_key(source);
        let dataset = Arc::new(self.pipeline.run(source)?);
        info!(source = %key.display(), "table reloaded");
        self.write().insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop the entry for `source`. Returns whether one was present.
    pub fn invalidate(&self, source: &Path) -> bool {
        let key = source_key(source);
        let removed = self.write().remove(&key).is_some();
        if removed {
            info!(source = %key.display(), "table invalidated");
        }
        removed
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn contains(&self, source: &Path) -> bool {
        self.read().contains_key(&source_key(source))
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    // Datasets are immutable once inserted, so a poisoned lock still guards a
    // consistent map.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<PathBuf, Arc<Dataset>>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<PathBuf, Arc<Dataset>>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Canonical path when the file exists, the given path otherwise.
fn source_key(source: &Path) -> PathBuf {
    std::fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf())
}

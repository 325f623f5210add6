//! Cache of engines built from documents on disk, keyed by source path.
//!
//! One cache is created per process (or per request scope) and handed to
//! [`Engine::load_engine`](crate::Engine::load_engine). Entries live as long
//! as the cache; nothing invalidates them when the file changes on disk.

use crate::error::EngineError;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub struct EngineCache<E> {
    engines: Mutex<HashMap<PathBuf, Arc<E>>>,
}

impl<E> EngineCache<E> {
    pub fn new() -> Self {
        Self {
            engines: Mutex::new(HashMap::new()),
        }
    }

    /// Canonical form of a source path, used as the cache key.
    ///
    /// Falls back to the absolute path when the file cannot be resolved, so a
    /// lookup for a file that has since disappeared still finds its entry.
    pub fn normalize(source: &Path) -> PathBuf {
        source
            .canonicalize()
            .or_else(|_| std::path::absolute(source))
            .unwrap_or_else(|_| source.to_path_buf())
    }

    /// Returns the cached engine for `source`, or runs `load` and caches its
    /// result. The lock is held across the whole check-load-insert sequence,
    /// so concurrent callers for the same source parse once. Failed loads
    /// leave the cache untouched.
    pub fn get_or_load<F>(&self, source: &Path, load: F) -> Result<Arc<E>, EngineError>
    where
        F: FnOnce(&Path) -> Result<E, EngineError>,
    {
        let key = Self::normalize(source);
        let mut engines = self
            .engines
            .lock()
            .map_err(|_| EngineError::LockPoisoned("engine cache"))?;

        if let Some(engine) = engines.get(&key) {
            debug!("Engine cache hit for {}", key.display());
            return Ok(Arc::clone(engine));
        }

        debug!("Engine cache miss for {}", key.display());
        let engine = Arc::new(load(&key)?);
        engines.insert(key, Arc::clone(&engine));
        Ok(engine)
    }

    pub fn get(&self, source: &Path) -> Option<Arc<E>> {
        let key = Self::normalize(source);
        self.engines.lock().ok()?.get(&key).cloned()
    }

    pub fn contains(&self, source: &Path) -> bool {
        self.get(source).is_some()
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.engines.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for EngineCache<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EngineCache<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineCache")
            .field("entries", &self.len())
            .finish()
    }
}

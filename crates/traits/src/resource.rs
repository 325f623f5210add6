//! ResourceProvider trait for abstracting where image and font bytes come from.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },
}

impl ResourceError {
    /// Classifies an I/O failure while reading `path`.
    pub fn from_io(path: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            ResourceError::NotFound(path.to_string())
        } else {
            ResourceError::LoadFailed {
                path: path.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Shared resource data type (reference-counted bytes).
pub type SharedResourceData = Arc<Vec<u8>>;

/// Loads raw resource bytes by key.
///
/// Engines resolve image locations and font files through a provider so
/// that the same engine code works against the filesystem or pre-populated
/// memory.
pub trait ResourceProvider: Send + Sync + Debug {
    /// Load a resource by its path/URI.
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError>;

    /// `true` if the resource exists and can be loaded.
    fn exists(&self, path: &str) -> bool;

    /// Human-readable provider name, used in log output.
    fn name(&self) -> &'static str;
}

/// A provider backed by a map that callers fill up front.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: RwLock<HashMap<String, SharedResourceData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `path`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, path: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        let path = path.into();
        let mut resources = self.resources.write().map_err(|_| ResourceError::LoadFailed {
            path: path.clone(),
            message: "resource store lock poisoned".to_string(),
        })?;
        resources.insert(path, Arc::new(data));
        Ok(())
    }

    /// Returns `None` if the lock is poisoned or the resource doesn't exist.
    pub fn remove(&self, path: &str) -> Option<SharedResourceData> {
        self.resources.write().ok()?.remove(path)
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let resources = self.resources.read().map_err(|_| ResourceError::LoadFailed {
            path: path.to_string(),
            message: "resource store lock poisoned".to_string(),
        })?;
        resources
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.resources
            .read()
            .map(|r| r.contains_key(path))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}

//! Filesystem-based resource provider.
//!
//! A provider is either sandboxed to a base directory (paths that would
//! escape it are reported as not found) or unrestricted, in which case
//! paths are used as given.

use folio_traits::{ResourceError, ResourceProvider, SharedResourceData};
use log::debug;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    /// `None` for unrestricted providers, otherwise the canonical sandbox root.
    sandbox: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    /// A provider confined to `base_path`. Absolute paths and `..` traversal
    /// outside the base are rejected.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let sandbox = Some(base.canonicalize().unwrap_or_else(|_| base.clone()));
        Self {
            base_path: base,
            sandbox,
        }
    }

    /// A provider that resolves paths as given, relative ones against the
    /// working directory.
    pub fn unrestricted() -> Self {
        Self {
            base_path: PathBuf::from("."),
            sandbox: None,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    pub fn is_sandboxed(&self) -> bool {
        self.sandbox.is_some()
    }

    /// Returns `None` if the path would escape the sandbox.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let requested = Path::new(path);
        let Some(root) = &self.sandbox else {
            return Some(if requested.is_absolute() {
                requested.to_path_buf()
            } else {
                self.base_path.join(requested)
            });
        };

        if requested.is_absolute() {
            return None;
        }
        let full_path = self.base_path.join(requested);
        if let Ok(canonical) = full_path.canonicalize() {
            return canonical.starts_with(root).then_some(canonical);
        }
        // Nonexistent file: refuse anything that walks upwards.
        if requested.components().any(|c| matches!(c, Component::ParentDir)) {
            return None;
        }
        Some(full_path)
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self.resolve(path).ok_or_else(|| {
            ResourceError::NotFound(format!("{} (outside of {})", path, self.base_path.display()))
        })?;
        debug!("Reading resource {}", full_path.display());

        std::fs::read(&full_path)
            .map(Arc::new)
            .map_err(|e| ResourceError::from_io(path, e))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}

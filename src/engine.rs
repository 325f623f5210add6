//! Runtime backend selection.

use crate::config::{EngineBackend, EngineConfig};
use crate::error::FolioError;
use folio_render_lopdf::LopdfEngine;
use folio_resource::FilesystemResourceProvider;
use folio_traits::{Engine, EngineCache, EngineError, ResourceProvider};
use folio_types::{EngineId, MetadataValue};
use std::path::Path;
use std::sync::Arc;

/// Loaded-document caches, one per backend.
#[derive(Debug, Default)]
pub struct EngineCaches {
    lopdf: EngineCache<LopdfEngine>,
}

impl EngineCaches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lopdf(&self) -> &EngineCache<LopdfEngine> {
        &self.lopdf
    }

    pub fn len(&self) -> usize {
        self.lopdf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An engine whose backend was picked from an [`EngineConfig`].
///
/// Backend-independent operations are forwarded; drawing goes through the
/// concrete engine (see [`AnyEngine::as_lopdf`]).
#[derive(Debug, Clone)]
pub enum AnyEngine {
    Lopdf(Arc<LopdfEngine>),
}

impl AnyEngine {
    /// Builds an engine, resolving resources under `config.resource_root`
    /// when set.
    pub fn from_config(config: &EngineConfig) -> Self {
        let provider: Arc<dyn ResourceProvider> = match &config.resource_root {
            Some(root) => Arc::new(FilesystemResourceProvider::new(root)),
            None => Arc::new(FilesystemResourceProvider::unrestricted()),
        };
        Self::with_provider(config, provider)
    }

    pub fn with_provider(config: &EngineConfig, provider: Arc<dyn ResourceProvider>) -> Self {
        match config.backend {
            EngineBackend::Lopdf => {
                let engine = LopdfEngine::with_settings(config.lopdf_settings(), provider);
                log::debug!("Created {} on the lopdf backend", engine.id());
                AnyEngine::Lopdf(Arc::new(engine))
            }
        }
    }

    pub fn backend(&self) -> EngineBackend {
        match self {
            AnyEngine::Lopdf(_) => EngineBackend::Lopdf,
        }
    }

    pub fn as_lopdf(&self) -> Option<&Arc<LopdfEngine>> {
        match self {
            AnyEngine::Lopdf(engine) => Some(engine),
        }
    }

    pub fn id(&self) -> EngineId {
        match self {
            AnyEngine::Lopdf(engine) => engine.id(),
        }
    }

    pub fn page_count(&self) -> Result<usize, EngineError> {
        match self {
            AnyEngine::Lopdf(engine) => engine.page_count(),
        }
    }

    /// Opens `source` with this engine's backend and settings. Repeated
    /// loads of the same file through the same `caches` share one engine.
    pub fn load(&self, caches: &EngineCaches, source: &Path) -> Result<AnyEngine, EngineError> {
        match self {
            AnyEngine::Lopdf(engine) => Ok(AnyEngine::Lopdf(
                engine.load_engine(caches.lopdf(), source)?,
            )),
        }
    }

    pub fn set_metadata_value(&self, name: &str, value: &str) -> Result<(), EngineError> {
        match self {
            AnyEngine::Lopdf(engine) => engine.set_metadata_value(name, value),
        }
    }

    pub fn metadata_value(&self, name: &str) -> Result<Option<MetadataValue>, EngineError> {
        match self {
            AnyEngine::Lopdf(engine) => engine.metadata_value(name),
        }
    }

    pub fn render(&self) -> Result<Vec<u8>, EngineError> {
        match self {
            AnyEngine::Lopdf(engine) => engine.render(),
        }
    }

    pub fn render_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), FolioError> {
        let path = path.as_ref();
        let bytes = self.render()?;
        std::fs::write(path, &bytes)?;
        log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

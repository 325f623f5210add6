use crate::error::FolioError;
use folio_render_lopdf::{LopdfSettings, DEFAULT_PDF_VERSION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Selects the PDF backend an [`AnyEngine`](crate::AnyEngine) is built on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineBackend {
    /// In-memory document editing using `lopdf`.
    #[default]
    Lopdf,
}

/// Engine construction settings.
///
/// Every field has a default, so a partial JSON object is a valid
/// configuration:
///
/// ```
/// let config = folio::EngineConfig::from_json(r#"{ "pdfVersion": "1.5" }"#).unwrap();
/// assert_eq!(config.pdf_version, "1.5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub backend: EngineBackend,
    /// Header version for newly created documents.
    pub pdf_version: String,
    /// Overrides the `/Producer` written on render.
    pub producer: Option<String>,
    /// Images and fonts are resolved inside this directory. Without it,
    /// resource paths are used as given.
    pub resource_root: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: EngineBackend::default(),
            pdf_version: DEFAULT_PDF_VERSION.to_string(),
            producer: None,
            resource_root: None,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: EngineBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_pdf_version(mut self, version: impl Into<String>) -> Self {
        self.pdf_version = version.into();
        self
    }

    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = Some(producer.into());
        self
    }

    pub fn with_resource_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.resource_root = Some(root.as_ref().to_path_buf());
        self
    }

    pub fn from_json(json: &str) -> Result<Self, FolioError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FolioError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded engine configuration from {}", path.display());
        Ok(config)
    }

    pub(crate) fn lopdf_settings(&self) -> LopdfSettings {
        let defaults = LopdfSettings::default();
        LopdfSettings {
            pdf_version: self.pdf_version.clone(),
            producer: self.producer.clone().unwrap_or(defaults.producer),
        }
    }
}

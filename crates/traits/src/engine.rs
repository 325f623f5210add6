//! The abstract factory every rendering backend implements.

use crate::cache::EngineCache;
use crate::error::EngineError;
use folio_types::{EngineId, MetadataValue, PageSize};
use std::path::Path;
use std::sync::Arc;

/// A graphics engine owns one document and everything drawn into it.
///
/// Layout and composition code talks to this trait only. Each backend
/// supplies its own context and resource types; consumers stay generic over
/// `E: Engine` (or go through a backend-tagged enum when the backend is
/// chosen at runtime).
///
/// Colors and images are deduplicated per engine: requesting the same key
/// twice returns the same `Arc`. Fonts are built fresh on every request.
pub trait Engine: Send + Sync + Sized {
    type GraphicsContext: Send + Sync;
    type Color: Send + Sync;
    type Image: Send + Sync;
    type Font: Send + Sync;

    fn id(&self) -> EngineId;

    /// Creates a page-sized drawing surface bound to this engine.
    ///
    /// The context is not part of the document until it is passed to
    /// [`attach_graphics_context`](Engine::attach_graphics_context).
    fn create_graphics_context(
        &self,
        size: PageSize,
    ) -> Result<Arc<Self::GraphicsContext>, EngineError>;

    /// Appends the context's page to the document. Attachment order is page
    /// order. Attaching a context twice, or one created by another engine,
    /// is a `PreconditionViolation`.
    fn attach_graphics_context(&self, gc: &Arc<Self::GraphicsContext>) -> Result<(), EngineError>;

    fn attached_graphics_contexts(&self) -> Result<Vec<Arc<Self::GraphicsContext>>, EngineError>;

    fn create_color(&self, data: &str) -> Result<Arc<Self::Color>, EngineError>;

    fn create_image(&self, data: &str) -> Result<Arc<Self::Image>, EngineError>;

    fn create_font(&self, data: &str) -> Result<Arc<Self::Font>, EngineError>;

    /// Serializes the document, pages in attachment order.
    fn render(&self) -> Result<Vec<u8>, EngineError>;

    /// Opens an existing PDF as an editable engine, reusing the entry in
    /// `cache` when this source was loaded before.
    fn load_engine(
        &self,
        cache: &EngineCache<Self>,
        source: &Path,
    ) -> Result<Arc<Self>, EngineError>;

    /// Sets one document information entry. Unknown names are ignored.
    fn set_metadata_value(&self, name: &str, value: &str) -> Result<(), EngineError>;

    fn metadata_value(&self, name: &str) -> Result<Option<MetadataValue>, EngineError>;
}

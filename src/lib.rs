//! Folio: a PDF graphics engine built as an abstract factory.
//!
//! An engine owns one document. Callers create page-sized graphics
//! contexts, draw into them, attach them (attachment order is page order),
//! set document information and render to bytes. Existing PDFs are opened
//! through an [`EngineCache`], so loading the same file twice yields the same
//! engine.
//!
//! ```
//! use folio::{Engine, InMemoryResourceProvider, LopdfEngine, PageSize};
//! use std::sync::Arc;
//!
//! let engine = LopdfEngine::new(Arc::new(InMemoryResourceProvider::new()));
//! let page = engine.create_graphics_context(PageSize::A4)?;
//! engine.attach_graphics_context(&page)?;
//! engine.set_metadata_value("Title", "Quarterly report")?;
//! let pdf = engine.render()?;
//! assert!(pdf.starts_with(b"%PDF-"));
//! # Ok::<(), folio::EngineError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;

pub use config::{EngineBackend, EngineConfig};
pub use engine::{AnyEngine, EngineCaches};
pub use error::FolioError;

pub use folio_render_lopdf::{
    Color, ColorError, Font, FontError, FontMetrics, GraphicsContext, Image, LopdfEngine,
    LopdfSettings, Outline, PageSurface, STANDARD_FONTS,
};
pub use folio_resource::FilesystemResourceProvider;
pub use folio_traits::{
    Engine, EngineCache, EngineError, InMemoryResourceProvider, ResourceError, ResourceProvider,
    SharedResourceData,
};
pub use folio_types::{
    convert_boolean_value, parse_date, parse_pdf_date, pdf_date, DateError, EngineId,
    MetadataKey, MetadataValue, PageSize, PageSizeError, ResourceKey,
};

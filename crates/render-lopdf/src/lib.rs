//! PDF graphics engine built on lopdf.
//!
//! [`LopdfEngine`] owns one in-memory document. Pages are added by attaching
//! [`GraphicsContext`]s, colors and images are cached per engine, and
//! [`Engine::render`](folio_traits::Engine::render) serializes the document to
//! bytes without consuming it.

mod color;
mod composer;
mod context;
mod engine;
mod font;
mod metadata;
mod outline;
mod raster;

pub use color::{Color, ColorError};
pub use context::{GraphicsContext, PageSurface};
pub use engine::{LopdfEngine, LopdfSettings, DEFAULT_PDF_VERSION};
pub use font::{Font, FontError, FontMetrics, STANDARD_FONTS};
pub use outline::Outline;
pub use raster::Image;

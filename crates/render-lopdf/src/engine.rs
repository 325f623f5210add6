use crate::color::Color;
use crate::composer;
use crate::context::GraphicsContext;
use crate::font::Font;
use crate::metadata;
use crate::outline::{self, Outline};
use crate::raster::Image;
use folio_traits::{Engine, EngineCache, EngineError, ResourceProvider};
use folio_types::{
    convert_boolean_value, parse_date, pdf_date, EngineId, MetadataKey, MetadataValue, PageSize,
    ResourceKey,
};
use log::{debug, info};
use lopdf::{Document, Object, ObjectId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub const DEFAULT_PDF_VERSION: &str = "1.7";

/// Backend settings shared by an engine and every engine it loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LopdfSettings {
    pub pdf_version: String,
    /// Written to `/Producer` on every render.
    pub producer: String,
}

impl Default for LopdfSettings {
    fn default() -> Self {
        Self {
            pdf_version: DEFAULT_PDF_VERSION.to_string(),
            producer: format!("Folio {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

struct DocumentState {
    document: Document,
    /// Root node of the page tree; new pages are appended here.
    pages_id: ObjectId,
    /// Attached contexts in page order.
    contexts: Vec<Arc<GraphicsContext>>,
}

/// A graphics engine backed by an in-memory `lopdf::Document`.
pub struct LopdfEngine {
    id: EngineId,
    settings: LopdfSettings,
    provider: Arc<dyn ResourceProvider>,
    state: Mutex<DocumentState>,
    colors: Mutex<HashMap<ResourceKey, Arc<Color>>>,
    images: Mutex<HashMap<ResourceKey, Arc<Image>>>,
    outlines: Mutex<BTreeMap<String, Outline>>,
}

impl LopdfEngine {
    pub fn new(provider: Arc<dyn ResourceProvider>) -> Self {
        Self::with_settings(LopdfSettings::default(), provider)
    }

    pub fn with_settings(settings: LopdfSettings, provider: Arc<dyn ResourceProvider>) -> Self {
        let (document, pages_id) = composer::new_document(&settings.pdf_version);
        Self::build(document, pages_id, settings, provider)
    }

    /// Wraps an already parsed document. Every existing page gets a graphics
    /// context, attached in page order.
    pub fn from_document(
        document: Document,
        settings: LopdfSettings,
        provider: Arc<dyn ResourceProvider>,
    ) -> Result<Self, EngineError> {
        let pages_id = composer::pages_root(&document)?;
        let existing: Vec<(ObjectId, PageSize)> = document
            .get_pages()
            .into_values()
            .map(|page_id| (page_id, composer::page_size(&document, page_id)))
            .collect();

        let engine = Self::build(document, pages_id, settings, provider);
        for (page_id, size) in existing {
            let gc = Arc::new(GraphicsContext::for_existing_page(engine.id, page_id, size));
            engine.attach_graphics_context(&gc)?;
        }
        Ok(engine)
    }

    /// Reads and parses the PDF at `path`, bypassing any cache.
    pub fn open(
        path: &Path,
        settings: LopdfSettings,
        provider: Arc<dyn ResourceProvider>,
    ) -> Result<Self, EngineError> {
        let bytes = std::fs::read(path).map_err(|e| {
            EngineError::ResourceNotFound(format!("{}: {}", path.display(), e))
        })?;
        let invalid = |message: String| EngineError::InvalidDocumentFormat {
            path: path.display().to_string(),
            message,
        };

        let document = Document::load_mem(&bytes).map_err(|e| invalid(e.to_string()))?;
        let engine = Self::from_document(document, settings, provider).map_err(|e| match e {
            EngineError::Pdf(message) => invalid(message),
            other => other,
        })?;

        info!(
            "Loaded {} as {} with {} pages",
            path.display(),
            engine.id,
            engine.page_count()?
        );
        Ok(engine)
    }

    fn build(
        document: Document,
        pages_id: ObjectId,
        settings: LopdfSettings,
        provider: Arc<dyn ResourceProvider>,
    ) -> Self {
        Self {
            id: EngineId::next(),
            settings,
            provider,
            state: Mutex::new(DocumentState {
                document,
                pages_id,
                contexts: Vec::new(),
            }),
            colors: Mutex::new(HashMap::new()),
            images: Mutex::new(HashMap::new()),
            outlines: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn settings(&self) -> &LopdfSettings {
        &self.settings
    }

    pub fn provider(&self) -> &Arc<dyn ResourceProvider> {
        &self.provider
    }

    /// Whether `gc` was created by (or loaded into) this engine.
    pub fn owns(&self, gc: &GraphicsContext) -> bool {
        gc.engine_id() == self.id
    }

    /// Number of pages in the underlying document.
    pub fn page_count(&self) -> Result<usize, EngineError> {
        self.with_document(|doc| doc.get_pages().len())
    }

    /// Read access to the underlying document.
    pub fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> Result<R, EngineError> {
        Ok(f(&self.state()?.document))
    }

    /// Registers (or replaces) a bookmark, written on the next render.
    pub fn register_outline(
        &self,
        id: impl Into<String>,
        outline: Outline,
    ) -> Result<(), EngineError> {
        self.lock_outlines()?.insert(id.into(), outline);
        Ok(())
    }

    pub fn outline(&self, id: &str) -> Result<Option<Outline>, EngineError> {
        Ok(self.lock_outlines()?.get(id).cloned())
    }

    fn state(&self) -> Result<MutexGuard<'_, DocumentState>, EngineError> {
        self.state
            .lock()
            .map_err(|_| EngineError::LockPoisoned("engine document"))
    }

    fn lock_outlines(&self) -> Result<MutexGuard<'_, BTreeMap<String, Outline>>, EngineError> {
        self.outlines
            .lock()
            .map_err(|_| EngineError::LockPoisoned("outline registry"))
    }
}

impl fmt::Debug for LopdfEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LopdfEngine")
            .field("id", &self.id)
            .field("settings", &self.settings)
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

impl Engine for LopdfEngine {
    type GraphicsContext = GraphicsContext;
    type Color = Color;
    type Image = Image;
    type Font = Font;

    fn id(&self) -> EngineId {
        self.id
    }

    fn create_graphics_context(&self, size: PageSize) -> Result<Arc<GraphicsContext>, EngineError> {
        size.validate()?;
        Ok(Arc::new(GraphicsContext::new(self.id, size)))
    }

    fn attach_graphics_context(&self, gc: &Arc<GraphicsContext>) -> Result<(), EngineError> {
        if !self.owns(gc) {
            return Err(EngineError::PreconditionViolation(format!(
                "graphics context belongs to {}, not {}",
                gc.engine_id(),
                self.id
            )));
        }

        let mut state = self.state()?;
        if gc.is_attached() || state.contexts.iter().any(|c| Arc::ptr_eq(c, gc)) {
            return Err(EngineError::PreconditionViolation(
                "graphics context is already attached".into(),
            ));
        }

        let page_id = match gc.existing_page() {
            Some(page_id) => {
                if state.contexts.iter().any(|c| c.page_id() == Some(page_id)) {
                    return Err(EngineError::PreconditionViolation(format!(
                        "page {:?} already has a graphics context",
                        page_id
                    )));
                }
                page_id
            }
            None => {
                let pages_id = state.pages_id;
                composer::append_page(&mut state.document, pages_id, gc.size())?
            }
        };

        gc.bind(page_id)?;
        state.contexts.push(Arc::clone(gc));
        debug!(
            "Attached page {:?} to {} as page {}",
            page_id,
            self.id,
            state.contexts.len()
        );
        Ok(())
    }

    fn attached_graphics_contexts(&self) -> Result<Vec<Arc<GraphicsContext>>, EngineError> {
        Ok(self.state()?.contexts.clone())
    }

    fn create_color(&self, data: &str) -> Result<Arc<Color>, EngineError> {
        let key = ResourceKey::from(data);
        let mut colors = self
            .colors
            .lock()
            .map_err(|_| EngineError::LockPoisoned("color cache"))?;
        if let Some(color) = colors.get(&key) {
            return Ok(Arc::clone(color));
        }

        let color = Color::parse(key.clone()).map_err(|e| EngineError::InvalidResource {
            key: data.to_string(),
            message: e.to_string(),
        })?;
        let color = Arc::new(color);
        colors.insert(key, Arc::clone(&color));
        Ok(color)
    }

    fn create_image(&self, data: &str) -> Result<Arc<Image>, EngineError> {
        let key = ResourceKey::from(data);
        let mut images = self
            .images
            .lock()
            .map_err(|_| EngineError::LockPoisoned("image cache"))?;
        if let Some(image) = images.get(&key) {
            return Ok(Arc::clone(image));
        }

        let bytes = self.provider.load(data)?;
        let image = Image::decode(key.clone(), &bytes).map_err(|e| EngineError::InvalidResource {
            key: data.to_string(),
            message: e.to_string(),
        })?;
        debug!(
            "Decoded image '{}' ({}x{}) via {}",
            data,
            image.width(),
            image.height(),
            self.provider.name()
        );
        let image = Arc::new(image);
        images.insert(key, Arc::clone(&image));
        Ok(image)
    }

    fn create_font(&self, data: &str) -> Result<Arc<Font>, EngineError> {
        if let Some(font) = Font::standard(data) {
            return Ok(Arc::new(font));
        }
        let bytes = self.provider.load(data)?;
        let font = Font::from_bytes(bytes).map_err(|e| EngineError::InvalidResource {
            key: data.to_string(),
            message: e.to_string(),
        })?;
        Ok(Arc::new(font))
    }

    fn render(&self) -> Result<Vec<u8>, EngineError> {
        let mut state = self.state()?;
        metadata::set_entry(
            &mut state.document,
            "Producer",
            metadata::text_string(&self.settings.producer),
        )?;

        // Drawing is applied to a copy so that repeated renders start from the
        // same document and produce the same bytes.
        let mut snapshot = state.document.clone();
        let mut page_ids = Vec::with_capacity(state.contexts.len());
        for gc in &state.contexts {
            let page_id = gc.page_id().ok_or_else(|| {
                EngineError::PreconditionViolation("attached graphics context has no page".into())
            })?;
            page_ids.push(page_id);
            if let Some(content) = gc.page().encode()? {
                composer::overlay_content(&mut snapshot, page_id, content, gc.wraps_existing_page())?;
            }
        }
        drop(state);

        outline::write_outlines(&mut snapshot, &page_ids, self.lock_outlines()?.values())?;

        let mut bytes = Vec::new();
        snapshot
            .save_to(&mut bytes)
            .map_err(|e| EngineError::Pdf(e.to_string()))?;
        debug!("Rendered {} ({} pages, {} bytes)", self.id, page_ids.len(), bytes.len());
        Ok(bytes)
    }

    fn load_engine(
        &self,
        cache: &EngineCache<Self>,
        source: &Path,
    ) -> Result<Arc<Self>, EngineError> {
        cache.get_or_load(source, |path| {
            Self::open(path, self.settings.clone(), Arc::clone(&self.provider))
        })
    }

    fn set_metadata_value(&self, name: &str, value: &str) -> Result<(), EngineError> {
        let Some(key) = MetadataKey::from_name(name) else {
            debug!("Ignoring unsupported metadata key '{}'", name);
            return Ok(());
        };

        let object = match key {
            MetadataKey::Trapped if value == "null" => Object::Null,
            MetadataKey::Trapped => Object::Boolean(convert_boolean_value(value)),
            key if key.is_date() => {
                let instant = parse_date(value).map_err(|_| EngineError::InvalidMetadataValue {
                    key,
                    value: value.to_string(),
                })?;
                Object::string_literal(pdf_date(instant))
            }
            _ => metadata::text_string(value),
        };

        let mut state = self.state()?;
        metadata::set_entry(&mut state.document, key.as_str(), object)
    }

    fn metadata_value(&self, name: &str) -> Result<Option<MetadataValue>, EngineError> {
        self.with_document(|doc| metadata::entry(doc, name))
    }
}

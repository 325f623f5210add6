use folio_traits::EngineError;
use folio_types::{EngineId, PageSize};
use lopdf::content::{Content, Operation};
use lopdf::ObjectId;
use std::sync::{Mutex, OnceLock};

/// The drawable side of a page: its size and the content operations
/// recorded for it so far.
///
/// Drawing code appends raw operations; they are written to the page as a
/// content stream whenever the owning engine renders.
#[derive(Debug)]
pub struct PageSurface {
    size: PageSize,
    operations: Mutex<Vec<Operation>>,
}

impl PageSurface {
    pub(crate) fn new(size: PageSize) -> Self {
        Self {
            size,
            operations: Mutex::new(Vec::new()),
        }
    }

    pub fn size(&self) -> &PageSize {
        &self.size
    }

    pub fn push(&self, operation: Operation) -> Result<(), EngineError> {
        self.lock()?.push(operation);
        Ok(())
    }

    pub fn extend<I>(&self, operations: I) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = Operation>,
    {
        self.lock()?.extend(operations);
        Ok(())
    }

    pub fn operations(&self) -> Result<Vec<Operation>, EngineError> {
        Ok(self.lock()?.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.operations.lock().map(|ops| ops.is_empty()).unwrap_or(true)
    }

    /// Encodes the recorded operations, or `None` if nothing was drawn.
    pub(crate) fn encode(&self) -> Result<Option<Vec<u8>>, EngineError> {
        let operations = self.operations()?;
        if operations.is_empty() {
            return Ok(None);
        }
        Content { operations }
            .encode()
            .map(Some)
            .map_err(crate::composer::pdf_err)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Operation>>, EngineError> {
        self.operations
            .lock()
            .map_err(|_| EngineError::LockPoisoned("page surface"))
    }
}

/// A page surface bound to one engine and, once attached, to one page slot
/// of that engine's document.
///
/// The context only records which engine it belongs to; the engine owns the
/// page sequence.
#[derive(Debug)]
pub struct GraphicsContext {
    engine: EngineId,
    surface: PageSurface,
    /// Set for contexts wrapping a page that already existed in a loaded file.
    existing_page: Option<ObjectId>,
    slot: OnceLock<ObjectId>,
}

impl GraphicsContext {
    pub(crate) fn new(engine: EngineId, size: PageSize) -> Self {
        Self {
            engine,
            surface: PageSurface::new(size),
            existing_page: None,
            slot: OnceLock::new(),
        }
    }

    pub(crate) fn for_existing_page(engine: EngineId, page_id: ObjectId, size: PageSize) -> Self {
        Self {
            existing_page: Some(page_id),
            ..Self::new(engine, size)
        }
    }

    pub fn engine_id(&self) -> EngineId {
        self.engine
    }

    pub fn page(&self) -> &PageSurface {
        &self.surface
    }

    pub fn size(&self) -> &PageSize {
        self.surface.size()
    }

    pub fn is_attached(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Object id of the page this context draws on, once attached.
    pub fn page_id(&self) -> Option<ObjectId> {
        self.slot.get().copied()
    }

    /// Whether the page carried content of its own before this context
    /// wrapped it.
    pub fn wraps_existing_page(&self) -> bool {
        self.existing_page.is_some()
    }

    pub(crate) fn existing_page(&self) -> Option<ObjectId> {
        self.existing_page
    }

    pub(crate) fn bind(&self, page_id: ObjectId) -> Result<(), EngineError> {
        self.slot.set(page_id).map_err(|_| {
            EngineError::PreconditionViolation("graphics context is already attached".into())
        })
    }
}

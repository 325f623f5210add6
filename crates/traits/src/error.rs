use crate::resource::ResourceError;
use folio_types::{MetadataKey, PageSizeError};
use thiserror::Error;

/// Errors surfaced by every engine operation.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Invalid PDF document '{path}': {message}")]
    InvalidDocumentFormat { path: String, message: String },

    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("Invalid resource '{key}': {message}")]
    InvalidResource { key: String, message: String },

    #[error("Invalid value '{value}' for metadata key {key}")]
    InvalidMetadataValue { key: MetadataKey, value: String },

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

impl From<ResourceError> for EngineError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound(path) => EngineError::ResourceNotFound(path),
            ResourceError::LoadFailed { path, message } => EngineError::InvalidResource {
                key: path,
                message,
            },
        }
    }
}

impl From<PageSizeError> for EngineError {
    fn from(err: PageSizeError) -> Self {
        EngineError::PreconditionViolation(err.to_string())
    }
}

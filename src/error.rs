use folio_traits::EngineError;
use thiserror::Error;

/// Errors surfaced by the top-level configuration and facade API.
#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

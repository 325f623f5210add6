pub mod cache;
pub mod engine;
pub mod error;
pub mod resource;

pub use cache::EngineCache;
pub use engine::Engine;
pub use error::EngineError;
pub use resource::{InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData};

//! Resource providers for Folio engines.
//!
//! - [`FilesystemResourceProvider`]: loads image and font bytes from disk
//! - [`InMemoryResourceProvider`]: re-exported from folio-traits

mod filesystem;

pub use filesystem::FilesystemResourceProvider;

pub use folio_traits::InMemoryResourceProvider;

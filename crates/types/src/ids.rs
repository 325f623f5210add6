//! Newtype wrappers for identifiers shared across crates.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// The content key of a cached resource (a color spec or an image location).
///
/// Two keys are equal exactly when their strings are byte-identical.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ResourceKey(Arc<str>);

impl ResourceKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ResourceKey {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for ResourceKey {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for ResourceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static NEXT_ENGINE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an engine instance.
///
/// Graphics contexts carry this instead of a pointer to their engine.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct EngineId(u64);

impl EngineId {
    pub fn next() -> Self {
        Self(NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine#{}", self.0)
    }
}

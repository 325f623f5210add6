//! Document information keys and the values stored under them.
use serde::{Deserialize, Serialize};
use std::fmt;

/// The document information entries an engine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataKey {
    Title,
    Author,
    Subject,
    Keywords,
    Creator,
    Trapped,
    CreationDate,
    ModDate,
}

impl MetadataKey {
    pub const ALL: [MetadataKey; 8] = [
        MetadataKey::Title,
        MetadataKey::Author,
        MetadataKey::Subject,
        MetadataKey::Keywords,
        MetadataKey::Creator,
        MetadataKey::Trapped,
        MetadataKey::CreationDate,
        MetadataKey::ModDate,
    ];

    /// Looks up a key by its PDF name. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataKey::Title => "Title",
            MetadataKey::Author => "Author",
            MetadataKey::Subject => "Subject",
            MetadataKey::Keywords => "Keywords",
            MetadataKey::Creator => "Creator",
            MetadataKey::Trapped => "Trapped",
            MetadataKey::CreationDate => "CreationDate",
            MetadataKey::ModDate => "ModDate",
        }
    }

    pub fn is_date(&self) -> bool {
        matches!(self, MetadataKey::CreationDate | MetadataKey::ModDate)
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value read back from the document information dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataValue {
    Null,
    Boolean(bool),
    Text(String),
}

impl MetadataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Loose boolean coercion for string inputs such as `"yes"` or `"0"`.
///
/// Unknown non-empty strings count as true.
pub fn convert_boolean_value(value: &str) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" | "" => false,
        _ => true,
    }
}

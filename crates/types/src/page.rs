//! Page dimensions for graphics contexts.
use serde::{de, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageSizeError {
    #[error("Unknown page size: {0}")]
    Unknown(String),
    #[error("Invalid page dimension '{0}'")]
    InvalidNumber(String),
    #[error("Page dimensions must be positive and finite, got {width}x{height}")]
    OutOfRange { width: f32, height: f32 },
}

/// Size of a page surface in PDF points (1/72 inch).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PageSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom { width: f32, height: f32 },
}

impl Eq for PageSize {}

impl Hash for PageSize {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            PageSize::A3 => 0u8.hash(state),
            PageSize::A4 => 1u8.hash(state),
            PageSize::A5 => 2u8.hash(state),
            PageSize::Letter => 3u8.hash(state),
            PageSize::Legal => 4u8.hash(state),
            PageSize::Custom { width, height } => {
                5u8.hash(state);
                width.to_bits().hash(state);
                height.to_bits().hash(state);
            }
        }
    }
}

impl PageSize {
    pub fn custom(width: f32, height: f32) -> Self {
        PageSize::Custom { width, height }
    }

    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    pub fn width(&self) -> f32 {
        self.dimensions_pt().0
    }

    pub fn height(&self) -> f32 {
        self.dimensions_pt().1
    }

    /// Rejects zero, negative, NaN and infinite dimensions.
    pub fn validate(&self) -> Result<(), PageSizeError> {
        let (width, height) = self.dimensions_pt();
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(())
        } else {
            Err(PageSizeError::OutOfRange { width, height })
        }
    }

    /// Parse a page size name ("A4", "letter") or a `width:height` pair in points.
    ///
    /// A trailing colon (`"595:842:"`) is tolerated.
    pub fn parse(s: &str) -> Result<Self, PageSizeError> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "a3" => return Ok(PageSize::A3),
            "a4" => return Ok(PageSize::A4),
            "a5" => return Ok(PageSize::A5),
            "letter" => return Ok(PageSize::Letter),
            "legal" => return Ok(PageSize::Legal),
            _ => {}
        }

        let parts: Vec<&str> = trimmed
            .trim_end_matches(':')
            .split(':')
            .map(str::trim)
            .collect();
        if parts.len() != 2 {
            return Err(PageSizeError::Unknown(s.to_string()));
        }
        let parse_part = |part: &str| {
            part.parse::<f32>()
                .map_err(|_| PageSizeError::InvalidNumber(part.to_string()))
        };
        let size = PageSize::Custom {
            width: parse_part(parts[0])?,
            height: parse_part(parts[1])?,
        };
        size.validate()?;
        Ok(size)
    }
}

impl FromStr for PageSize {
    type Err = PageSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions_pt();
        write!(f, "{}:{}", width, height)
    }
}

impl From<(f32, f32)> for PageSize {
    fn from((width, height): (f32, f32)) -> Self {
        PageSize::Custom { width, height }
    }
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PageSize::A3 => serializer.serialize_str("A3"),
            PageSize::A4 => serializer.serialize_str("A4"),
            PageSize::A5 => serializer.serialize_str("A5"),
            PageSize::Letter => serializer.serialize_str("Letter"),
            PageSize::Legal => serializer.serialize_str("Legal"),
            PageSize::Custom { width, height } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("width", width)?;
                map.serialize_entry("height", height)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageSizeDef {
            Str(String),
            Map { width: f32, height: f32 },
        }

        match PageSizeDef::deserialize(deserializer)? {
            PageSizeDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            PageSizeDef::Map { width, height } => Ok(PageSize::Custom { width, height }),
        }
    }
}

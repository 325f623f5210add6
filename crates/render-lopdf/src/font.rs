use folio_traits::SharedResourceData;
use lopdf::{dictionary, Dictionary};
use thiserror::Error;
use ttf_parser::name_id;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    #[error("Font data could not be parsed: {0}")]
    Parse(String),
    #[error("Font has no usable name")]
    Unnamed,
}

/// The 14 fonts every PDF reader provides without embedding.
pub const STANDARD_FONTS: [&str; 14] = [
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "Symbol",
    "ZapfDingbats",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
}

#[derive(Debug, Clone)]
enum FontSource {
    Standard,
    TrueType {
        data: SharedResourceData,
        metrics: FontMetrics,
    },
}

/// A font resource: either a standard PDF font referenced by name or a
/// TrueType/OpenType face supplied as bytes.
#[derive(Debug, Clone)]
pub struct Font {
    postscript_name: String,
    source: FontSource,
}

impl Font {
    /// Returns `None` when `name` is not one of [`STANDARD_FONTS`].
    pub fn standard(name: &str) -> Option<Self> {
        STANDARD_FONTS.contains(&name).then(|| Self {
            postscript_name: name.to_string(),
            source: FontSource::Standard,
        })
    }

    pub fn from_bytes(data: SharedResourceData) -> Result<Self, FontError> {
        let face =
            ttf_parser::Face::parse(&data, 0).map_err(|e| FontError::Parse(e.to_string()))?;

        let name_of = |id: u16| {
            face.names()
                .into_iter()
                .find(|n| n.name_id == id)
                .and_then(|n| n.to_string())
        };
        let postscript_name = name_of(name_id::POST_SCRIPT_NAME)
            .or_else(|| name_of(name_id::FULL_NAME).map(|n| n.replace(' ', "")))
            .or_else(|| name_of(name_id::FAMILY).map(|n| n.replace(' ', "")))
            .ok_or(FontError::Unnamed)?;
        log::debug!("Parsed font face {}", postscript_name);

        let metrics = FontMetrics {
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
        };
        drop(face);

        Ok(Self {
            postscript_name,
            source: FontSource::TrueType { data, metrics },
        })
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    pub fn is_standard(&self) -> bool {
        matches!(self.source, FontSource::Standard)
    }

    pub fn metrics(&self) -> Option<FontMetrics> {
        match &self.source {
            FontSource::Standard => None,
            FontSource::TrueType { metrics, .. } => Some(*metrics),
        }
    }

    /// Raw font program, for faces that need embedding.
    pub fn data(&self) -> Option<&SharedResourceData> {
        match &self.source {
            FontSource::Standard => None,
            FontSource::TrueType { data, .. } => Some(data),
        }
    }

    /// The `/Font` resource dictionary referencing this face.
    pub fn dictionary(&self) -> Dictionary {
        match self.source {
            FontSource::Standard => dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => self.postscript_name.as_str(),
                "Encoding" => "WinAnsiEncoding",
            },
            FontSource::TrueType { .. } => dictionary! {
                "Type" => "Font",
                "Subtype" => "TrueType",
                "BaseFont" => self.postscript_name.as_str(),
                "Encoding" => "WinAnsiEncoding",
            },
        }
    }
}

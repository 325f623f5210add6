use folio_types::ResourceKey;
use lopdf::content::Operation;
use lopdf::Object;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("Invalid hex color '{0}': expected #RGB or #RRGGBB")]
    InvalidHex(String),
    #[error("Unknown color name '{0}'")]
    UnknownName(String),
}

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("silver", (192, 192, 192)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("white", (255, 255, 255)),
    ("maroon", (128, 0, 0)),
    ("red", (255, 0, 0)),
    ("purple", (128, 0, 128)),
    ("fuchsia", (255, 0, 255)),
    ("magenta", (255, 0, 255)),
    ("green", (0, 128, 0)),
    ("lime", (0, 255, 0)),
    ("olive", (128, 128, 0)),
    ("yellow", (255, 255, 0)),
    ("navy", (0, 0, 128)),
    ("blue", (0, 0, 255)),
    ("teal", (0, 128, 128)),
    ("aqua", (0, 255, 255)),
    ("cyan", (0, 255, 255)),
    ("orange", (255, 165, 0)),
    ("brown", (165, 42, 42)),
    ("pink", (255, 192, 203)),
    ("gold", (255, 215, 0)),
    ("lightgray", (211, 211, 211)),
    ("lightgrey", (211, 211, 211)),
    ("darkgray", (169, 169, 169)),
    ("darkgrey", (169, 169, 169)),
];

/// An RGB color resource, built from an HTML-style spec (`#336699`, `#fff`, `navy`).
#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    key: ResourceKey,
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    pub fn parse(key: ResourceKey) -> Result<Self, ColorError> {
        let spec = key.as_str().trim();
        let (r, g, b) = if let Some(hex) = spec.strip_prefix('#') {
            parse_hex(hex).ok_or_else(|| ColorError::InvalidHex(spec.to_string()))?
        } else {
            let name = spec.to_ascii_lowercase();
            NAMED_COLORS
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, rgb)| *rgb)
                .ok_or_else(|| ColorError::UnknownName(spec.to_string()))?
        };
        Ok(Self { key, r, g, b })
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Components scaled to the 0..=1 range PDF operators expect.
    pub fn components(&self) -> [f32; 3] {
        [self.r, self.g, self.b].map(|c| c as f32 / 255.0)
    }

    pub fn fill_operation(&self) -> Operation {
        Operation::new("rg", self.components().map(Object::from).to_vec())
    }

    pub fn stroke_operation(&self) -> Operation {
        Operation::new("RG", self.components().map(Object::from).to_vec())
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => Some((
            channel(&hex[0..1].repeat(2))?,
            channel(&hex[1..2].repeat(2))?,
            channel(&hex[2..3].repeat(2))?,
        )),
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

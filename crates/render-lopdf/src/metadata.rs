//! Reading and writing the document information dictionary (`/Info`).

use crate::composer::pdf_err;
use folio_traits::EngineError;
use folio_types::MetadataValue;
use lopdf::{Dictionary, Document, Object, StringFormat};

/// Encodes `text` as a PDF text string: a literal for ASCII, UTF-16BE with a
/// byte order mark otherwise.
pub(crate) fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

pub(crate) fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}

/// The `/Info` dictionary, created (and linked from the trailer) if missing.
fn info_dict_mut(doc: &mut Document) -> Result<&mut Dictionary, EngineError> {
    let info_id = match doc.trailer.get(b"Info").ok().cloned() {
        Some(Object::Reference(id)) => id,
        Some(Object::Dictionary(inline)) => {
            let id = doc.add_object(inline);
            doc.trailer.set("Info", id);
            id
        }
        _ => {
            let id = doc.add_object(Dictionary::new());
            doc.trailer.set("Info", id);
            id
        }
    };
    doc.get_object_mut(info_id)
        .and_then(Object::as_dict_mut)
        .map_err(pdf_err)
}

fn info_dict(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).and_then(Object::as_dict).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

pub(crate) fn set_entry(doc: &mut Document, key: &str, value: Object) -> Result<(), EngineError> {
    info_dict_mut(doc)?.set(key, value);
    Ok(())
}

pub(crate) fn entry(doc: &Document, key: &str) -> Option<MetadataValue> {
    let value = info_dict(doc)?.get(key.as_bytes()).ok()?;
    let value = match value {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    match value {
        Object::Null => Some(MetadataValue::Null),
        Object::Boolean(b) => Some(MetadataValue::Boolean(*b)),
        Object::String(bytes, _) => Some(MetadataValue::Text(decode_text_string(bytes))),
        Object::Name(name) => Some(MetadataValue::Text(String::from_utf8_lossy(name).into_owned())),
        other => {
            log::warn!("Unexpected /Info value for {}: {:?}", key, other);
            None
        }
    }
}

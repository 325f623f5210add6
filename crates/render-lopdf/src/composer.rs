//! Low-level page tree and content stream manipulation on a `lopdf::Document`.

use folio_traits::EngineError;
use folio_types::PageSize;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// Maximum depth followed when resolving inherited page attributes.
const MAX_TREE_DEPTH: usize = 32;

pub(crate) fn pdf_err(err: lopdf::Error) -> EngineError {
    EngineError::Pdf(err.to_string())
}

/// Creates an empty document with a catalog, an empty page tree and an
/// information dictionary. Returns the document and its page tree root.
pub(crate) fn new_document(version: &str) -> (Document, ObjectId) {
    let mut doc = Document::with_version(version);
    let pages_id = doc.new_object_id();
    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let info_id = doc.add_object(Dictionary::new());
    doc.trailer.set("Info", info_id);
    (doc, pages_id)
}

pub(crate) fn catalog_mut(doc: &mut Document) -> Result<&mut Dictionary, EngineError> {
    let root_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(pdf_err)?;
    doc.get_object_mut(root_id)
        .and_then(Object::as_dict_mut)
        .map_err(pdf_err)
}

/// The root node of the document's page tree.
pub(crate) fn pages_root(doc: &Document) -> Result<ObjectId, EngineError> {
    let root_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(pdf_err)?;
    doc.get_object(root_id)
        .and_then(Object::as_dict)
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(pdf_err)
}

/// Adds a blank page of `size` at the end of the root page tree node.
///
/// `/Kids` and `/Count` may be stored indirectly; the referenced objects are
/// updated in place. A tree that cannot be extended is left untouched.
pub(crate) fn append_page(
    doc: &mut Document,
    pages_id: ObjectId,
    size: &PageSize,
) -> Result<ObjectId, EngineError> {
    let leaf_count = doc.get_pages().len() as i64;
    let pages_dict = doc
        .get_object(pages_id)
        .and_then(Object::as_dict)
        .map_err(pdf_err)?;
    let kids_slot = slot(pages_dict, b"Kids");
    let count_slot = slot(pages_dict, b"Count");

    // Validate both entries before touching the tree.
    if !matches!(kids_slot, Slot::Missing) {
        entry_mut(doc, pages_id, b"Kids", kids_slot)?
            .as_array_mut()
            .map_err(pdf_err)?;
    }
    let count = match count_slot {
        Slot::Missing => leaf_count,
        _ => entry_mut(doc, pages_id, b"Count", count_slot)?
            .as_i64()
            .map_err(pdf_err)?,
    };

    let (width, height) = size.dimensions_pt();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        "Resources" => Dictionary::new(),
    });

    match kids_slot {
        Slot::Missing => {
            pages_dict_mut(doc, pages_id)?.set("Kids", vec![Object::Reference(page_id)]);
        }
        _ => entry_mut(doc, pages_id, b"Kids", kids_slot)?
            .as_array_mut()
            .map_err(pdf_err)?
            .push(Object::Reference(page_id)),
    }
    match count_slot {
        Slot::Missing => pages_dict_mut(doc, pages_id)?.set("Count", count + 1),
        _ => *entry_mut(doc, pages_id, b"Count", count_slot)? = Object::Integer(count + 1),
    }

    Ok(page_id)
}

/// Where a page tree node stores one of its entries.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Direct,
    Indirect(ObjectId),
    Missing,
}

fn slot(dict: &Dictionary, key: &[u8]) -> Slot {
    match dict.get(key) {
        Ok(Object::Reference(id)) => Slot::Indirect(*id),
        Ok(_) => Slot::Direct,
        Err(_) => Slot::Missing,
    }
}

fn pages_dict_mut(doc: &mut Document, pages_id: ObjectId) -> Result<&mut Dictionary, EngineError> {
    doc.get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(pdf_err)
}

fn entry_mut<'a>(
    doc: &'a mut Document,
    pages_id: ObjectId,
    key: &[u8],
    slot: Slot,
) -> Result<&'a mut Object, EngineError> {
    match slot {
        Slot::Indirect(id) => doc.get_object_mut(id).map_err(pdf_err),
        _ => pages_dict_mut(doc, pages_id)?.get_mut(key).map_err(pdf_err),
    }
}

/// Size of an existing page, following `/Parent` links for an inherited
/// `/MediaBox`. Pages without a usable box are treated as A4.
pub(crate) fn page_size(doc: &Document, page_id: ObjectId) -> PageSize {
    let mut current = Some(page_id);
    for _ in 0..MAX_TREE_DEPTH {
        let Some(id) = current else { break };
        let Ok(dict) = doc.get_object(id).and_then(Object::as_dict) else {
            break;
        };
        if let Some(size) = dict
            .get(b"MediaBox")
            .ok()
            .and_then(|obj| resolve(doc, obj))
            .and_then(media_box_size)
        {
            return size;
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    log::warn!("Page {:?} has no usable MediaBox, assuming A4", page_id);
    PageSize::A4
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn media_box_size(obj: &Object) -> Option<PageSize> {
    let values = obj
        .as_array()
        .ok()?
        .iter()
        .map(|v| v.as_float().ok())
        .collect::<Option<Vec<f32>>>()?;
    let [x0, y0, x1, y1] = values.as_slice() else {
        return None;
    };
    let size = PageSize::custom((x1 - x0).abs(), (y1 - y0).abs());
    size.validate().ok().map(|_| size)
}

/// Adds a content stream to a page, drawn on top of what is already there.
///
/// When `isolate_existing` is set the page's current streams are wrapped in a
/// `q`/`Q` pair first, so graphics state they leave behind cannot leak into
/// the new content.
pub(crate) fn overlay_content(
    doc: &mut Document,
    page_id: ObjectId,
    content_stream: Vec<u8>,
    isolate_existing: bool,
) -> Result<(), EngineError> {
    let existing = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(pdf_err)?
        .get(b"Contents")
        .ok()
        .cloned();

    let mut contents = match existing {
        Some(Object::Array(arr)) => arr,
        Some(Object::Null) | None => Vec::new(),
        Some(Object::Reference(id)) => match doc.get_object(id).map_err(pdf_err)? {
            // an indirect array of streams is spliced in, not nested
            Object::Array(arr) => arr.clone(),
            _ => vec![Object::Reference(id)],
        },
        Some(single) => vec![single],
    };

    if isolate_existing && !contents.is_empty() {
        let save_id = doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
        let restore_id = doc.add_object(Stream::new(dictionary! {}, b"\nQ\n".to_vec()));
        contents.insert(0, Object::Reference(save_id));
        contents.push(Object::Reference(restore_id));
    }

    let new_content_id = doc.add_object(Stream::new(dictionary! {}, content_stream));
    contents.push(Object::Reference(new_content_id));

    let page_dict = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(pdf_err)?;
    if contents.len() == 1 {
        page_dict.set("Contents", contents.remove(0));
    } else {
        page_dict.set("Contents", Object::Array(contents));
    }
    Ok(())
}

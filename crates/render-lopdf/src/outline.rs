use crate::composer::catalog_mut;
use crate::metadata::text_string;
use folio_traits::EngineError;
use lopdf::{dictionary, Document, Object, ObjectId};

/// A bookmark pointing at a page, by its position in the page sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    pub title: String,
    pub page_index: usize,
}

impl Outline {
    pub fn new(title: impl Into<String>, page_index: usize) -> Self {
        Self {
            title: title.into(),
            page_index,
        }
    }
}

/// Writes `outlines` as a flat bookmark list and links it from the catalog.
pub(crate) fn write_outlines<'a, I>(
    doc: &mut Document,
    page_ids: &[ObjectId],
    outlines: I,
) -> Result<(), EngineError>
where
    I: IntoIterator<Item = &'a Outline>,
{
    let outlines: Vec<&Outline> = outlines.into_iter().collect();
    if outlines.is_empty() {
        return Ok(());
    }

    let root_id = doc.new_object_id();
    let item_ids: Vec<ObjectId> = outlines.iter().map(|_| doc.new_object_id()).collect();

    for (i, outline) in outlines.iter().enumerate() {
        let page_id = page_ids.get(outline.page_index).ok_or_else(|| {
            EngineError::PreconditionViolation(format!(
                "outline '{}' targets page {} but the document has {} pages",
                outline.title,
                outline.page_index,
                page_ids.len()
            ))
        })?;
        let mut dict = dictionary! {
            "Title" => text_string(&outline.title),
            "Parent" => root_id,
            "Dest" => vec![Object::Reference(*page_id), "Fit".into()],
        };
        if i > 0 {
            dict.set("Prev", item_ids[i - 1]);
        }
        if let Some(next) = item_ids.get(i + 1) {
            dict.set("Next", *next);
        }
        doc.objects.insert(item_ids[i], dict.into());
    }

    let (first, last) = match (item_ids.first(), item_ids.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Ok(()),
    };
    doc.objects.insert(
        root_id,
        dictionary! {
            "Type" => "Outlines",
            "First" => first,
            "Last" => last,
            "Count" => item_ids.len() as i64,
        }
        .into(),
    );

    let catalog = catalog_mut(doc)?;
    catalog.set("Outlines", root_id);
    catalog.set("PageMode", "UseOutlines");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::{append_page, new_document};
    use folio_types::PageSize;

    #[test]
    fn test_outlines_are_chained_in_order() {
        let (mut doc, pages_id) = new_document("1.7");
        let pages = vec![
            append_page(&mut doc, pages_id, &PageSize::A4).unwrap(),
            append_page(&mut doc, pages_id, &PageSize::A4).unwrap(),
        ];
        let outlines = [Outline::new("Intro", 0), Outline::new("Appendix", 1)];

        write_outlines(&mut doc, &pages, &outlines).unwrap();

        let catalog = catalog_mut(&mut doc).unwrap().clone();
        let root_id = catalog.get(b"Outlines").unwrap().as_reference().unwrap();
        let root = doc.get_object(root_id).unwrap().as_dict().unwrap();
        assert_eq!(root.get(b"Count").unwrap().as_i64().unwrap(), 2);

        let first_id = root.get(b"First").unwrap().as_reference().unwrap();
        let first = doc.get_object(first_id).unwrap().as_dict().unwrap();
        let dest = first.get(b"Dest").unwrap().as_array().unwrap();
        assert_eq!(dest[0].as_reference().unwrap(), pages[0]);
        assert!(first.get(b"Next").is_ok());
        assert!(first.get(b"Prev").is_err());
    }

    #[test]
    fn test_outline_past_last_page_is_rejected() {
        let (mut doc, pages_id) = new_document("1.7");
        let pages = vec![append_page(&mut doc, pages_id, &PageSize::A4).unwrap()];
        let outlines = [Outline::new("Missing", 3)];

        let err = write_outlines(&mut doc, &pages, &outlines).unwrap_err();
        assert!(matches!(err, EngineError::PreconditionViolation(_)));
    }

    #[test]
    fn test_no_outlines_leaves_catalog_alone() {
        let (mut doc, _) = new_document("1.7");
        write_outlines(&mut doc, &[], std::iter::empty::<&Outline>()).unwrap();
        assert!(catalog_mut(&mut doc).unwrap().get(b"Outlines").is_err());
    }
}

#![allow(dead_code)]

pub mod fixtures;

use lopdf::Document as LopdfDocument;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn assert_sizes_close(actual: &[(f32, f32)], expected: &[(f32, f32)]) {
    assert_eq!(actual.len(), expected.len(), "page count differs");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a.0 - e.0).abs() < 0.01 && (a.1 - e.1).abs() < 0.01,
            "page {} is {:?}, expected {:?}",
            i + 1,
            a,
            e
        );
    }
}

/// A rendered PDF parsed back for inspection.
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl RenderedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Width and height of every page, in page order.
    pub fn page_sizes(&self) -> Vec<(f32, f32)> {
        self.doc
            .get_pages()
            .values()
            .map(|page_id| {
                let page = self.doc.get_object(*page_id).unwrap().as_dict().unwrap();
                let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
                let v: Vec<f32> = media_box.iter().map(|o| o.as_float().unwrap()).collect();
                (v[2] - v[0], v[3] - v[1])
            })
            .collect()
    }

    /// Decoded content of the 1-based page `number`.
    pub fn page_content(&self, number: u32) -> String {
        let page_id = *self.doc.get_pages().get(&number).unwrap();
        String::from_utf8_lossy(&self.doc.get_page_content(page_id).unwrap()).into_owned()
    }

    /// A raw `/Info` entry.
    pub fn info(&self, key: &str) -> Option<lopdf::Object> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        let dict = match info {
            lopdf::Object::Reference(id) => self.doc.get_object(*id).ok()?.as_dict().ok()?,
            other => other.as_dict().ok()?,
        };
        dict.get(key.as_bytes()).ok().cloned()
    }

    /// Titles of the top-level bookmarks, in order.
    pub fn outline_titles(&self) -> Vec<String> {
        let mut titles = Vec::new();
        let Ok(root) = self
            .doc
            .catalog()
            .and_then(|c| c.get(b"Outlines"))
            .and_then(|o| o.as_reference())
        else {
            return titles;
        };
        let root = self.doc.get_object(root).unwrap().as_dict().unwrap();
        let mut next = root.get(b"First").and_then(|o| o.as_reference()).ok();
        while let Some(id) = next {
            let item = self.doc.get_object(id).unwrap().as_dict().unwrap();
            let title = item.get(b"Title").unwrap().as_str().unwrap();
            titles.push(String::from_utf8_lossy(title).into_owned());
            next = item.get(b"Next").and_then(|o| o.as_reference()).ok();
        }
        titles
    }
}

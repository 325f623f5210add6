use image::{ImageFormat, Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Writes a PDF with one page per entry of `sizes`. Each page carries its own
/// content stream showing "Original page N".
pub fn write_pdf(dir: &Path, name: &str, sizes: &[(f32, f32)]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for (i, (width, height)) in sizes.iter().enumerate() {
        let content_id = doc.add_object(original_text(i + 1));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), (*width).into(), (*height).into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

/// Writes a PDF whose page tree uses indirect objects throughout. The root
/// node's `/Kids` and `/Count` are separate objects, every page after the
/// first sits under a nested `/Pages` node, and each page's `/Contents` is a
/// reference to an array of streams.
pub fn write_nested_pdf(dir: &Path, name: &str, sizes: &[(f32, f32)]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let root_id = doc.new_object_id();
    let branch_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut page_ids = Vec::new();
    for (i, (width, height)) in sizes.iter().enumerate() {
        let parent = if i == 0 { root_id } else { branch_id };
        let stream_id = doc.add_object(original_text(i + 1));
        let contents_id = doc.add_object(vec![Object::Reference(stream_id)]);
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => parent,
            "MediaBox" => vec![0.into(), 0.into(), (*width).into(), (*height).into()],
            "Contents" => contents_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }));
    }

    let mut root_kids = vec![];
    if let Some(first) = page_ids.first() {
        root_kids.push(Object::Reference(*first));
    }
    if page_ids.len() > 1 {
        let branch_kids: Vec<Object> = page_ids[1..].iter().map(|id| Object::Reference(*id)).collect();
        doc.objects.insert(
            branch_id,
            dictionary! {
                "Type" => "Pages",
                "Parent" => root_id,
                "Count" => branch_kids.len() as i64,
                "Kids" => branch_kids,
            }
            .into(),
        );
        root_kids.push(Object::Reference(branch_id));
    }
    let kids_id = doc.add_object(root_kids);
    let count_id = doc.add_object(page_ids.len() as i64);
    doc.objects.insert(
        root_id,
        dictionary! {
            "Type" => "Pages",
            "Count" => count_id,
            "Kids" => kids_id,
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => root_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

/// A content stream showing "Original page N".
fn original_text(number: usize) -> Stream {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 72.into()]),
            Operation::new(
                "Tj",
                vec![Object::string_literal(format!("Original page {}", number))],
            ),
            Operation::new("ET", vec![]),
        ],
    };
    Stream::new(dictionary! {}, content.encode().unwrap())
}

pub fn write_corrupt_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"this is not a PDF file").unwrap();
    path
}

/// A small half-transparent PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([20, 120, 220, 128]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

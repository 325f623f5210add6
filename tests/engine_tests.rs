mod common;

use common::fixtures::png_bytes;
use common::{assert_sizes_close, init_logger, RenderedPdf, TestResult};
use folio::{
    AnyEngine, Color, Engine, EngineConfig, EngineError, FilesystemResourceProvider,
    InMemoryResourceProvider, LopdfEngine, Outline, PageSize,
};
use lopdf::content::Operation;
use std::sync::Arc;
use std::thread;

fn engine() -> LopdfEngine {
    init_logger();
    LopdfEngine::new(Arc::new(InMemoryResourceProvider::new()))
}

fn fill_rect(color: &Color, x: i64, y: i64) -> Vec<Operation> {
    vec![
        color.fill_operation(),
        Operation::new("re", vec![x.into(), y.into(), 100.into(), 50.into()]),
        Operation::new("f", vec![]),
    ]
}

#[test]
fn test_attached_pages_follow_call_order() -> TestResult {
    let engine = engine();
    let sizes = [PageSize::A4, PageSize::Letter, PageSize::A5, PageSize::custom(300.0, 200.0)];
    for size in &sizes {
        let gc = engine.create_graphics_context(size.clone())?;
        engine.attach_graphics_context(&gc)?;
    }

    let pdf = RenderedPdf::from_bytes(engine.render()?)?;
    assert_eq!(pdf.page_count(), sizes.len());
    let expected: Vec<(f32, f32)> = sizes.iter().map(PageSize::dimensions_pt).collect();
    assert_sizes_close(&pdf.page_sizes(), &expected);
    Ok(())
}

#[test]
fn test_unattached_contexts_are_not_rendered() -> TestResult {
    let engine = engine();
    let attached = engine.create_graphics_context(PageSize::A4)?;
    let _detached = engine.create_graphics_context(PageSize::A4)?;
    engine.attach_graphics_context(&attached)?;

    let pdf = RenderedPdf::from_bytes(engine.render()?)?;
    assert_eq!(pdf.page_count(), 1);
    assert_eq!(engine.attached_graphics_contexts()?.len(), 1);
    Ok(())
}

#[test]
fn test_empty_engine_renders_a_valid_document() -> TestResult {
    let pdf = RenderedPdf::from_bytes(engine().render()?)?;
    assert_eq!(pdf.page_count(), 0);
    assert!(pdf.bytes.starts_with(b"%PDF-1.7"));
    Ok(())
}

#[test]
fn test_drawing_reaches_the_page() -> TestResult {
    let engine = engine();
    let red = engine.create_color("red")?;
    let gc = engine.create_graphics_context(PageSize::A4)?;
    gc.page().extend(fill_rect(&red, 10, 20))?;
    engine.attach_graphics_context(&gc)?;

    // drawing after attach is still picked up
    let blue = engine.create_color("#0000ff")?;
    gc.page().extend(fill_rect(&blue, 10, 200))?;

    let pdf = RenderedPdf::from_bytes(engine.render()?)?;
    let content = pdf.page_content(1);
    assert_eq!(content.matches(" rg").count(), 2);
    assert_eq!(content.matches(" re").count(), 2);
    Ok(())
}

#[test]
fn test_render_twice_is_identical() -> TestResult {
    let engine = engine();
    let gc = engine.create_graphics_context(PageSize::Letter)?;
    let color = engine.create_color("#336699")?;
    gc.page().extend(fill_rect(&color, 0, 0))?;
    engine.attach_graphics_context(&gc)?;
    engine.set_metadata_value("Title", "Stable")?;
    engine.register_outline("start", Outline::new("Start", 0))?;

    assert_eq!(engine.render()?, engine.render()?);
    Ok(())
}

#[test]
fn test_color_identity_per_key() -> TestResult {
    let engine = engine();
    let a = engine.create_color("navy")?;
    let b = engine.create_color("navy")?;
    let c = engine.create_color("NAVY")?;
    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(a.rgb(), c.rgb());
    Ok(())
}

#[test]
fn test_color_identity_across_threads() -> TestResult {
    let engine = Arc::new(engine());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.create_color("#abcdef"))
        })
        .collect();

    let colors = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect::<Result<Vec<_>, _>>()?;
    for color in &colors[1..] {
        assert!(Arc::ptr_eq(&colors[0], color));
    }
    Ok(())
}

#[test]
fn test_image_identity_and_alpha() -> TestResult {
    init_logger();
    let provider = InMemoryResourceProvider::new();
    provider.add("images/badge.png", png_bytes(3, 2))?;
    let engine = LopdfEngine::new(Arc::new(provider));

    let first = engine.create_image("images/badge.png")?;
    let second = engine.create_image("images/badge.png")?;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!((first.width(), first.height()), (3, 2));
    assert!(first.soft_mask().is_some());
    Ok(())
}

#[test]
fn test_images_from_a_sandboxed_directory() -> TestResult {
    init_logger();
    let dir = tempfile::tempdir()?;
    std::fs::create_dir(dir.path().join("img"))?;
    std::fs::write(dir.path().join("img/logo.png"), png_bytes(4, 4))?;
    let engine = LopdfEngine::new(Arc::new(FilesystemResourceProvider::new(dir.path())));

    assert_eq!(engine.create_image("img/logo.png")?.width(), 4);
    assert!(matches!(
        engine.create_image("../outside.png"),
        Err(EngineError::ResourceNotFound(_))
    ));
    Ok(())
}

#[test]
fn test_undecodable_image_is_invalid() -> TestResult {
    init_logger();
    let provider = InMemoryResourceProvider::new();
    provider.add("broken.png", b"not really a png".to_vec())?;
    let engine = LopdfEngine::new(Arc::new(provider));

    assert!(matches!(
        engine.create_image("broken.png"),
        Err(EngineError::InvalidResource { .. })
    ));
    // failures are not cached
    assert!(engine.create_image("broken.png").is_err());
    Ok(())
}

#[test]
fn test_standard_fonts_resolve_without_a_provider() -> TestResult {
    let engine = engine();
    let font = engine.create_font("Courier-Bold")?;
    assert!(font.is_standard());
    assert_eq!(font.postscript_name(), "Courier-Bold");
    Ok(())
}

#[test]
fn test_invalid_font_bytes() -> TestResult {
    init_logger();
    let provider = InMemoryResourceProvider::new();
    provider.add("fonts/fake.ttf", vec![0u8; 64])?;
    let engine = LopdfEngine::new(Arc::new(provider));

    assert!(matches!(
        engine.create_font("fonts/fake.ttf"),
        Err(EngineError::InvalidResource { .. })
    ));
    Ok(())
}

#[test]
fn test_contexts_cannot_cross_engines() -> TestResult {
    let a = engine();
    let b = engine();
    let gc = a.create_graphics_context(PageSize::A4)?;

    assert!(matches!(
        b.attach_graphics_context(&gc),
        Err(EngineError::PreconditionViolation(_))
    ));
    a.attach_graphics_context(&gc)?;
    assert!(matches!(
        a.attach_graphics_context(&gc),
        Err(EngineError::PreconditionViolation(_))
    ));
    assert_eq!(a.page_count()?, 1);
    assert_eq!(b.page_count()?, 0);
    Ok(())
}

#[test]
fn test_outlines_are_written_in_id_order() -> TestResult {
    let engine = engine();
    for _ in 0..3 {
        let gc = engine.create_graphics_context(PageSize::A4)?;
        engine.attach_graphics_context(&gc)?;
    }
    engine.register_outline("02-body", Outline::new("Body", 1))?;
    engine.register_outline("01-intro", Outline::new("Introduction", 0))?;
    engine.register_outline("03-end", Outline::new("Appendix", 2))?;

    let pdf = RenderedPdf::from_bytes(engine.render()?)?;
    assert_eq!(pdf.outline_titles(), vec!["Introduction", "Body", "Appendix"]);
    Ok(())
}

#[test]
fn test_any_engine_from_json_config() -> TestResult {
    init_logger();
    let config = EngineConfig::from_json(r#"{ "backend": "lopdf", "producer": "Ledger 2" }"#)?;
    let engine = AnyEngine::with_provider(&config, Arc::new(InMemoryResourceProvider::new()));
    let lopdf = engine.as_lopdf().ok_or("expected the lopdf backend")?;
    let gc = lopdf.create_graphics_context(PageSize::A5)?;
    lopdf.attach_graphics_context(&gc)?;

    let dir = tempfile::tempdir()?;
    let out = dir.path().join("out.pdf");
    engine.render_to_file(&out)?;

    let pdf = RenderedPdf::from_bytes(std::fs::read(&out)?)?;
    assert_eq!(pdf.page_count(), 1);
    let producer = pdf.info("Producer").ok_or("missing producer")?;
    assert_eq!(producer.as_str()?, b"Ledger 2");
    Ok(())
}

//! End-to-end worksheet generation through the public API

use std::path::PathBuf;

use tianzige::engine::config::ExportConfig;
use tianzige::engine::paginator::paginate;
use tianzige::engine::stream::build_stream;
use tianzige::export;
use tianzige::rendering::font::FontSource;
use tianzige::rendering::grid::{cell_primitives, Primitive};
use tianzige::{generate, FontHandle, FontResolver, GridStyle, InkColor, LayoutConfig, PageGeometry};

fn small_page() -> PageGeometry {
    PageGeometry {
        width: 200,
        height: 100,
        margin_x: 10,
        margin_y: 10,
        glyph_scale: 0.7,
    }
}

fn one_row_layout() -> LayoutConfig {
    LayoutConfig {
        columns: 5,
        rows: 1,
        repeat_count: 3,
        skip_alternate_rows: false,
        fill_last_page: false,
        ..LayoutConfig::default()
    }
}

fn offline_resolver() -> FontResolver {
    FontResolver::with_search_dirs(vec![PathBuf::from("/nonexistent")])
}

#[test]
fn test_repeated_characters_split_over_two_pages() {
    let doc = generate("AB", &one_row_layout(), &small_page(), "", &mut offline_resolver());

    assert_eq!(doc.len(), 2);
    assert_eq!(doc.pages[0].characters, vec!["A", "A", "A", "B", "B"]);
    assert_eq!(doc.pages[1].characters, vec!["B"]);
}

#[test]
fn test_fill_last_page_repeats_final_character() {
    let layout = LayoutConfig {
        fill_last_page: true,
        ..one_row_layout()
    };
    let doc = generate("AB", &layout, &small_page(), "", &mut offline_resolver());

    assert_eq!(doc.pages[1].characters, vec!["B"; 5]);
}

#[test]
fn test_whitespace_only_text_produces_no_pages() {
    let doc = generate(" \n\t ", &one_row_layout(), &small_page(), "", &mut offline_resolver());
    assert!(doc.is_empty());

    let bytes = export::to_document(&doc.pages, &ExportConfig::default()).unwrap();
    assert!(bytes.is_empty());
}

#[test]
fn test_alternate_rows_halve_capacity() {
    let layout = LayoutConfig {
        columns: 4,
        rows: 5,
        skip_alternate_rows: true,
        ..LayoutConfig::default()
    };
    assert_eq!(layout.page_capacity(), 12);
    let demo_rows: Vec<u32> = (0..5).filter(|r| layout.is_demo_row(*r)).collect();
    assert_eq!(demo_rows, vec![0, 2, 4]);

    let stream = build_stream("一二三四五六七八九十甲乙丙", 1);
    let chunks = paginate(&stream, &layout);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].len(), 12);
    assert_eq!(chunks[1], vec!["丙"]);
}

#[test]
fn test_hidden_demonstration_leaves_no_text_pixels() {
    let layout = LayoutConfig {
        text_color: InkColor::Green,
        grid_color: InkColor::Red,
        demo_alpha: 255,
        ..one_row_layout()
    };
    let greenish = |doc: &tianzige::Document| {
        doc.pages
            .iter()
            .flat_map(|p| p.image.pixels())
            .any(|px| px.0[1] > px.0[0])
    };

    let shown = generate("字字", &layout, &small_page(), "", &mut offline_resolver());
    assert!(greenish(&shown));

    let hidden_layout = LayoutConfig {
        show_demo: false,
        ..layout
    };
    let hidden = generate("字字", &hidden_layout, &small_page(), "", &mut offline_resolver());
    assert_eq!(hidden.len(), shown.len());
    assert!(!greenish(&hidden));
}

#[test]
fn test_box_3x3_cell_geometry() {
    let prims = cell_primitives(0, 0, 90, GridStyle::Box3x3);
    assert!(matches!(
        prims[0],
        Primitive::Rect { x0: 0, y0: 0, x1: 90, y1: 90, .. }
    ));
    let offsets: Vec<(i32, i32)> = prims[1..]
        .iter()
        .filter_map(|p| match *p {
            Primitive::Line { x0, y0, x1, y1, .. } if x0 == x1 => Some((x0, y1 - y0)),
            _ => None,
        })
        .collect();
    assert_eq!(offsets, vec![(30, 90), (60, 90)]);
}

#[test]
fn test_exported_pdf_holds_every_page() {
    let doc = generate(
        "床前明月光疑是地上霜",
        &one_row_layout(),
        &small_page(),
        "",
        &mut offline_resolver(),
    );
    assert_eq!(doc.len(), 6);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(export::DOCUMENT_FILE_NAME);
    let written = export::save_document(&doc, &ExportConfig::default(), &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), written);
    assert!(bytes.starts_with(b"%PDF-"));
    let images = bytes
        .windows(b"/Subtype /Image".len())
        .filter(|w| *w == b"/Subtype /Image")
        .count();
    assert_eq!(images, 6);
}

#[test]
fn test_page_png_round_trips_pixels() {
    let font = FontHandle::builtin("", 20.0);
    let doc = tianzige::generate_with_font("永", &one_row_layout(), &small_page(), &font);
    let page = &doc.pages[0];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(export::page_file_name(page));
    export::save_page(page, &path).unwrap();

    assert!(path.ends_with("tianzige_page_1.png"));
    let decoded = imageproc::image::open(&path).unwrap().to_rgb8();
    assert_eq!(decoded, page.image);
}

#[test]
fn test_requested_font_glyph_is_centered_in_cell() {
    let font_path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSansMono.ttf");
    let page = PageGeometry {
        width: 120,
        height: 120,
        margin_x: 10,
        margin_y: 10,
        glyph_scale: 0.7,
    };
    let layout = LayoutConfig {
        grid_style: GridStyle::Box,
        text_color: InkColor::Green,
        demo_alpha: 255,
        columns: 1,
        rows: 1,
        repeat_count: 1,
        ..LayoutConfig::default()
    };

    let doc = generate("H", &layout, &page, font_path, &mut offline_resolver());
    let font = doc.font.as_ref().unwrap();
    assert_eq!(font.info().source, FontSource::Requested);
    assert_eq!(font.info().family, "DejaVu Sans Mono");
    assert_eq!(font.size(), 70.0);

    // Mostly-covered glyph pixels: green wins and red has dropped below half
    let ink: Vec<(u32, u32)> = doc.pages[0]
        .image
        .enumerate_pixels()
        .filter(|(_, _, px)| px.0[1] > px.0[0] && px.0[0] < 128)
        .map(|(x, y, _)| (x, y))
        .collect();
    assert!(!ink.is_empty());
    let min_x = ink.iter().map(|p| p.0).min().unwrap() as i32;
    let max_x = ink.iter().map(|p| p.0).max().unwrap() as i32;
    let min_y = ink.iter().map(|p| p.1).min().unwrap() as i32;
    let max_y = ink.iter().map(|p| p.1).max().unwrap() as i32;

    // Cell (0, 0) spans 10..110, centered on 60
    assert!((min_x + max_x - 120).abs() <= 4, "x {}..{}", min_x, max_x);
    assert!((min_y + max_y - 120).abs() <= 4, "y {}..{}", min_y, max_y);
    assert!((45..=55).contains(&(max_y - min_y + 1)));
}

//! One generation run: text → stream → pages → Document
//!
//! Runs are synchronous and independent. The only state shared across pages
//! is the resolved font handle, which is read-only after resolution.

use imageproc::image::RgbImage;
use tracing::info;

use super::config::{LayoutConfig, PageGeometry};
use super::paginator::paginate;
use super::stream::build_stream;
use crate::rendering::composer::{render_page, GridLayout};
use crate::rendering::font::{FontHandle, FontResolver};

/// One rendered worksheet page
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    /// Characters placed on this page, in cell order
    pub characters: Vec<String>,
    pub image: RgbImage,
}

/// Ordered pages of one run
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub pages: Vec<Page>,
    /// Font actually used for the demonstration glyphs
    pub font: Option<FontHandle>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Page by 1-based number
    pub fn page(&self, number: usize) -> Option<&Page> {
        number.checked_sub(1).and_then(|i| self.pages.get(i))
    }
}

/// Render a document with an already resolved font
pub fn generate_with_font(
    text: &str,
    layout: &LayoutConfig,
    page: &PageGeometry,
    font: &FontHandle,
) -> Document {
    let layout = layout.normalized();
    let stream = build_stream(text, layout.repeat_count);
    let chunks = paginate(&stream, &layout);

    let pages: Vec<Page> = chunks
        .into_iter()
        .enumerate()
        .map(|(i, characters)| {
            let image = render_page(&characters, &layout, page, font);
            Page {
                number: i + 1,
                characters,
                image,
            }
        })
        .collect();

    info!(
        pages = pages.len(),
        characters = stream.len(),
        style = layout.grid_style.name(),
        "generated worksheet"
    );

    Document {
        pages,
        font: Some(font.clone()),
    }
}

/// Resolve the font for this layout's glyph size and render a document
///
/// Empty or whitespace-only text yields an empty document.
pub fn generate(
    text: &str,
    layout: &LayoutConfig,
    page: &PageGeometry,
    font_path: &str,
    resolver: &mut FontResolver,
) -> Document {
    let layout = layout.normalized();
    let glyph_size = GridLayout::compute(page, &layout).glyph_size(page);
    let font = resolver.resolve(font_path, glyph_size);
    generate_with_font(text, &layout, page, &font)
}

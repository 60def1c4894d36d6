//! Multi-page PDF export
//!
//! Each page becomes one PDF page holding a single Flate-compressed RGB image
//! XObject drawn full-bleed. The media box is the raster size converted at
//! the configured dpi, so 72 dpi maps one pixel to one point.

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref};
use tracing::debug;

use crate::engine::config::ExportConfig;
use crate::engine::error::ExportError;
use crate::engine::generator::Page;

const IMAGE_NAME: &[u8] = b"Im0";

/// Default download name for the combined document
pub const DOCUMENT_FILE_NAME: &str = "tianzige_all_pages.pdf";

/// Encode all pages, in order, as one PDF. No pages produce an empty buffer.
pub fn to_document(pages: &[Page], config: &ExportConfig) -> Result<Vec<u8>, ExportError> {
    if pages.is_empty() {
        return Ok(Vec::new());
    }

    let mut pdf = Pdf::new();
    let mut next_id = 1;
    let mut alloc = || {
        let id = Ref::new(next_id);
        next_id += 1;
        id
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let mut page_ids = Vec::with_capacity(pages.len());
    let points_per_pixel = 72.0 / config.dpi.max(1.0);

    for (index, page) in pages.iter().enumerate() {
        let (width, height) = page.image.dimensions();
        if width == 0 || height == 0 {
            return Err(ExportError::InvalidPage {
                index,
                width,
                height,
            });
        }

        let page_id = alloc();
        let image_id = alloc();
        let content_id = alloc();
        page_ids.push(page_id);

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            page.image.as_raw(),
            config.compression_level.min(10),
        );
        {
            let mut image = pdf.image_xobject(image_id, &compressed);
            image.filter(Filter::FlateDecode);
            image.width(width as i32);
            image.height(height as i32);
            image.color_space().device_rgb();
            image.bits_per_component(8);
        }

        let page_width = width as f32 * points_per_pixel;
        let page_height = height as f32 * points_per_pixel;

        let mut content = Content::new();
        content.save_state();
        content.transform([page_width, 0.0, 0.0, page_height, 0.0, 0.0]);
        content.x_object(Name(IMAGE_NAME));
        content.restore_state();
        pdf.stream(content_id, &content.finish());

        let mut writer = pdf.page(page_id);
        writer
            .media_box(Rect::new(0.0, 0.0, page_width, page_height))
            .parent(pages_id)
            .contents(content_id);
        writer.resources().x_objects().pair(Name(IMAGE_NAME), image_id);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    let bytes = pdf.finish();
    debug!(pages = pages.len(), bytes = bytes.len(), "encoded PDF document");
    Ok(bytes)
}

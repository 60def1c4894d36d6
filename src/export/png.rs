use base64::{engine::general_purpose::STANDARD, Engine as _};
use imageproc::image::{ImageFormat, RgbImage};
use std::io::Cursor;

use crate::engine::error::ExportError;
use crate::engine::generator::Page;

/// Encode one page as a lossless PNG
pub fn to_single_image(page: &Page) -> Result<Vec<u8>, ExportError> {
    encode_png(&page.image)
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| ExportError::Png(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// PNG wrapped in a `data:` URI for inline previews
pub fn to_data_uri(page: &Page) -> Result<String, ExportError> {
    let bytes = to_single_image(page)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
}

/// Default download name for a page
pub fn page_file_name(page: &Page) -> String {
    format!("tianzige_page_{}.png", page.number)
}

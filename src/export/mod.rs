pub mod pdf;
pub mod png;

use std::path::Path;

use crate::engine::config::ExportConfig;
use crate::engine::error::ExportError;
use crate::engine::generator::{Document, Page};

pub use pdf::{to_document, DOCUMENT_FILE_NAME};
pub use png::{page_file_name, to_data_uri, to_single_image};

/// Write one page as PNG
pub fn save_page<P: AsRef<Path>>(page: &Page, path: P) -> Result<(), ExportError> {
    let bytes = to_single_image(page)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Write the whole document as PDF. An empty document writes nothing.
pub fn save_document<P: AsRef<Path>>(
    document: &Document,
    config: &ExportConfig,
    path: P,
) -> Result<usize, ExportError> {
    let bytes = to_document(&document.pages, config)?;
    if !bytes.is_empty() {
        std::fs::write(path, &bytes)?;
    }
    Ok(bytes.len())
}

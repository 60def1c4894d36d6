use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("PDF parse error: {0}")]
    PdfParse(String),

    #[error("EPUB parse error: {0}")]
    EpubParse(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("No text found in {0}")]
    Empty(String),
}

/// Text pulled from an input source, before any layout
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedText {
    pub text: String,
    /// `kind:location`, e.g. `pdf:/tmp/poems.pdf` or `clipboard`
    pub source: String,
}

impl LoadedText {
    fn new(text: String, source: String) -> Result<Self, LoadError> {
        if text.trim().is_empty() {
            return Err(LoadError::Empty(source));
        }
        Ok(Self { text, source })
    }
}

pub mod clipboard;
pub mod epub;
pub mod pdf;
pub mod text;

/// Load a file, picking the reader by extension
pub fn load_file(path: &str) -> Result<LoadedText, LoadError> {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("pdf") => pdf::load(path),
        Some("epub") => epub::load(path),
        _ => text::load(path),
    }
}

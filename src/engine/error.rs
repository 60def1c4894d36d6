use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures encoding rendered pages
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PNG encoding failed: {0}")]
    Png(String),

    #[error("Page {index} has invalid dimensions {width}x{height}")]
    InvalidPage { index: usize, width: u32, height: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

//! Classical poetry corpus: registry, extraction and fetching

pub mod fetch;
pub mod loader;
pub mod registry;

use std::path::PathBuf;
use thiserror::Error;

pub use fetch::{CorpusFetcher, FetchStatus, GitFetcher};
pub use loader::{load_poems_from_json, CorpusLoader, Poem};
pub use registry::{DatasetEntry, Registry};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Unexpected structure: {0}")]
    Structure(String),
}

//! Dataset registry (`loader/datas.json` in the poetry repository)
//!
//! ```json
//! { "datasets": { "wudai-huajianji": { "id": 0, "path": "五代诗词/huajianji",
//!                                      "tag": "paragraphs", "excludes": ["README.md"] } } }
//! ```

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::CorpusError;

/// Where one dataset lives and which field holds the poem body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetEntry {
    pub id: u32,
    /// File or directory, relative to the repository root
    pub path: String,
    /// Body field name inside each poem object
    pub tag: String,
    /// File names skipped when `path` is a directory
    #[serde(default)]
    pub excludes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Registry {
    pub datasets: BTreeMap<String, DatasetEntry>,
}

impl Registry {
    pub fn from_file(path: &Path) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| CorpusError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get(&self, key: &str) -> Option<&DatasetEntry> {
        self.datasets.get(key)
    }

    /// Dataset keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        self.datasets.keys().map(String::as_str).collect()
    }

    /// Numeric id → dataset key
    pub fn id_table(&self) -> HashMap<u32, String> {
        self.datasets
            .iter()
            .map(|(key, entry)| (entry.id, key.clone()))
            .collect()
    }
}

//! Poem extraction from registered datasets
//!
//! Every public method degrades to an empty list with a warning when the
//! dataset is unknown or its files are unreadable. Inside a directory
//! dataset a bad file is skipped and the rest are still read.

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::registry::{DatasetEntry, Registry};
use super::CorpusError;

/// A labelled poem from a standalone JSON file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poem {
    /// `author《title》`
    pub label: String,
    pub content: String,
}

pub struct CorpusLoader {
    root: PathBuf,
    registry: Registry,
    id_table: HashMap<u32, String>,
}

impl CorpusLoader {
    pub fn new(root: PathBuf, registry: Registry) -> Self {
        let id_table = registry.id_table();
        Self {
            root,
            registry,
            id_table,
        }
    }

    /// Read the registry file; dataset paths resolve against `root`
    pub fn open(registry_path: &Path, root: &Path) -> Result<Self, CorpusError> {
        let registry = Registry::from_file(registry_path)?;
        Ok(Self::new(root.to_path_buf(), registry))
    }

    pub fn dataset_keys(&self) -> Vec<&str> {
        self.registry.keys()
    }

    /// Whole poems, each a header line followed by its body lines
    pub fn poems_as_text(&self, dataset: &str) -> Vec<String> {
        self.collect(dataset, poem_text)
    }

    /// Flat list of every body paragraph in the dataset
    pub fn body_lines(&self, dataset: &str) -> Vec<String> {
        self.collect(dataset, |poem, tag| {
            Some(match poem.get(tag) {
                Some(Value::Array(items)) => items.iter().map(value_text).collect(),
                Some(Value::Null) | None => Vec::new(),
                Some(other) => vec![value_text(other)],
            })
        })
    }

    pub fn body_lines_from_many(&self, datasets: &[&str]) -> Vec<String> {
        datasets.iter().flat_map(|d| self.body_lines(d)).collect()
    }

    /// Body lines for datasets named by their numeric ids; unknown ids are skipped
    pub fn body_lines_by_ids(&self, ids: &[u32]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| match self.id_table.get(id) {
                Some(key) => Some(self.body_lines(key)),
                None => {
                    warn!(id, "no dataset registered with this id");
                    None
                }
            })
            .flatten()
            .collect()
    }

    fn collect<T, F>(&self, dataset: &str, extract: F) -> Vec<T>
    where
        F: Fn(&Value, &str) -> Option<Vec<T>>,
        T: Clone,
    {
        match self.try_collect(dataset, &extract) {
            Ok(items) => items,
            Err(err) => {
                warn!(dataset, error = %err, "dataset unavailable");
                Vec::new()
            }
        }
    }

    fn try_collect<T, F>(&self, dataset: &str, extract: &F) -> Result<Vec<T>, CorpusError>
    where
        F: Fn(&Value, &str) -> Option<Vec<T>>,
    {
        let entry = self
            .registry
            .get(dataset)
            .ok_or_else(|| CorpusError::UnknownDataset(dataset.to_string()))?;
        let full_path = self.root.join(&entry.path);

        if full_path.is_file() {
            let poems = read_poem_array(&full_path)?;
            return Ok(extract_all(&poems, &entry.tag, extract));
        }

        let files = dataset_files(&full_path, entry)?;
        let mut items = Vec::new();
        for file in files {
            match read_poem_array(&file) {
                Ok(poems) => items.extend(extract_all(&poems, &entry.tag, extract)),
                Err(err) => warn!(file = %file.display(), error = %err, "skipping unreadable file"),
            }
        }
        debug!(dataset, count = items.len(), "loaded dataset");
        Ok(items)
    }
}

fn extract_all<T, F>(poems: &[Value], tag: &str, extract: &F) -> Vec<T>
where
    F: Fn(&Value, &str) -> Option<Vec<T>>,
{
    poems
        .iter()
        .filter_map(|poem| extract(poem, tag))
        .flatten()
        .collect()
}

/// Files of a directory dataset, sorted by name, exclusions removed
fn dataset_files(dir: &Path, entry: &DatasetEntry) -> Result<Vec<PathBuf>, CorpusError> {
    let io_err = |source| CorpusError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(io_err)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| {
            let name = p.file_name().map(|n| n.to_string_lossy().into_owned());
            !name.is_some_and(|n| entry.excludes.contains(&n))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn read_poem_array(path: &Path) -> Result<Vec<Value>, CorpusError> {
    let content = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| CorpusError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(CorpusError::Structure(format!(
            "{} is not a list of poems",
            path.display()
        ))),
    }
}

/// Plain text of a JSON scalar; null is empty
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn field_text(poem: &Value, key: &str) -> String {
    poem.get(key).map(value_text).unwrap_or_default()
}

/// Join non-blank string paragraphs, or take a plain string body
fn body_text(body: Option<&Value>) -> String {
    match body {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn poem_text(poem: &Value, tag: &str) -> Option<Vec<String>> {
    let body = body_text(poem.get(tag));
    if body.is_empty() {
        return None;
    }
    let header = format!(
        "{}{}{}{}·{}",
        field_text(poem, "title"),
        field_text(poem, "rhythmic"),
        field_text(poem, "chapter"),
        field_text(poem, "section"),
        field_text(poem, "author"),
    );
    Some(vec![format!("{}\n{}", header, body)])
}

/// Load labelled poems from any poem JSON file
///
/// Accepts a list of poem objects or `{ "poems": [...] }`. Titles fall back
/// through title, rhythmic and chapter to 无题; authors through author and
/// writer to 佚名.
pub fn load_poems_from_json(path: &Path) -> Result<Vec<Poem>, CorpusError> {
    if !path.exists() {
        return Err(CorpusError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| CorpusError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("poems") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(CorpusError::Structure(
                    "expected a list or an object with a 'poems' list".to_string(),
                ))
            }
        },
        _ => {
            return Err(CorpusError::Structure(
                "expected a list or an object with a 'poems' list".to_string(),
            ))
        }
    };

    Ok(items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| {
            let title = first_non_empty(item, &["title", "rhythmic", "chapter"])
                .unwrap_or_else(|| "无题".to_string());
            let author =
                first_non_empty(item, &["author", "writer"]).unwrap_or_else(|| "佚名".to_string());
            let body = ["paragraphs", "content", "paragraph"]
                .iter()
                .filter_map(|key| item.get(*key))
                .find(|v| is_truthy(v));
            Poem {
                label: format!("{}《{}》", author, title),
                content: body_text(body),
            }
        })
        .collect())
}

fn first_non_empty(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| item.get(*key))
        .find(|v| is_truthy(v))
        .map(value_text)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(_) => true,
    }
}

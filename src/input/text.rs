use super::{LoadError, LoadedText};
use std::path::Path;

/// Load a UTF-8 text file
pub fn load(path: &str) -> Result<LoadedText, LoadError> {
    let path = Path::new(path);

    if !path.exists() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    LoadedText::new(text, format!("text:{}", path.display()))
}

//! Font directory scan
//!
//! Search order: the custom directory, then the OS font directories, then
//! nothing. Scans go through `fontdb`, are bounded by a limit, and never fail.

use lazy_static::lazy_static;
use std::path::{Path, PathBuf};
use tracing::debug;

lazy_static! {
    /// Faces from the OS font directories, scanned once per process
    static ref SYSTEM_FONTS: fontdb::Database = {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        debug!(faces = db.len(), "loaded system font database");
        db
    };
}

/// A discovered font file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    /// `"<family> (<file name>)"`, or the file name when the font has no family name
    pub label: String,
    pub path: PathBuf,
}

/// Result of a discovery pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub fonts: Vec<FontDescriptor>,
    pub description: String,
}

pub fn system_fonts() -> &'static fontdb::Database {
    &SYSTEM_FONTS
}

/// Database of every face found under the given directories
pub fn font_database(dirs: &[PathBuf]) -> fontdb::Database {
    let mut db = fontdb::Database::new();
    for dir in dirs {
        db.load_fonts_dir(dir);
    }
    db
}

fn face_path(face: &fontdb::FaceInfo) -> Option<&Path> {
    match &face.source {
        fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => Some(path.as_path()),
        fontdb::Source::Binary(_) => None,
    }
}

/// One descriptor per font file in the database, sorted by path
pub fn describe_fonts(db: &fontdb::Database, limit: usize) -> Vec<FontDescriptor> {
    let mut fonts: Vec<FontDescriptor> = db
        .faces()
        .filter_map(|face| face_path(face).map(|path| describe(face, path)))
        .collect();
    fonts.sort_by(|a, b| a.path.cmp(&b.path));
    fonts.dedup_by(|a, b| a.path == b.path);
    fonts.truncate(limit);
    fonts
}

fn describe(face: &fontdb::FaceInfo, path: &Path) -> FontDescriptor {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let label = match face.families.first() {
        Some((family, _)) if !family.is_empty() => format!("{} ({})", family, file_name),
        _ => file_name,
    };
    FontDescriptor {
        label,
        path: path.to_path_buf(),
    }
}

/// Path of the first face whose file name matches `file_name`, ignoring case
pub fn find_font_file(db: &fontdb::Database, file_name: &str) -> Option<PathBuf> {
    let mut matches: Vec<&Path> = db
        .faces()
        .filter_map(face_path)
        .filter(|path| {
            path.file_name()
                .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case(file_name))
        })
        .collect();
    matches.sort();
    matches.first().map(|path| path.to_path_buf())
}

/// Recursively list font files under `dir`, at most `limit` entries
pub fn list_fonts_in_directory(dir: &Path, limit: usize) -> Vec<FontDescriptor> {
    describe_fonts(&font_database(&[dir.to_path_buf()]), limit)
}

/// Discover fonts: custom directory first, then the given system directories
pub fn discover_fonts_in(custom_dir: &Path, system_dirs: &[PathBuf], limit: usize) -> Discovery {
    discover(custom_dir, limit, || describe_fonts(&font_database(system_dirs), limit))
}

/// Discover fonts with the OS font directories as the second choice
pub fn discover_fonts(custom_dir: &Path, limit: usize) -> Discovery {
    discover(custom_dir, limit, || describe_fonts(system_fonts(), limit))
}

fn discover<F>(custom_dir: &Path, limit: usize, system: F) -> Discovery
where
    F: FnOnce() -> Vec<FontDescriptor>,
{
    let fonts = list_fonts_in_directory(custom_dir, limit);
    if !fonts.is_empty() {
        let shown = custom_dir
            .canonicalize()
            .unwrap_or_else(|_| custom_dir.to_path_buf());
        return Discovery {
            fonts,
            description: format!("using custom font directory: {}", shown.display()),
        };
    }

    let fonts = system();
    debug!(count = fonts.len(), "scanned system font directories");
    let description = if fonts.is_empty() {
        "no fonts found in the custom or system directories; the built-in glyph source will be used"
    } else {
        "no fonts in the custom directory; picked some from the system font directories"
    };
    Discovery {
        fonts,
        description: description.to_string(),
    }
}

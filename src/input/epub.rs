use super::{LoadError, LoadedText};
use std::path::Path;

/// Load chapter text from an EPUB file, markup removed
pub fn load(path: &str) -> Result<LoadedText, LoadError> {
    let path = Path::new(path);

    if !path.exists() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }

    let mut doc = epub::doc::EpubDoc::new(path).map_err(|e| LoadError::EpubParse(e.to_string()))?;

    let chapters: Vec<String> = (0..doc.get_num_chapters())
        .filter_map(|idx| {
            if !doc.set_current_chapter(idx) {
                return None;
            }
            doc.get_current_str()
                .map(|(html, _mime)| extract_plain_text(&html))
        })
        .filter(|text| !text.is_empty())
        .collect();

    if chapters.is_empty() {
        return Err(LoadError::EpubParse("No readable chapters in EPUB".to_string()));
    }

    LoadedText::new(chapters.join("\n\n"), format!("epub:{}", path.display()))
}

/// Strip markup, breaking lines at tag boundaries, and drop blank lines.
/// Character entities are left as-is.
fn extract_plain_text(html: &str) -> String {
    let mut raw = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                raw.push('\n');
            }
            '>' => in_tag = false,
            _ if !in_tag => raw.push(c),
            _ => {}
        }
    }

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

//! Font Resolver and glyph rasterization
//!
//! Resolution order: the requested path, then a fixed list of common CJK
//! font files looked up by file name in a `fontdb` database (subdirectories
//! included), then the built-in glyph source. The built-in source draws a
//! hollow "missing glyph" box for every character; it is a degraded mode,
//! not an error, and is flagged in the returned [`FontInfo`].
//!
//! Resolutions are memoized per `(path, size)` for the lifetime of a
//! [`FontResolver`], which a caller keeps for one generation run or session.

use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::discovery::{find_font_file, font_database, system_fonts};

/// Common CJK font files tried when the requested font cannot be loaded
const FALLBACK_FONTS: [&str; 7] = [
    "simkai.ttf",
    "simhei.ttf",
    "msyh.ttc",
    "NotoSansCJK-Regular.ttc",
    "NotoSerifCJK-Regular.ttc",
    "wqy-microhei.ttc",
    "PingFang.ttc",
];

pub const BUILTIN_FAMILY: &str = "Built-in";
pub const BUILTIN_SOURCE: &str = "built-in default (may not render CJK)";

/// How the glyph source was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Requested,
    Fallback(String),
    Builtin,
}

impl FontSource {
    pub fn label(&self) -> String {
        match self {
            FontSource::Requested => "requested font".to_string(),
            FontSource::Fallback(name) => format!("fallback font ({})", name),
            FontSource::Builtin => BUILTIN_SOURCE.to_string(),
        }
    }
}

/// Provenance metadata for a resolved font
#[derive(Debug, Clone, PartialEq)]
pub struct FontInfo {
    pub requested_path: String,
    /// `None` for the built-in source
    pub resolved_path: Option<PathBuf>,
    pub family: String,
    pub style: String,
    pub source: FontSource,
}

impl FontInfo {
    pub fn fallback_used(&self) -> bool {
        self.source != FontSource::Requested
    }
}

/// Where glyph outlines come from
pub enum GlyphSource {
    Outline(FontVec),
    /// Hollow box for every character
    Builtin,
}

/// Coverage callback target: absolute pixel position and coverage in [0, 1]
pub trait CoverageSink {
    fn plot(&mut self, x: i32, y: i32, coverage: f32);
}

impl<F: FnMut(i32, i32, f32)> CoverageSink for F {
    fn plot(&mut self, x: i32, y: i32, coverage: f32) {
        self(x, y, coverage)
    }
}

/// A resolved glyph source at a fixed em size. Never mutated after resolution.
#[derive(Clone)]
pub struct FontHandle {
    source: Arc<GlyphSource>,
    info: Arc<FontInfo>,
    size: f32,
}

impl FontHandle {
    pub fn builtin(requested_path: &str, size: f32) -> Self {
        Self {
            source: Arc::new(GlyphSource::Builtin),
            info: Arc::new(FontInfo {
                requested_path: requested_path.to_string(),
                resolved_path: None,
                family: BUILTIN_FAMILY.to_string(),
                style: "Regular".to_string(),
                source: FontSource::Builtin,
            }),
            size,
        }
    }

    pub fn info(&self) -> &FontInfo {
        &self.info
    }

    /// Em size in pixels
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn is_builtin(&self) -> bool {
        matches!(*self.source, GlyphSource::Builtin)
    }

    /// Rasterize `text` centered on `(cx, cy)`
    ///
    /// Horizontal centering uses the total advance width; vertical centering
    /// uses the midpoint between ascender and descender.
    pub fn draw_centered<S: CoverageSink>(&self, text: &str, cx: f32, cy: f32, sink: &mut S) {
        match &*self.source {
            GlyphSource::Outline(font) => self.draw_outline(font, text, cx, cy, sink),
            GlyphSource::Builtin => self.draw_missing_box(text, cx, cy, sink),
        }
    }

    fn draw_outline<S: CoverageSink>(
        &self,
        font: &FontVec,
        text: &str,
        cx: f32,
        cy: f32,
        sink: &mut S,
    ) {
        let scale = em_to_px_scale(font, self.size);
        let scaled = font.as_scaled(scale);

        let ids: Vec<GlyphId> = text.chars().map(|c| font.glyph_id(c)).collect();
        let total_advance: f32 = ids.iter().map(|id| scaled.h_advance(*id)).sum();
        let baseline = cy + (scaled.ascent() + scaled.descent()) / 2.0;

        let mut pen_x = cx - total_advance / 2.0;
        for id in ids {
            let glyph = id.with_scale_and_position(scale, point(pen_x, baseline));
            pen_x += scaled.h_advance(id);
            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let (left, top) = (bounds.min.x as i32, bounds.min.y as i32);
            outlined.draw(|x, y, coverage| {
                sink.plot(left + x as i32, top + y as i32, coverage);
            });
        }
    }

    fn draw_missing_box<S: CoverageSink>(&self, text: &str, cx: f32, cy: f32, sink: &mut S) {
        let count = text.chars().count().max(1) as f32;
        let side = (self.size * 0.8).max(1.0);
        let stroke = (self.size / 12.0).max(1.0) as i32;
        let advance = self.size;

        let mut left_edge = cx - advance * count / 2.0;
        for _ in 0..count as usize {
            let x0 = (left_edge + (advance - side) / 2.0) as i32;
            let y0 = (cy - side / 2.0) as i32;
            let x1 = x0 + side as i32;
            let y1 = y0 + side as i32;
            for y in y0..y1 {
                for x in x0..x1 {
                    let on_edge =
                        x < x0 + stroke || x >= x1 - stroke || y < y0 + stroke || y >= y1 - stroke;
                    if on_edge {
                        sink.plot(x, y, 1.0);
                    }
                }
            }
            left_edge += advance;
        }
    }
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle")
            .field("info", &self.info)
            .field("size", &self.size)
            .finish()
    }
}

/// PxScale whose em square is `em_px` pixels
fn em_to_px_scale(font: &FontVec, em_px: f32) -> PxScale {
    let units_per_em = font.units_per_em().unwrap_or(1000.0);
    PxScale::from(em_px * font.height_unscaled() / units_per_em)
}

/// Where bare fallback file names are looked up
enum FontSearch {
    /// Working directory, then the process-wide OS font database
    System,
    Dirs(fontdb::Database),
}

/// Memoizing resolver for one run or session
pub struct FontResolver {
    cache: HashMap<(String, u32), FontHandle>,
    search: FontSearch,
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FontResolver {
    /// Resolver that looks up bare fallback names in the OS font directories
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            search: FontSearch::System,
        }
    }

    /// Resolver that only searches the given directories, recursively
    pub fn with_search_dirs(search_dirs: Vec<PathBuf>) -> Self {
        Self {
            cache: HashMap::new(),
            search: FontSearch::Dirs(font_database(&search_dirs)),
        }
    }

    /// Resolve a font for the requested path at an em size. Never fails.
    pub fn resolve(&mut self, requested_path: &str, size: f32) -> FontHandle {
        let key = (requested_path.to_string(), size.to_bits());
        if let Some(handle) = self.cache.get(&key) {
            return handle.clone();
        }
        let handle = self.resolve_uncached(requested_path, size);
        self.cache.insert(key, handle.clone());
        handle
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn resolve_uncached(&self, requested_path: &str, size: f32) -> FontHandle {
        if !requested_path.is_empty() {
            match load_font(Path::new(requested_path)) {
                Some((font, names)) => {
                    debug!(path = requested_path, family = %names.0, "loaded requested font");
                    return make_handle(
                        font,
                        names,
                        requested_path,
                        PathBuf::from(requested_path),
                        FontSource::Requested,
                        size,
                    );
                }
                None => warn!(path = requested_path, "requested font unusable, trying fallbacks"),
            }
        }

        for name in FALLBACK_FONTS {
            let Some(candidate) = self.find_fallback(name) else {
                continue;
            };
            if let Some((font, names)) = load_font(&candidate) {
                info!(font = %candidate.display(), "using fallback font");
                return make_handle(
                    font,
                    names,
                    requested_path,
                    candidate,
                    FontSource::Fallback(name.to_string()),
                    size,
                );
            }
        }

        warn!("no usable font found, using built-in glyph source");
        FontHandle::builtin(requested_path, size)
    }

    fn find_fallback(&self, name: &str) -> Option<PathBuf> {
        match &self.search {
            FontSearch::System => {
                let local = Path::new(name);
                if local.is_file() {
                    return Some(local.to_path_buf());
                }
                find_font_file(system_fonts(), name)
            }
            FontSearch::Dirs(db) => find_font_file(db, name),
        }
    }
}

fn make_handle(
    font: FontVec,
    (family, style): (String, String),
    requested_path: &str,
    resolved_path: PathBuf,
    source: FontSource,
    size: f32,
) -> FontHandle {
    FontHandle {
        source: Arc::new(GlyphSource::Outline(font)),
        info: Arc::new(FontInfo {
            requested_path: requested_path.to_string(),
            resolved_path: Some(resolved_path),
            family,
            style,
            source,
        }),
        size,
    }
}

/// Load a font file (face 0 of collections) with its family and style names
pub fn load_font(path: &Path) -> Option<(FontVec, (String, String))> {
    let bytes = std::fs::read(path).ok()?;
    let names = font_names(&bytes).unwrap_or_else(|| (file_stem(path), "Regular".to_string()));
    let font = FontVec::try_from_vec_and_index(bytes, 0).ok()?;
    Some((font, names))
}

/// Family and style from the font's name table
pub fn font_names(bytes: &[u8]) -> Option<(String, String)> {
    let face = ttf_parser::Face::parse(bytes, 0).ok()?;
    let lookup = |id: u16| {
        face.names()
            .into_iter()
            .filter(|name| name.name_id == id)
            .find_map(|name| name.to_string())
    };
    let family = lookup(ttf_parser::name_id::FAMILY)?;
    let style = lookup(ttf_parser::name_id::SUBFAMILY).unwrap_or_else(|| "Regular".to_string());
    Some((family, style))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

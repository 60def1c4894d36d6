// Configuration for worksheet layout, fonts, corpus access and export
// All defaults mirror the sheet the generator has always produced (A4 at 300 dpi)

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::ConfigError;

/// Grid decoration drawn in every cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum GridStyle {
    /// 方格: outer rectangle only
    Box,
    /// 田字格: outer rectangle plus center cross
    BoxCross,
    /// 米字格: outer rectangle, both diagonals and center cross
    BoxDiagCross,
    /// 回宫格: outer rectangle plus two inset rectangles
    NestedBox,
    /// 九宫格: outer rectangle split into 3x3
    Box3x3,
}

impl GridStyle {
    pub const ALL: [GridStyle; 5] = [
        GridStyle::Box,
        GridStyle::BoxCross,
        GridStyle::BoxDiagCross,
        GridStyle::NestedBox,
        GridStyle::Box3x3,
    ];

    /// Parse a style name. Unknown names fall back to a plain box.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "box-cross" | "tianzige" | "田字格" => GridStyle::BoxCross,
            "box-diag-cross" | "mizige" | "米字格" => GridStyle::BoxDiagCross,
            "nested-box" | "huigongge" | "回宫格" => GridStyle::NestedBox,
            "box-3x3" | "jiugongge" | "九宫格" => GridStyle::Box3x3,
            _ => GridStyle::Box,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GridStyle::Box => "box",
            GridStyle::BoxCross => "box-cross",
            GridStyle::BoxDiagCross => "box-diag-cross",
            GridStyle::NestedBox => "nested-box",
            GridStyle::Box3x3 => "box-3x3",
        }
    }
}

impl From<String> for GridStyle {
    fn from(name: String) -> Self {
        GridStyle::from_name(&name)
    }
}

/// RGB triple
pub type Rgb = [u8; 3];

/// Ink colors offered for grid lines and demonstration glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum InkColor {
    Black,
    Green,
    Red,
}

impl InkColor {
    /// Parse a color name. Unknown names fall back to black.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "green" | "绿色" => InkColor::Green,
            "red" | "红色" => InkColor::Red,
            _ => InkColor::Black,
        }
    }

    pub fn rgb(&self) -> Rgb {
        match self {
            InkColor::Black => [0, 0, 0],
            InkColor::Green => [0, 160, 0],
            InkColor::Red => [200, 0, 0],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InkColor::Black => "black",
            InkColor::Green => "green",
            InkColor::Red => "red",
        }
    }
}

impl From<String> for InkColor {
    fn from(name: String) -> Self {
        InkColor::from_name(&name)
    }
}

/// Named tracing shades, each a fixed demonstration alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    VeryDark,
    Dark,
    Darker,
    Lighter,
    Medium,
    VeryLight,
    Invisible,
    /// Meant to be outline-only; rendered as a dark fill
    Hollow,
}

impl Shade {
    /// Parse a shade name. Unknown names fall back to medium.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "very-dark" | "非常深" => Shade::VeryDark,
            "dark" | "深" => Shade::Dark,
            "darker" | "较深" => Shade::Darker,
            "lighter" | "略浅" => Shade::Lighter,
            "very-light" | "非常浅" => Shade::VeryLight,
            "invisible" | "白色（不可见）" | "白色" => Shade::Invisible,
            "hollow" | "空芯" => Shade::Hollow,
            _ => Shade::Medium,
        }
    }

    pub fn alpha(&self) -> u8 {
        match self {
            Shade::VeryDark => 220,
            Shade::Dark => 190,
            Shade::Darker => 160,
            Shade::Lighter => 130,
            Shade::Medium => 110,
            Shade::VeryLight => 80,
            Shade::Invisible => 0,
            Shade::Hollow => 200,
        }
    }
}

/// Clamp an arbitrary integer into the demonstration alpha range
pub fn clamp_alpha(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

fn deserialize_alpha<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    Ok(clamp_alpha(value))
}

/// Fixed page raster geometry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    /// Page width in pixels (default 2480, A4 portrait at 300 dpi)
    pub width: u32,

    /// Page height in pixels (default 3508)
    pub height: u32,

    /// Horizontal margin kept free on both sides (default 150)
    pub margin_x: u32,

    /// Vertical margin kept free on top and bottom (default 250)
    pub margin_y: u32,

    /// Glyph em size relative to the cell size (default 0.7)
    pub glyph_scale: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: 2480,
            height: 3508,
            margin_x: 150,
            margin_y: 250,
            glyph_scale: 0.7,
        }
    }
}

/// Layout parameters for one generation run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub grid_style: GridStyle,
    pub grid_color: InkColor,
    pub text_color: InkColor,

    /// Opacity of demonstration glyphs
    #[serde(deserialize_with = "deserialize_alpha")]
    pub demo_alpha: u8,

    /// Cells per row
    pub columns: u32,

    /// Rows per page
    pub rows: u32,

    /// Consecutive cells generated per input character
    pub repeat_count: u32,

    /// Independent gate for demonstration glyphs; `demo_alpha` is unused when false
    pub show_demo: bool,

    /// Pad the last page by repeating its final character
    pub fill_last_page: bool,

    /// Leave every odd row blank for copying practice
    pub skip_alternate_rows: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid_style: GridStyle::BoxDiagCross,
            grid_color: InkColor::Red,
            text_color: InkColor::Black,
            demo_alpha: Shade::Medium.alpha(),
            columns: 10,
            rows: 14,
            repeat_count: 1,
            show_demo: true,
            fill_last_page: false,
            skip_alternate_rows: false,
        }
    }
}

impl LayoutConfig {
    /// Copy with zero counts raised to one
    pub fn normalized(&self) -> Self {
        Self {
            columns: self.columns.max(1),
            rows: self.rows.max(1),
            repeat_count: self.repeat_count.max(1),
            ..self.clone()
        }
    }

    /// Number of rows that carry demonstration glyphs
    pub fn demo_rows(&self) -> u32 {
        let rows = self.rows.max(1);
        if self.skip_alternate_rows {
            rows.div_ceil(2)
        } else {
            rows
        }
    }

    /// Whether the given 0-based row is a demonstration row
    pub fn is_demo_row(&self, row: u32) -> bool {
        !self.skip_alternate_rows || row % 2 == 0
    }

    /// Demonstration cells available on one page
    pub fn page_capacity(&self) -> usize {
        self.columns.max(1) as usize * self.demo_rows() as usize
    }
}

/// Font selection and discovery
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Requested font file; empty means use the fallback chain
    pub font_path: String,

    /// Directory scanned first during discovery
    pub font_dir: PathBuf,

    /// Maximum number of discovered fonts
    pub discovery_limit: usize,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            font_path: String::new(),
            font_dir: PathBuf::from("./fonts"),
            discovery_limit: 50,
        }
    }
}

/// Poetry corpus location
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub repo_url: String,
    pub repo_dir: PathBuf,

    /// Dataset registry; defaults to `<repo_dir>/loader/datas.json`
    pub registry_path: Option<PathBuf>,

    /// Poems kept from one dataset load
    pub max_poems: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            repo_url: "https://github.com/chinese-poetry/chinese-poetry.git".to_string(),
            repo_dir: PathBuf::from("./chinese-poetry"),
            registry_path: None,
            max_poems: 1000,
        }
    }
}

impl CorpusConfig {
    pub fn registry_path(&self) -> PathBuf {
        self.registry_path
            .clone()
            .unwrap_or_else(|| self.repo_dir.join("loader").join("datas.json"))
    }
}

/// Document export settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Raster pixels per inch in the PDF (72 maps one pixel to one point)
    pub dpi: f32,

    /// Deflate level for embedded page images (0-10)
    pub compression_level: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dpi: 72.0,
            compression_level: 6,
        }
    }
}

/// Master configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub page: PageGeometry,
    pub layout: LayoutConfig,
    pub font: FontConfig,
    pub corpus: CorpusConfig,
    pub export: ExportConfig,
}

impl Config {
    /// Read a JSON config file; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_json::from_str(content)?;
        config.layout = config.layout.normalized();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_style_names() {
        assert_eq!(GridStyle::from_name("田字格"), GridStyle::BoxCross);
        assert_eq!(GridStyle::from_name("mizige"), GridStyle::BoxDiagCross);
        assert_eq!(GridStyle::from_name("Box-3x3"), GridStyle::Box3x3);
        assert_eq!(GridStyle::from_name("回宫格"), GridStyle::NestedBox);
        for style in GridStyle::ALL {
            assert_eq!(GridStyle::from_name(style.name()), style);
        }
    }

    #[test]
    fn test_unknown_grid_style_is_box() {
        assert_eq!(GridStyle::from_name("hexagon"), GridStyle::Box);
        assert_eq!(GridStyle::from_name(""), GridStyle::Box);
    }

    #[test]
    fn test_ink_colors() {
        assert_eq!(InkColor::from_name("绿色").rgb(), [0, 160, 0]);
        assert_eq!(InkColor::from_name("red").rgb(), [200, 0, 0]);
        assert_eq!(InkColor::from_name("purple"), InkColor::Black);
    }

    #[test]
    fn test_shade_alpha() {
        assert_eq!(Shade::from_name("非常深").alpha(), 220);
        assert_eq!(Shade::from_name("invisible").alpha(), 0);
        assert_eq!(Shade::from_name("空芯").alpha(), 200);
        assert_eq!(Shade::from_name("whatever").alpha(), 110);
    }

    #[test]
    fn test_clamp_alpha() {
        assert_eq!(clamp_alpha(-5), 0);
        assert_eq!(clamp_alpha(300), 255);
        assert_eq!(clamp_alpha(128), 128);
    }

    #[test]
    fn test_capacity_with_skipped_rows() {
        let config = LayoutConfig {
            columns: 4,
            rows: 5,
            skip_alternate_rows: true,
            ..LayoutConfig::default()
        };
        assert_eq!(config.demo_rows(), 3);
        assert_eq!(config.page_capacity(), 12);
        let demo: Vec<u32> = (0..5).filter(|r| config.is_demo_row(*r)).collect();
        assert_eq!(demo, vec![0, 2, 4]);
    }

    #[test]
    fn test_normalized_raises_zero_counts() {
        let config = LayoutConfig {
            columns: 0,
            rows: 0,
            repeat_count: 0,
            ..LayoutConfig::default()
        }
        .normalized();
        assert_eq!((config.columns, config.rows, config.repeat_count), (1, 1, 1));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = Config::from_json(
            r#"{ "layout": { "grid_style": "九宫格", "columns": 0, "text_color": "green" },
                 "page": { "width": 800 } }"#,
        )
        .unwrap();
        assert_eq!(config.layout.grid_style, GridStyle::Box3x3);
        assert_eq!(config.layout.columns, 1);
        assert_eq!(config.layout.text_color, InkColor::Green);
        assert_eq!(config.layout.rows, 14);
        assert_eq!(config.page.width, 800);
        assert_eq!(config.page.height, 3508);
    }

    #[test]
    fn test_config_clamps_alpha() {
        let config = Config::from_json(r#"{ "layout": { "demo_alpha": 999 } }"#).unwrap();
        assert_eq!(config.layout.demo_alpha, 255);
        let config = Config::from_json(r#"{ "layout": { "demo_alpha": -3 } }"#).unwrap();
        assert_eq!(config.layout.demo_alpha, 0);
    }

    #[test]
    fn test_default_registry_path() {
        let corpus = CorpusConfig::default();
        assert_eq!(
            corpus.registry_path(),
            PathBuf::from("./chinese-poetry").join("loader").join("datas.json")
        );
    }
}

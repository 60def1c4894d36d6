use crate::engine::config::{GridStyle, InkColor, Shade};

/// Application events
#[derive(Debug, PartialEq, Clone)]
pub enum AppEvent {
    Quit,
    Help,

    /// Replace the input text with a typed line
    SetText(String),
    LoadFile(String),
    LoadClipboard,

    SetStyle(GridStyle),
    SetGridColor(InkColor),
    SetTextColor(InkColor),
    SetShade(Shade),
    /// Raw alpha, clamped on apply
    SetAlpha(i64),
    SetColumns(u32),
    SetRows(u32),
    SetRepeat(u32),
    ShowDemo(bool),
    FillLastPage(bool),
    PracticeRows(bool),

    /// Font file path; empty restores the fallback chain
    SetFont(String),
    /// 1-based index into the last font listing
    SelectFont(usize),
    ListFonts,

    Generate,
    NextPage,
    PrevPage,
    GoToPage(usize),
    SavePage(Option<String>),
    SavePdf(Option<String>),
    Preview,

    ListDatasets,
    /// Dataset key or path to a poem JSON file
    LoadPoems(String),
    /// 1-based index into the loaded poem list
    SelectPoem(usize),
    /// Dataset keys or numeric ids whose body lines become the text
    UseDatasets(Vec<String>),
    Fetch,
    Status,

    InvalidCommand(String),
    None,
}

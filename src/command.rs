//! Command line parsing
//!
//! - `:name [args]` → settings, navigation, export and corpus commands
//! - `@path` → load a text, PDF or EPUB file
//! - `@@` → load the clipboard
//! - any other non-blank line → new input text

use crate::app::AppEvent;
use crate::engine::config::{GridStyle, InkColor, Shade};

pub const HELP_TEXT: &str = "\
Commands:
  <text>               use the line as input text
  @path                load text from a .txt, .pdf or .epub file
  @@                   load text from the clipboard
  :style <name>        box | box-cross | box-diag-cross | nested-box | box-3x3
  :grid-color <name>   black | green | red
  :text-color <name>   black | green | red
  :shade <name>        very-dark | dark | darker | lighter | medium | very-light | invisible | hollow
  :alpha <0-255>       demonstration opacity
  :cols <n>  :rows <n>  :repeat <n>
  :demo on|off         show demonstration glyphs
  :fill on|off         pad the last page with its final character
  :practice on|off     leave every other row blank
  :font [path|#n]      font file, entry n of :fonts, or none for the fallback chain
  :fonts               list discovered fonts
  :gen                 generate the worksheet
  :next  :prev  :page <n>
  :save-page [path]    write the current page as PNG
  :save-pdf [path]     write all pages as one PDF
  :preview             print the current page as a PNG data URI
  :datasets            list corpus datasets
  :poems <key|file>    load poems from a dataset or a poem JSON file
  :poem <n>            use poem n as input text
  :use <key|id>...     use body lines of datasets as input text
  :fetch               clone or update the poetry repository
  :status              show the current session
  :q                   quit";

/// Parse one input line into an AppEvent
pub fn parse_command(input: &str) -> AppEvent {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return AppEvent::None;
    }

    if let Some(command) = trimmed.strip_prefix(':') {
        let (name, args) = match command.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (command, ""),
        };
        parse_colon_command(name, args, trimmed)
    } else if let Some(rest) = trimmed.strip_prefix('@') {
        let filename = rest.trim();
        if filename.is_empty() || filename == "@" {
            AppEvent::LoadClipboard
        } else {
            AppEvent::LoadFile(filename.to_string())
        }
    } else {
        AppEvent::SetText(trimmed.to_string())
    }
}

fn parse_colon_command(name: &str, args: &str, input: &str) -> AppEvent {
    match name {
        "q" | "quit" => AppEvent::Quit,
        "h" | "help" => AppEvent::Help,
        "style" => required(args, input, |a| AppEvent::SetStyle(GridStyle::from_name(a))),
        "grid-color" => required(args, input, |a| {
            AppEvent::SetGridColor(InkColor::from_name(a))
        }),
        "text-color" => required(args, input, |a| {
            AppEvent::SetTextColor(InkColor::from_name(a))
        }),
        "shade" => required(args, input, |a| AppEvent::SetShade(Shade::from_name(a))),
        "alpha" => match args.parse::<i64>() {
            Ok(value) => AppEvent::SetAlpha(value),
            Err(_) => AppEvent::InvalidCommand(format!("{} (expects a number)", input)),
        },
        "cols" | "columns" => number(args, input, AppEvent::SetColumns),
        "rows" => number(args, input, AppEvent::SetRows),
        "repeat" => number(args, input, AppEvent::SetRepeat),
        "demo" => switch(args, input, AppEvent::ShowDemo),
        "fill" => switch(args, input, AppEvent::FillLastPage),
        "practice" => switch(args, input, AppEvent::PracticeRows),
        "font" => match args.strip_prefix('#') {
            Some(index) => match index.parse::<usize>() {
                Ok(n) if n > 0 => AppEvent::SelectFont(n),
                _ => AppEvent::InvalidCommand(format!("{} (expects #<n>, n >= 1)", input)),
            },
            None => AppEvent::SetFont(args.to_string()),
        },
        "fonts" => AppEvent::ListFonts,
        "gen" | "generate" => AppEvent::Generate,
        "next" | "n" => AppEvent::NextPage,
        "prev" | "p" => AppEvent::PrevPage,
        "page" => number(args, input, |n| AppEvent::GoToPage(n as usize)),
        "save-page" => AppEvent::SavePage(optional(args)),
        "save-pdf" => AppEvent::SavePdf(optional(args)),
        "preview" => AppEvent::Preview,
        "datasets" => AppEvent::ListDatasets,
        "poems" => required(args, input, |a| AppEvent::LoadPoems(a.to_string())),
        "poem" => number(args, input, |n| AppEvent::SelectPoem(n as usize)),
        "use" => required(args, input, |a| {
            AppEvent::UseDatasets(a.split_whitespace().map(str::to_string).collect())
        }),
        "fetch" => AppEvent::Fetch,
        "status" => AppEvent::Status,
        _ => AppEvent::InvalidCommand(input.to_string()),
    }
}

fn required(args: &str, input: &str, make: impl FnOnce(&str) -> AppEvent) -> AppEvent {
    if args.is_empty() {
        AppEvent::InvalidCommand(format!("{} (missing argument)", input))
    } else {
        make(args)
    }
}

fn optional(args: &str) -> Option<String> {
    (!args.is_empty()).then(|| args.to_string())
}

fn number(args: &str, input: &str, make: impl FnOnce(u32) -> AppEvent) -> AppEvent {
    match args.parse::<u32>() {
        Ok(n) => make(n),
        Err(_) => AppEvent::InvalidCommand(format!("{} (expects a number)", input)),
    }
}

fn switch(args: &str, input: &str, make: impl FnOnce(bool) -> AppEvent) -> AppEvent {
    match args.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => make(true),
        "off" | "false" | "no" | "0" => make(false),
        _ => AppEvent::InvalidCommand(format!("{} (expects on or off)", input)),
    }
}

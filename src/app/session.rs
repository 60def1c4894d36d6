use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::event::AppEvent;
use crate::command::HELP_TEXT;
use crate::corpus::{load_poems_from_json, CorpusFetcher, CorpusLoader, GitFetcher, Poem};
use crate::engine::config::{clamp_alpha, Config};
use crate::engine::generator::{generate, Document};
use crate::export::{self, page_file_name, to_data_uri, DOCUMENT_FILE_NAME};
use crate::input::{self, LoadedText};
use crate::rendering::discovery::{discover_fonts, FontDescriptor};
use crate::rendering::font::FontResolver;

/// Entries shown when listing poems
const POEM_LISTING: usize = 20;

/// User-visible outcome of one event
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Info(String),
    Warning(String),
    Error(String),
}

impl Feedback {
    pub fn message(&self) -> &str {
        match self {
            Feedback::Info(m) | Feedback::Warning(m) | Feedback::Error(m) => m,
        }
    }
}

/// Everything one interactive session remembers between commands
pub struct Session {
    pub config: Config,
    text: String,
    document: Document,
    pdf_bytes: Vec<u8>,
    /// 1-based; 0 only while the document is empty
    current_page: usize,
    poems: Vec<Poem>,
    fonts: Vec<FontDescriptor>,
    resolver: FontResolver,
    fetcher: Box<dyn CorpusFetcher>,
    quit: bool,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self::with_services(config, FontResolver::new(), Box::new(GitFetcher::default()))
    }

    pub fn with_services(
        config: Config,
        resolver: FontResolver,
        fetcher: Box<dyn CorpusFetcher>,
    ) -> Self {
        Self {
            config,
            text: String::new(),
            document: Document::default(),
            pdf_bytes: Vec::new(),
            current_page: 0,
            poems: Vec::new(),
            fonts: Vec::new(),
            resolver,
            fetcher,
            quit: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn pdf_bytes(&self) -> &[u8] {
        &self.pdf_bytes
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn poems(&self) -> &[Poem] {
        &self.poems
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Option<Feedback> {
        let feedback = match event {
            AppEvent::None => return None,
            AppEvent::Quit => {
                self.quit = true;
                return None;
            }
            AppEvent::Help => Feedback::Info(HELP_TEXT.to_string()),
            AppEvent::InvalidCommand(input) => {
                Feedback::Error(format!("Unknown command: {} (try :h)", input))
            }

            AppEvent::SetText(text) => self.set_text(LoadedText {
                text,
                source: "typed".to_string(),
            }),
            AppEvent::LoadFile(path) => match input::load_file(&path) {
                Ok(loaded) => self.set_text(loaded),
                Err(err) => Feedback::Error(err.to_string()),
            },
            AppEvent::LoadClipboard => match input::clipboard::load() {
                Ok(loaded) => self.set_text(loaded),
                Err(err) => Feedback::Error(err.to_string()),
            },

            AppEvent::SetStyle(style) => {
                self.config.layout.grid_style = style;
                Feedback::Info(format!("grid style: {}", style.name()))
            }
            AppEvent::SetGridColor(color) => {
                self.config.layout.grid_color = color;
                Feedback::Info(format!("grid color: {}", color.name()))
            }
            AppEvent::SetTextColor(color) => {
                self.config.layout.text_color = color;
                Feedback::Info(format!("text color: {}", color.name()))
            }
            AppEvent::SetShade(shade) => {
                self.config.layout.demo_alpha = shade.alpha();
                Feedback::Info(format!("demonstration alpha: {}", self.config.layout.demo_alpha))
            }
            AppEvent::SetAlpha(value) => {
                self.config.layout.demo_alpha = clamp_alpha(value);
                Feedback::Info(format!("demonstration alpha: {}", self.config.layout.demo_alpha))
            }
            AppEvent::SetColumns(n) => {
                self.config.layout.columns = n.max(1);
                Feedback::Info(format!("columns: {}", self.config.layout.columns))
            }
            AppEvent::SetRows(n) => {
                self.config.layout.rows = n.max(1);
                Feedback::Info(format!("rows: {}", self.config.layout.rows))
            }
            AppEvent::SetRepeat(n) => {
                self.config.layout.repeat_count = n.max(1);
                Feedback::Info(format!("repeat count: {}", self.config.layout.repeat_count))
            }
            AppEvent::ShowDemo(on) => {
                self.config.layout.show_demo = on;
                Feedback::Info(format!("demonstration glyphs: {}", on_off(on)))
            }
            AppEvent::FillLastPage(on) => {
                self.config.layout.fill_last_page = on;
                Feedback::Info(format!("fill last page: {}", on_off(on)))
            }
            AppEvent::PracticeRows(on) => {
                self.config.layout.skip_alternate_rows = on;
                Feedback::Info(format!("blank practice rows: {}", on_off(on)))
            }

            AppEvent::SetFont(path) => {
                self.config.font.font_path = path;
                if self.config.font.font_path.is_empty() {
                    Feedback::Info("font: fallback chain".to_string())
                } else {
                    Feedback::Info(format!("font: {}", self.config.font.font_path))
                }
            }
            AppEvent::SelectFont(n) => match n.checked_sub(1).and_then(|i| self.fonts.get(i)) {
                Some(font) => {
                    self.config.font.font_path = font.path.to_string_lossy().into_owned();
                    Feedback::Info(format!("font: {}", font.label))
                }
                None => Feedback::Warning(format!(
                    "no font #{} (run :fonts, {} listed)",
                    n,
                    self.fonts.len()
                )),
            },
            AppEvent::ListFonts => self.list_fonts(),

            AppEvent::Generate => self.generate(),
            AppEvent::NextPage => self.go_to(self.current_page.saturating_add(1)),
            AppEvent::PrevPage => self.go_to(self.current_page.saturating_sub(1)),
            AppEvent::GoToPage(n) => self.go_to(n),
            AppEvent::SavePage(path) => self.save_page(path),
            AppEvent::SavePdf(path) => self.save_pdf(path),
            AppEvent::Preview => match self.document.page(self.current_page) {
                Some(page) => match to_data_uri(page) {
                    Ok(uri) => Feedback::Info(uri),
                    Err(err) => Feedback::Error(err.to_string()),
                },
                None => Feedback::Warning("nothing generated yet (:gen)".to_string()),
            },

            AppEvent::ListDatasets => match self.open_corpus() {
                Ok(loader) => {
                    let keys = loader.dataset_keys();
                    if keys.is_empty() {
                        Feedback::Warning("the registry lists no datasets".to_string())
                    } else {
                        Feedback::Info(keys.join("\n"))
                    }
                }
                Err(feedback) => feedback,
            },
            AppEvent::LoadPoems(source) => self.load_poems(&source),
            AppEvent::SelectPoem(n) => match n.checked_sub(1).and_then(|i| self.poems.get(i)) {
                Some(poem) => {
                    let loaded = LoadedText {
                        text: poem.content.clone(),
                        source: poem.label.clone(),
                    };
                    self.set_text(loaded)
                }
                None => Feedback::Warning(format!(
                    "no poem #{} ({} loaded)",
                    n,
                    self.poems.len()
                )),
            },
            AppEvent::UseDatasets(keys) => self.use_datasets(&keys),
            AppEvent::Fetch => {
                let status = self
                    .fetcher
                    .fetch(&self.config.corpus.repo_url, &self.config.corpus.repo_dir);
                if status.ok {
                    Feedback::Info(status.message)
                } else {
                    Feedback::Error(status.message)
                }
            }
            AppEvent::Status => Feedback::Info(self.status()),
        };
        Some(feedback)
    }

    fn set_text(&mut self, loaded: LoadedText) -> Feedback {
        let count = loaded.text.chars().filter(|c| !c.is_whitespace()).count();
        info!(source = %loaded.source, characters = count, "input text replaced");
        self.text = loaded.text;
        Feedback::Info(format!("{} characters from {}", count, loaded.source))
    }

    fn generate(&mut self) -> Feedback {
        if self.text.trim().is_empty() {
            return Feedback::Warning("no input text; enter some text first".to_string());
        }

        let document = generate(
            &self.text,
            &self.config.layout,
            &self.config.page,
            &self.config.font.font_path,
            &mut self.resolver,
        );
        let pdf_bytes = match export::to_document(&document.pages, &self.config.export) {
            Ok(bytes) => bytes,
            Err(err) => return Feedback::Error(err.to_string()),
        };

        self.document = document;
        self.pdf_bytes = pdf_bytes;
        self.current_page = if self.document.is_empty() { 0 } else { 1 };

        let font_note = self
            .document
            .font
            .as_ref()
            .map(|font| {
                let info = font.info();
                format!("{} {} ({})", info.family, info.style, info.source.label())
            })
            .unwrap_or_default();
        let message = format!("{} page(s) generated; font: {}", self.document.len(), font_note);
        match self.document.font.as_ref() {
            Some(font) if font.info().fallback_used() => Feedback::Warning(message),
            _ => Feedback::Info(message),
        }
    }

    fn go_to(&mut self, number: usize) -> Feedback {
        if self.document.is_empty() {
            return Feedback::Warning("nothing generated yet (:gen)".to_string());
        }
        self.current_page = number.clamp(1, self.document.len());
        Feedback::Info(format!("page {} / {}", self.current_page, self.document.len()))
    }

    fn save_page(&self, path: Option<String>) -> Feedback {
        let Some(page) = self.document.page(self.current_page) else {
            return Feedback::Warning("nothing generated yet (:gen)".to_string());
        };
        let path = path.map(PathBuf::from).unwrap_or_else(|| page_file_name(page).into());
        match export::save_page(page, &path) {
            Ok(()) => Feedback::Info(format!("saved {}", path.display())),
            Err(err) => Feedback::Error(err.to_string()),
        }
    }

    fn save_pdf(&self, path: Option<String>) -> Feedback {
        if self.pdf_bytes.is_empty() {
            return Feedback::Warning("nothing generated yet (:gen)".to_string());
        }
        let path = path.map(PathBuf::from).unwrap_or_else(|| DOCUMENT_FILE_NAME.into());
        match std::fs::write(&path, &self.pdf_bytes) {
            Ok(()) => Feedback::Info(format!(
                "saved {} ({} pages)",
                path.display(),
                self.document.len()
            )),
            Err(err) => Feedback::Error(format!("Failed to write {}: {}", path.display(), err)),
        }
    }

    fn list_fonts(&mut self) -> Feedback {
        let discovery = discover_fonts(&self.config.font.font_dir, self.config.font.discovery_limit);
        self.fonts = discovery.fonts;
        let mut lines = vec![discovery.description];
        lines.extend(
            self.fonts
                .iter()
                .enumerate()
                .map(|(i, font)| format!("#{:<3} {}", i + 1, font.label)),
        );
        if self.fonts.is_empty() {
            Feedback::Warning(lines.join("\n"))
        } else {
            Feedback::Info(lines.join("\n"))
        }
    }

    fn open_corpus(&self) -> Result<CorpusLoader, Feedback> {
        let corpus = &self.config.corpus;
        CorpusLoader::open(&corpus.registry_path(), &corpus.repo_dir).map_err(|err| {
            warn!(error = %err, "corpus unavailable");
            Feedback::Warning(format!("corpus unavailable ({}); try :fetch", err))
        })
    }

    fn load_poems(&mut self, source: &str) -> Feedback {
        let path = Path::new(source);
        let mut poems = if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
            match load_poems_from_json(path) {
                Ok(poems) => poems,
                Err(err) => return Feedback::Error(err.to_string()),
            }
        } else {
            let loader = match self.open_corpus() {
                Ok(loader) => loader,
                Err(feedback) => return feedback,
            };
            loader
                .poems_as_text(source)
                .into_iter()
                .map(|text| Poem {
                    label: text.lines().next().unwrap_or_default().to_string(),
                    // Header line stays in the practice text
                    content: text,
                })
                .collect()
        };
        poems.truncate(self.config.corpus.max_poems);
        self.poems = poems;

        if self.poems.is_empty() {
            return Feedback::Warning(format!("no poems found in {}", source));
        }
        let mut lines = vec![format!("{} poems loaded from {}", self.poems.len(), source)];
        lines.extend(
            self.poems
                .iter()
                .take(POEM_LISTING)
                .enumerate()
                .map(|(i, poem)| format!("{:>4}. {}", i + 1, poem.label)),
        );
        if self.poems.len() > POEM_LISTING {
            lines.push(format!("  ... {} more", self.poems.len() - POEM_LISTING));
        }
        Feedback::Info(lines.join("\n"))
    }

    fn use_datasets(&mut self, keys: &[String]) -> Feedback {
        let loader = match self.open_corpus() {
            Ok(loader) => loader,
            Err(feedback) => return feedback,
        };
        let ids: Option<Vec<u32>> = keys.iter().map(|k| k.parse().ok()).collect();
        let lines = match ids {
            Some(ids) => loader.body_lines_by_ids(&ids),
            None => {
                let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
                loader.body_lines_from_many(&keys)
            }
        };
        if lines.is_empty() {
            return Feedback::Warning(format!("no text in {}", keys.join(" ")));
        }
        self.set_text(LoadedText {
            text: lines.join("\n"),
            source: format!("datasets {}", keys.join(" ")),
        })
    }

    fn status(&self) -> String {
        let layout = &self.config.layout;
        let font = if self.config.font.font_path.is_empty() {
            "fallback chain"
        } else {
            &self.config.font.font_path
        };
        format!(
            "text: {} characters\n\
             grid: {} {}, {} x {}, repeat {}\n\
             glyphs: {} alpha {}, demo {}, fill {}, practice rows {}\n\
             font: {}\n\
             pages: {} (current {}), pdf {} bytes\n\
             poems loaded: {}",
            self.text.chars().filter(|c| !c.is_whitespace()).count(),
            layout.grid_style.name(),
            layout.grid_color.name(),
            layout.columns,
            layout.rows,
            layout.repeat_count,
            layout.text_color.name(),
            layout.demo_alpha,
            on_off(layout.show_demo),
            on_off(layout.fill_last_page),
            on_off(layout.skip_alternate_rows),
            font,
            self.document.len(),
            self.current_page,
            self.pdf_bytes.len(),
            self.poems.len(),
        )
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

//! Tianzige practice-sheet generator
//!
//! Text becomes a stream of display characters, the stream is split into
//! pages, every page is rasterized as a grid of practice cells with faint
//! demonstration glyphs, and the pages are exported as PNG or one PDF.

pub mod app;
pub mod command;
pub mod corpus;
pub mod engine;
pub mod export;
pub mod input;
pub mod rendering;

pub use engine::config::{Config, GridStyle, InkColor, LayoutConfig, PageGeometry, Shade};
pub use engine::generator::{generate, generate_with_font, Document, Page};
pub use rendering::font::{FontHandle, FontResolver};

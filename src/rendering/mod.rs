pub mod composer;
pub mod discovery;
pub mod font;
pub mod grid;

pub use composer::{render_page, GridLayout};
pub use discovery::{discover_fonts, Discovery, FontDescriptor};
pub use font::{FontHandle, FontInfo, FontResolver, FontSource};
pub use grid::draw_cell;

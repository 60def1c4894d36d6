pub mod config;
pub mod error;
pub mod generator;
pub mod paginator;
pub mod stream;

pub use config::{Config, LayoutConfig, PageGeometry};
pub use error::{ConfigError, ExportError};
pub use generator::{Document, Page};

//! Data models: name components, document types and configuration.

pub mod components;
pub mod config;
pub mod doctypes;

pub use components::NameComponents;
pub use config::{PdfConfig, RenameConfig, RenderConfig};

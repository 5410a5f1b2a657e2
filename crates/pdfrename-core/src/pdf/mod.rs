//! PDF text access: lazily extracted pages, text boxes, metadata.

mod content;
mod document;
pub mod encoding;
mod metadata;
mod text_boxes;

pub use content::{collect_layout, FontMap, PageFont, PageLayout};
pub use document::{Document, MEMORY_ORIGIN};
pub use encoding::decode_text_string;
pub use metadata::DocumentInfo;
pub use text_boxes::{Lookup, TextBoxes};

use crate::error::DocumentError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

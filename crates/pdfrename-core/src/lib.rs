//! Core library for renaming financial and utility PDFs.
//!
//! This crate provides:
//! - Lazy PDF text access: pages as ordered text boxes, metadata, dates
//! - An explicit registry of per-issuer extractors with at-most-one-match dispatch
//! - The name components model and its filename rendering
//! - A handful of built-in issuer extractors

pub mod dates;
pub mod error;
pub mod models;
pub mod pdf;
pub mod renamer;
pub mod vendors;

#[cfg(test)]
mod testing;

use std::path::Path;

use tracing::debug;

pub use error::{
    DateError, DispatchError, DocumentError, ExtractorError, LookupError, RenameError,
    RenderError, Result,
};
pub use models::{NameComponents, PdfConfig, RenameConfig, RenderConfig};
pub use pdf::{Document, Lookup, TextBoxes};
pub use renamer::{Extractor, ExtractorResult, Match, Outcome, Registry};
pub use vendors::{builtin_registry, register_all};

/// Work out the new filename for the PDF at `path`.
///
/// `Ok(None)` means no extractor recognised the document.
pub fn find_filename(
    path: impl AsRef<Path>,
    registry: &Registry,
    render: &RenderConfig,
) -> Result<Option<String>> {
    find_filename_with(path, registry, &RenameConfig {
        render: *render,
        pdf: PdfConfig::default(),
    })
}

/// Like [`find_filename`], with PDF loading options too.
pub fn find_filename_with(
    path: impl AsRef<Path>,
    registry: &Registry,
    config: &RenameConfig,
) -> Result<Option<String>> {
    let document = Document::open_with(path, &config.pdf)?;

    // Extractors almost all start from page 1; extract it up front so a
    // broken first page is reported once, as a document error.
    document.page(1)?;

    let Some(components) = registry.dispatch(&document)? else {
        debug!("{}: no extractor matched", document.origin());
        return Ok(None);
    };

    let filename = components.render_filename(
        config.render.include_account_holder,
        config.render.drop_honorific,
    )?;
    Ok(Some(filename))
}

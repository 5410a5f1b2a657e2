//! Extractors and the registry that dispatches documents to them.
//!
//! Each extractor recognises one kind of document from one issuer. Most
//! return [`Outcome::NotApplicable`] for almost every input; the registry
//! runs all of them and requires that at most one matches.

mod registry;
pub mod utils;

pub use registry::{Match, Registry};

use tracing::Span;

use crate::error::ExtractorError;
use crate::models::NameComponents;
use crate::pdf::{Document, TextBoxes};

/// What an extractor body returns: `Ok(None)` for "not my document".
pub type ExtractorResult = std::result::Result<Option<NameComponents>, ExtractorError>;

/// Result of evaluating one extractor against one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The document was recognised.
    Matched(NameComponents),
    /// The document is not one this extractor handles.
    NotApplicable,
    /// The extractor recognised part of the document but its assumptions
    /// about the layout did not hold.
    Malformed(String),
}

impl From<ExtractorResult> for Outcome {
    fn from(result: ExtractorResult) -> Self {
        match result {
            Ok(Some(components)) => Self::Matched(components),
            Ok(None) => Self::NotApplicable,
            Err(e) => Self::Malformed(e.to_string()),
        }
    }
}

/// A per-issuer heuristic that names documents.
pub trait Extractor: Send + Sync {
    /// Stable name used in logs and ambiguity reports.
    fn name(&self) -> &str;

    /// Inspect the document. Must not mutate anything but the document's
    /// own page caches.
    fn evaluate(&self, document: &Document) -> Outcome;
}

/// Extractor backed by a function over the whole document.
pub struct FnExtractor<F> {
    name: String,
    func: F,
}

impl<F> FnExtractor<F>
where
    F: Fn(&Document) -> ExtractorResult + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Extractor for FnExtractor<F>
where
    F: Fn(&Document) -> ExtractorResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, document: &Document) -> Outcome {
        (self.func)(document).into()
    }
}

/// Extractor for heuristics that only look at the first page's text boxes.
///
/// The function receives page 1 and a span named after the extractor to log
/// into. Documents with an empty first page are never passed to it.
pub struct LegacyExtractor<F> {
    name: String,
    func: F,
}

impl<F> LegacyExtractor<F>
where
    F: Fn(&TextBoxes, &Span) -> ExtractorResult + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Extractor for LegacyExtractor<F>
where
    F: Fn(&TextBoxes, &Span) -> ExtractorResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, document: &Document) -> Outcome {
        let first_page = match document.page(1) {
            Ok(page) => page,
            Err(e) => return Outcome::Malformed(e.to_string()),
        };
        if first_page.is_empty() {
            return Outcome::NotApplicable;
        }

        let span = tracing::debug_span!("extractor", name = %self.name);
        let _guard = span.enter();
        (self.func)(first_page, &span).into()
    }
}

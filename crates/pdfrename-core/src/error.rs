//! Error types for the pdfrename-core library.

use thiserror::Error;

/// Main error type for the pdfrename library.
#[derive(Error, Debug)]
pub enum RenameError {
    /// The input could not be opened or read as a PDF.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// More than one extractor claimed the document.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// The matched components do not make a valid filename.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to opening a PDF and accessing its pages.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The source is not a parseable PDF.
    #[error("invalid PDF file {origin}: {reason}")]
    InvalidSource { origin: String, reason: String },

    /// The PDF is encrypted with a non-empty password.
    #[error("{0} is encrypted")]
    Encrypted(String),

    /// Pages are 1-indexed; page 0 never exists.
    #[error("invalid page number {0}: document pages are 1-indexed")]
    InvalidPage(u32),

    /// A page beyond the end of the document was requested.
    #[error("{origin} does not have page {page} (page count {count})")]
    MissingPage {
        origin: String,
        page: u32,
        count: u32,
    },

    /// Failed to extract text from a page.
    #[error("failed to extract text: {0}")]
    Extraction(String),

    /// I/O error while reading the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from bounded-cardinality lookups over a page's text boxes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// An exact-value lookup found nothing.
    #[error("text box not found: {0:?}")]
    NotFound(String),

    /// A lookup that must match at most once matched several boxes.
    #[error("lookup matched {count} text boxes, expected at most one")]
    Ambiguous { count: usize },
}

/// Errors from decoding embedded metadata dates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The value does not follow the expected date grammar.
    #[error("malformed date {0:?}")]
    Malformed(String),
}

/// Errors raised from inside an extractor body.
///
/// Any of these make dispatch treat the extractor as not matching; they are
/// logged with the extractor name, never propagated to the caller.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Page access failed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A text box lookup failed or was ambiguous.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A metadata date did not decode.
    #[error(transparent)]
    Date(#[from] DateError),

    /// A date in the page text did not parse.
    #[error("date parse error: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// The document does not match an assumption about the template.
    #[error("assumption failed: {0}")]
    Assumption(String),
}

impl ExtractorError {
    /// Build an assumption failure.
    pub fn assumption(message: impl Into<String>) -> Self {
        Self::Assumption(message.into())
    }
}

/// Errors related to rendering name components into a filename.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The rendered filename is not acceptable on the target filesystem.
    #[error("invalid filename {filename:?}: {reason}")]
    InvalidFilename { filename: String, reason: String },
}

/// Errors related to dispatching a document to the extractors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Two or more extractors matched the same document.
    #[error("unable to rename {origin}: multiple renamers matched ({})", extractors.join(", "))]
    Ambiguous {
        origin: String,
        extractors: Vec<String>,
    },
}

/// Fail an extractor with an assumption error unless `cond` holds.
#[macro_export]
macro_rules! bail_unless {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::ExtractorError::Assumption(format!($($arg)+)));
        }
    };
}

/// Result type for the pdfrename library.
pub type Result<T> = std::result::Result<T, RenameError>;

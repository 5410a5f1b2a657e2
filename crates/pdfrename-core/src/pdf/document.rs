//! Lazily extracted PDF document.

use std::cell::Cell;
use std::fmt;
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use lopdf::content::Content;
use lopdf::{Dictionary, Object, ObjectId};
use once_cell::unsync::OnceCell;
use pdf_extract::PlainTextOutput;
use tracing::{debug, warn};

use super::content::{collect_layout, FontMap, PageFont};
use super::metadata::DocumentInfo;
use super::text_boxes::TextBoxes;
use super::Result;
use crate::dates::{itext, parse_pdf_date};
use crate::error::DocumentError;
use crate::models::config::PdfConfig;

/// Origin label for documents that were not read from a path.
pub const MEMORY_ORIGIN: &str = "<memory>";

/// A PDF whose pages are turned into text boxes on first access.
///
/// Page containers are cached: asking for the same page twice returns the
/// same `&TextBoxes` without re-reading the content stream. The document is
/// not `Sync`; it is meant to be processed start to finish on one thread.
pub struct Document {
    origin: String,
    pdf: lopdf::Document,
    raw_data: Vec<u8>,
    page_ids: Vec<ObjectId>,
    pages: Vec<OnceCell<TextBoxes>>,
    figure_source: OnceCell<pdf_extract::Document>,
    info: OnceCell<DocumentInfo>,
    creation_date: OnceCell<Option<DateTime<FixedOffset>>>,
    extracted: Cell<usize>,
}

impl Document {
    /// Open a PDF file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &PdfConfig::default())
    }

    pub fn open_with(path: impl AsRef<Path>, config: &PdfConfig) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Self::load(data, path.display().to_string(), config)
    }

    /// Read a PDF from any byte stream.
    pub fn from_reader<R: Read>(mut reader: R, origin: impl Into<String>) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load(data, origin.into(), &PdfConfig::default())
    }

    /// Parse a PDF held in memory.
    pub fn from_bytes(data: impl Into<Vec<u8>>, origin: impl Into<String>) -> Result<Self> {
        Self::load(data.into(), origin.into(), &PdfConfig::default())
    }

    /// Parse the PDF structure. No page text is extracted here.
    pub fn load(data: Vec<u8>, origin: String, config: &PdfConfig) -> Result<Self> {
        let mut pdf = lopdf::Document::load_mem(&data).map_err(|e| DocumentError::InvalidSource {
            origin: origin.clone(),
            reason: e.to_string(),
        })?;

        let raw_data = if pdf.is_encrypted() {
            if !config.try_empty_password || pdf.decrypt("").is_err() {
                return Err(DocumentError::Encrypted(origin));
            }
            debug!("{}: decrypted PDF with empty password", origin);

            // pdf-extract needs the decrypted bytes for figure pages.
            let mut decrypted = Vec::new();
            pdf.save_to(&mut decrypted).map_err(|e| DocumentError::InvalidSource {
                origin: origin.clone(),
                reason: format!("failed to save decrypted PDF: {e}"),
            })?;
            decrypted
        } else {
            data
        };

        let page_ids: Vec<ObjectId> = pdf.get_pages().into_values().collect();
        debug!("{}: loaded PDF with {} pages", origin, page_ids.len());

        Ok(Self {
            origin,
            pages: page_ids.iter().map(|_| OnceCell::new()).collect(),
            page_ids,
            pdf,
            raw_data,
            figure_source: OnceCell::new(),
            info: OnceCell::new(),
            creation_date: OnceCell::new(),
            extracted: Cell::new(0),
        })
    }

    /// Where the document came from: its path, or [`MEMORY_ORIGIN`].
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn page_count(&self) -> u32 {
        self.page_ids.len() as u32
    }

    /// How many pages have had their text extracted so far.
    pub fn extracted_page_count(&self) -> usize {
        self.extracted.get()
    }

    /// Text boxes of page `page` (1-based), extracting it on first access.
    pub fn page(&self, page: u32) -> Result<&TextBoxes> {
        if page == 0 {
            return Err(DocumentError::InvalidPage(page));
        }
        let cell = self
            .pages
            .get(page as usize - 1)
            .ok_or_else(|| DocumentError::MissingPage {
                origin: self.origin.clone(),
                page,
                count: self.page_count(),
            })?;

        cell.get_or_try_init(|| {
            debug!("{}: page {} not extracted yet, extracting now", self.origin, page);
            let boxes = self.extract_page(page)?;
            self.extracted.set(self.extracted.get() + 1);
            Ok(boxes)
        })
    }

    fn extract_page(&self, page: u32) -> Result<TextBoxes> {
        let page_id = self.page_ids[page as usize - 1];

        let content = self
            .pdf
            .get_page_content(page_id)
            .map_err(|e| DocumentError::Extraction(format!("page {page}: {e}")))?;
        let content = Content::decode(&content)
            .map_err(|e| DocumentError::Extraction(format!("page {page}: {e}")))?;

        let layout = collect_layout(&content.operations, &self.page_fonts(page_id));

        let boxes = if layout.is_figure() {
            debug!("{} p{}: figure-based PDF, extracting raw text instead", self.origin, page);
            vec![self.raw_page_text(page)?]
        } else {
            layout.boxes
        };

        if boxes.is_empty() {
            debug!("{} p{}: no text boxes found", self.origin, page);
        } else {
            debug!("{} p{}: {:?}", self.origin, page, boxes);
        }

        Ok(TextBoxes::new(boxes))
    }

    /// Whole-page text from pdf-extract, for pages drawn as a single figure.
    ///
    /// Only page `page` is run through pdf-extract, so a page it cannot
    /// handle elsewhere in the document does not affect this one.
    fn raw_page_text(&self, page: u32) -> Result<String> {
        let source = self.figure_source.get_or_try_init(|| {
            guard_extract(|| pdf_extract::Document::load_mem(&self.raw_data))
                .map_err(|reason| DocumentError::Extraction(format!("pdf-extract load: {reason}")))
        })?;

        let mut text = String::new();
        guard_extract(|| {
            let mut output = PlainTextOutput::new(&mut text);
            pdf_extract::output_doc_page(source, &mut output, page)
        })
        .map_err(|reason| DocumentError::Extraction(format!("page {page}: {reason}")))?;
        Ok(text)
    }

    fn page_fonts(&self, page_id: ObjectId) -> FontMap {
        let mut fonts = FontMap::new();
        let Some(resources) = self.page_resources(page_id) else {
            return fonts;
        };
        let Ok(font_dict) = resources.get(b"Font") else {
            return fonts;
        };
        if let Ok((_, Object::Dictionary(font_dict))) = self.pdf.dereference(font_dict) {
            for (name, font_ref) in font_dict.iter() {
                if let Ok((_, Object::Dictionary(font))) = self.pdf.dereference(font_ref) {
                    fonts.insert(name.clone(), PageFont::read(&self.pdf, font));
                }
            }
        }
        fonts
    }

    /// Resources dictionary for a page, following inheritance up the tree.
    fn page_resources(&self, node_id: ObjectId) -> Option<&Dictionary> {
        let Ok(Object::Dictionary(dict)) = self.pdf.get_object(node_id) else {
            return None;
        };

        if let Ok(resources) = dict.get(b"Resources") {
            if let Ok((_, Object::Dictionary(res_dict))) = self.pdf.dereference(resources) {
                return Some(res_dict);
            }
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => self.page_resources(*parent_id),
            _ => None,
        }
    }

    fn info(&self) -> &DocumentInfo {
        self.info.get_or_init(|| DocumentInfo::read(&self.pdf))
    }

    pub fn author(&self) -> Option<&[u8]> {
        self.info().author.as_deref()
    }

    pub fn creator(&self) -> Option<&[u8]> {
        self.info().creator.as_deref()
    }

    pub fn producer(&self) -> Option<&[u8]> {
        self.info().producer.as_deref()
    }

    pub fn subject(&self) -> Option<&[u8]> {
        self.info().subject.as_deref()
    }

    pub fn title(&self) -> Option<&[u8]> {
        self.info().title.as_deref()
    }

    /// Raw `CreationDate` value.
    pub fn creation_date_raw(&self) -> Option<&[u8]> {
        self.info().creation_date.as_deref()
    }

    /// Decoded `CreationDate`, absent when missing or malformed.
    pub fn creation_date(&self) -> Option<DateTime<FixedOffset>> {
        *self.creation_date.get_or_init(|| {
            let raw = self.creation_date_raw()?;
            if let Some(date) = parse_pdf_date(raw) {
                return Some(date);
            }
            if !itext::did_itext_generate(self) {
                return None;
            }
            match itext::parse_itext_date(raw) {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!("{}: {}", self.origin, e);
                    None
                }
            }
        })
    }
}

/// Run a pdf-extract call, turning its panics into errors.
fn guard_extract<T, E: fmt::Display>(
    f: impl FnOnce() -> std::result::Result<T, E>,
) -> std::result::Result<T, String> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("pdf-extract panicked".to_string()),
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("origin", &self.origin)
            .field("page_count", &self.page_count())
            .field("extracted_pages", &self.extracted.get())
            .finish_non_exhaustive()
    }
}

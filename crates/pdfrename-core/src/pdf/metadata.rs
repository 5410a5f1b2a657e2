//! Document information dictionary.

use lopdf::{Dictionary, Document, Object};
use tracing::debug;

use super::encoding::decode_text_string;

const AUTHOR: &[u8] = b"Author";
const CREATOR: &[u8] = b"Creator";
const PRODUCER: &[u8] = b"Producer";
const SUBJECT: &[u8] = b"Subject";
const TITLE: &[u8] = b"Title";
const CREATION_DATE: &[u8] = b"CreationDate";

/// Raw Info dictionary values, kept as the bytes stored in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub author: Option<Vec<u8>>,
    pub creator: Option<Vec<u8>>,
    pub producer: Option<Vec<u8>>,
    pub subject: Option<Vec<u8>>,
    pub title: Option<Vec<u8>>,
    pub creation_date: Option<Vec<u8>>,
}

impl DocumentInfo {
    /// Read the Info dictionary referenced from the trailer.
    pub fn read(doc: &Document) -> Self {
        let Some(info) = info_dictionary(doc) else {
            debug!("no Info dictionary in trailer");
            return Self::default();
        };

        let field = |key: &[u8]| -> Option<Vec<u8>> {
            let object = info.get(key).ok()?;
            match doc.dereference(object).ok()?.1 {
                Object::String(bytes, _) => Some(bytes.clone()),
                Object::Name(name) => Some(name.clone()),
                _ => None,
            }
        };

        let metadata = Self {
            author: field(AUTHOR),
            creator: field(CREATOR),
            producer: field(PRODUCER),
            subject: field(SUBJECT),
            title: field(TITLE),
            creation_date: field(CREATION_DATE),
        };
        debug!("extracted info {:?}", metadata.describe());
        metadata
    }

    /// Human-readable summary for logs.
    fn describe(&self) -> Vec<(&'static str, String)> {
        [
            ("Author", &self.author),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
            ("Subject", &self.subject),
            ("Title", &self.title),
            ("CreationDate", &self.creation_date),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, decode_text_string(v))))
        .collect()
    }
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    match doc.dereference(info).ok()?.1 {
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

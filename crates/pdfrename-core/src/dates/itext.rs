//! Metadata conventions of PDFs generated with iText.
//!
//! A lot of statements and invoices are produced with iText, so its producer
//! signature is a good hint of how the rest of the metadata is laid out.

use chrono::{DateTime, FixedOffset};
use lazy_static::lazy_static;
use regex::bytes::Regex;

use super::NORMALIZED_FORMAT;
use crate::error::DateError;
use crate::pdf::Document;

const ITEXT_PREFIX: &[u8] = b"iText ";
/// iText 5 writes its name with a WinAnsi registered trademark sign.
const ITEXT5_PREFIX: &[u8] = b"iText\xae 5";

lazy_static! {
    static ref ITEXT_DATE: Regex = Regex::new(
        r"^D:(\d{14})(?:Z(?:00'?00'?)?|([+-])(\d{2})(?:['’:]?(\d{2})'?)?)$"
    ).unwrap();
}

/// Whether the producer string identifies iText.
pub fn did_itext_generate(document: &Document) -> bool {
    document
        .producer()
        .is_some_and(|producer| {
            producer.starts_with(ITEXT_PREFIX) || producer.starts_with(ITEXT5_PREFIX)
        })
}

/// Decode a date property the way iText writes it.
///
/// Accepts `Z`, `Z00'00'` and offsets as `+HH'mm'`, `+HH'mm`, `+HHmm`,
/// `+HH:mm` or `+HH`. Anything else is an error rather than `None`: the
/// caller has already established that the document came from iText.
pub fn parse_itext_date(value: &[u8]) -> Result<DateTime<FixedOffset>, DateError> {
    let malformed = || DateError::Malformed(String::from_utf8_lossy(value).into_owned());

    let caps = ITEXT_DATE.captures(value).ok_or_else(malformed)?;
    let timestamp = std::str::from_utf8(&caps[1]).map_err(|_| malformed())?;

    let offset = match caps.get(2) {
        Some(sign) => {
            let hours = caps.get(3).map_or(&b"00"[..], |m| m.as_bytes());
            let minutes = caps.get(4).map_or(&b"00"[..], |m| m.as_bytes());
            let mut offset = Vec::with_capacity(5);
            offset.extend_from_slice(sign.as_bytes());
            offset.extend_from_slice(hours);
            offset.extend_from_slice(minutes);
            String::from_utf8(offset).map_err(|_| malformed())?
        }
        None => "+0000".to_string(),
    };

    DateTime::parse_from_str(&format!("{timestamp}{offset}"), NORMALIZED_FORMAT)
        .map_err(|_| malformed())
}

/// Creation date of an iText-generated document.
///
/// `Ok(None)` if the document is not from iText or has no `CreationDate`.
pub fn creation_date(document: &Document) -> Result<Option<DateTime<FixedOffset>>, DateError> {
    if !did_itext_generate(document) {
        return Ok(None);
    }
    document.creation_date_raw().map(parse_itext_date).transpose()
}

//! Decoding of dates embedded in PDF metadata.
//!
//! The Info dictionary stores dates as `D:YYYYMMDDHHmmSS` followed by either
//! `Z` or an offset written `+HH'mm'`. Generators disagree on the offset
//! punctuation, so the strict grammar lives here and the more forgiving
//! iText variant lives in [`itext`], gated behind a producer check.

pub mod itext;

use chrono::{DateTime, FixedOffset};
use lazy_static::lazy_static;
use regex::bytes::Regex;

lazy_static! {
    static ref PDF_DATE: Regex = Regex::new(
        r"^D:(\d{14})(?:Z|([+-])(\d{2})'(\d{2})')$"
    ).unwrap();
}

/// Format after normalising the suffix: timestamp plus `±HHMM`.
pub(crate) const NORMALIZED_FORMAT: &str = "%Y%m%d%H%M%S%z";

/// Decode a PDF date property.
///
/// Returns `None` for anything that does not follow the grammar exactly,
/// including out-of-range fields.
pub fn parse_pdf_date(value: &[u8]) -> Option<DateTime<FixedOffset>> {
    let caps = PDF_DATE.captures(value)?;
    let timestamp = std::str::from_utf8(&caps[1]).ok()?;

    let offset = match (caps.get(2), caps.get(3), caps.get(4)) {
        (Some(sign), Some(hours), Some(minutes)) => format!(
            "{}{}{}",
            std::str::from_utf8(sign.as_bytes()).ok()?,
            std::str::from_utf8(hours.as_bytes()).ok()?,
            std::str::from_utf8(minutes.as_bytes()).ok()?,
        ),
        _ => "+0000".to_string(),
    };

    DateTime::parse_from_str(&format!("{timestamp}{offset}"), NORMALIZED_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_with_offset() {
        let date = parse_pdf_date(b"D:20230415120000+01'00'").unwrap();

        let expected = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2023, 4, 15, 12, 0, 0)
            .unwrap();
        assert_eq!(date, expected);
        assert_eq!(date.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn test_parse_utc() {
        let date = parse_pdf_date(b"D:20230415120000Z").unwrap();

        assert_eq!(date.offset().local_minus_utc(), 0);
        assert_eq!(date, Utc.with_ymd_and_hms(2023, 4, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_negative_offset() {
        let date = parse_pdf_date(b"D:20231231235959-05'30'").unwrap();
        assert_eq!(date.offset().local_minus_utc(), -(5 * 3600 + 30 * 60));
    }

    #[test]
    fn test_mismatches_are_absent() {
        assert_eq!(parse_pdf_date(b"garbage"), None);
        assert_eq!(parse_pdf_date(b""), None);
        assert_eq!(parse_pdf_date(b"D:20230415120000"), None);
        assert_eq!(parse_pdf_date(b"D:20230415120000+0100"), None);
        assert_eq!(parse_pdf_date(b"D:20230415120000+01'00"), None);
        assert_eq!(parse_pdf_date(b"20230415120000Z"), None);
        assert_eq!(parse_pdf_date(b"D:20231345120000Z"), None);
    }
}

//! Scaleway invoices.
//!
//! The billing system writes the invoice number into the Subject metadata,
//! sometimes as UTF-16. The page layout changed over time; both the current
//! labelled boxes and the older inline "Issued: ... at ..." line are handled.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::error::ExtractorError;
use crate::models::doctypes::INVOICE;
use crate::models::NameComponents;
use crate::pdf::{decode_text_string, Document};
use crate::renamer::ExtractorResult;

const SERVICE: &str = "Scaleway";
const CREATOR: &str = "Scaleway billing system";
const SUBJECT_PREFIX: &str = "\n            Invoice\n";
const DATE_FORMAT: &str = "%B %d, %Y";

lazy_static! {
    static ref INLINE_ISSUED: Regex =
        Regex::new(r"Issued: ([A-Z][a-z]+ [0-9]{1,2}, [0-9]{4}) at [0-9]").unwrap();
}

pub fn invoice(document: &Document) -> ExtractorResult {
    if document.creator().map(decode_text_string).as_deref() != Some(CREATOR) {
        return Ok(None);
    }

    let subject = document
        .subject()
        .map(decode_text_string)
        .ok_or_else(|| ExtractorError::assumption("Scaleway invoice without Subject"))?;
    if !subject.starts_with(SUBJECT_PREFIX) {
        return Ok(None);
    }

    let invoice_number = subject
        .split('\n')
        .nth(2)
        .map(|line| line.trim().trim_start_matches('#'))
        .filter(|number| !number.is_empty())
        .ok_or_else(|| ExtractorError::assumption("no invoice number in Subject"))?
        .to_string();

    let first_page = document.page(1)?;

    let account_holder = match first_page.find_one_starting_with("Customer \n").into_result()? {
        Some(customer) => customer.split('\n').nth(1).unwrap_or_default().trim().to_string(),
        None => {
            // Older templates put the label and the name in separate boxes.
            let label = first_page.index_of("Customer\n")?;
            first_page
                .get(label + 1)
                .ok_or_else(|| ExtractorError::assumption("nothing after Customer label"))?
                .trim()
                .to_string()
        }
    };

    let date_str = match first_page.find_one_starting_with("Issued: \n").into_result()? {
        Some(issued) => issued.split('\n').nth(1).unwrap_or_default().trim().to_string(),
        None => first_page
            .iter()
            .find_map(|b| INLINE_ISSUED.captures(b).map(|caps| caps[1].to_string()))
            .ok_or_else(|| {
                debug!("{}: unable to find the invoice issue date", document.origin());
                ExtractorError::assumption("no issue date")
            })?,
    };
    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)?;

    Ok(Some(
        NameComponents::new(date, SERVICE, [account_holder], INVOICE)
            .with_document_number(invoice_number),
    ))
}

//! Hetzner Online invoices.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::doctypes::INVOICE;
use crate::models::NameComponents;
use crate::pdf::Document;
use crate::renamer::utils::extract_account_holder_from_address;
use crate::renamer::ExtractorResult;

const SERVICE: &str = "Hetzner";
const INVOICE_PREFIX: &str = "Invoice ";
const DATE_PREFIX: &str = "Invoice date: ";

lazy_static! {
    // The company went from AG to GmbH around 2015; both letterheads exist.
    static ref LETTERHEAD: Regex = Regex::new(r"^Hetzner Online (?:GmbH|AG) • ").unwrap();
}

/// Letterhead, then the customer address, then `Invoice <number>`.
pub fn invoice(document: &Document) -> ExtractorResult {
    let first_page = document.page(1)?;

    if first_page.len() < 3 || !LETTERHEAD.is_match(&first_page[0]) {
        return Ok(None);
    }

    let Some(invoice_number) = first_page[2].strip_prefix(INVOICE_PREFIX) else {
        return Ok(None);
    };
    let invoice_number = invoice_number.trim_end();

    let Some(date_box) = first_page.find_one_starting_with(DATE_PREFIX).into_result()? else {
        return Ok(None);
    };
    let date = NaiveDate::parse_from_str(date_box[DATE_PREFIX.len()..].trim(), "%d/%m/%Y")?;

    let account_holder = extract_account_holder_from_address(&first_page[1]);

    Ok(Some(
        NameComponents::new(date, SERVICE, [account_holder], INVOICE)
            .with_document_number(invoice_number),
    ))
}

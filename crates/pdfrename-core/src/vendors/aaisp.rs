//! Andrews & Arnold invoices.
//!
//! Text on these invoices uses non-breaking spaces throughout; they are
//! turned into plain spaces before anything is extracted.

use chrono::NaiveDateTime;

use crate::bail_unless;
use crate::error::ExtractorError;
use crate::models::doctypes::INVOICE;
use crate::models::NameComponents;
use crate::pdf::Document;
use crate::renamer::utils::{build_dict_from_fake_table, extract_account_holder_from_address};
use crate::renamer::ExtractorResult;

const SERVICE: &str = "Andrews & Arnold";
const COMPANY_IDENTIFIER: &str = "Andrews & Arnold Ltd\n";
const TITLE: &str = "Sales\u{a0}Invoice\n";
const DETAILS_PREFIX: &str = "Invoice\u{a0}Nº:";

fn plain_spaces(text: &str) -> String {
    text.replace('\u{a0}', " ")
}

pub fn invoice(document: &Document) -> ExtractorResult {
    let first_page = document.page(1)?;
    if first_page.get(0) != Some(TITLE) || !first_page.contains(COMPANY_IDENTIFIER) {
        return Ok(None);
    }

    // The customer address sits right before the company name.
    let company_idx = first_page.index_of(COMPANY_IDENTIFIER)?;
    bail_unless!(company_idx > 1, "no customer address before company name");
    let account_holder =
        extract_account_holder_from_address(&plain_spaces(&first_page[company_idx - 1]));

    let details_idx = first_page
        .find_one_index_starting_with(DETAILS_PREFIX)
        .expect_found("invoice details")?;
    let fields = plain_spaces(&first_page[details_idx]);
    let values = plain_spaces(
        first_page
            .get(details_idx + 1)
            .ok_or_else(|| ExtractorError::assumption("invoice details without values"))?,
    );
    let details = build_dict_from_fake_table(&fields, &values);

    let field = |name: &str| {
        details
            .get(name)
            .map(|value| value.trim())
            .ok_or_else(|| ExtractorError::assumption(format!("no {name:?} in invoice details")))
    };

    let date_str = field("Issued:").or_else(|_| field("Date (tax point):"))?;
    let date = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S")?.date();

    Ok(Some(
        NameComponents::new(date, SERVICE, [account_holder], INVOICE)
            .with_account_number(field("Account Nº:")?)
            .with_document_number(field("Invoice Nº:")?),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::PdfBuilder;
    use pretty_assertions::assert_eq;

    fn aaisp_pdf(date_label: &str) -> Document {
        let labels = ["Invoice\u{a0}Nº:", "Account\u{a0}Nº:", date_label];
        let data = PdfBuilder::new()
            .text_page(&[
                &["Sales\u{a0}Invoice"],
                &["MR\u{a0}JOHN\u{a0}SMITH", "1\u{a0}High\u{a0}Street"],
                &["Andrews & Arnold Ltd"],
                &labels,
                &[" INV-001234", " A1234A", " 2023-04-15 09:30:00"],
            ])
            .build();
        Document::from_bytes(data, "aaisp.pdf").unwrap()
    }

    #[test]
    fn test_invoice() {
        let doc = aaisp_pdf("Issued:");
        let name = invoice(&doc).unwrap().unwrap();
        assert_eq!(
            name.render_filename(true, true).unwrap(),
            "2023-04-15 - Andrews & Arnold - John Smith - Invoice - A1234A - INV-001234.pdf"
        );
    }

    #[test]
    fn test_tax_point_date() {
        let doc = aaisp_pdf("Date\u{a0}(tax\u{a0}point):");
        let name = invoice(&doc).unwrap().unwrap();
        assert_eq!(name.date, chrono::NaiveDate::from_ymd_opt(2023, 4, 15).unwrap());
    }

    #[test]
    fn test_missing_details_is_an_error() {
        let data = PdfBuilder::new()
            .text_page(&[&["Sales\u{a0}Invoice"], &["JOHN SMITH"], &["Andrews & Arnold Ltd"]])
            .build();
        let doc = Document::from_bytes(data, "aaisp.pdf").unwrap();
        assert!(invoice(&doc).is_err());
    }
}

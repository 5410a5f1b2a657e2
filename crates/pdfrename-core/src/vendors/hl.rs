//! Hargreaves Lansdown tax certificates.
//!
//! The certificate text carries no usable date, so the document's creation
//! date is used instead.

use crate::models::doctypes::TAX_CERTIFICATE;
use crate::models::NameComponents;
use crate::pdf::Document;
use crate::renamer::utils::extract_account_holder_from_address;
use crate::renamer::ExtractorResult;

const SERVICE: &str = "Hargreaves Lansdown";

pub fn tax_certificate(document: &Document) -> ExtractorResult {
    let first_page = document.page(1)?;

    if first_page
        .find_one_starting_with("Hargreaves Lansdown Asset Management Limited ")
        .into_result()?
        .is_none()
    {
        return Ok(None);
    }

    if !first_page.contains("Your tax certificate\n") {
        return Ok(None);
    }

    let Some(date) = document.creation_date() else {
        return Ok(None);
    };

    let account_holder = extract_account_holder_from_address(&first_page[0]);

    Ok(Some(NameComponents::new(
        date.date_naive(),
        SERVICE,
        [account_holder],
        TAX_CERTIFICATE,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::PdfBuilder;
    use pretty_assertions::assert_eq;

    fn certificate(creation_date: Option<&[u8]>) -> Document {
        let mut builder = PdfBuilder::new().text_page(&[
            &["MR JOHN SMITH", "1 High Street", "Bristol"],
            &["Your tax certificate"],
            &["Hargreaves Lansdown Asset Management Limited One College Square South"],
        ]);
        if let Some(date) = creation_date {
            builder = builder.info("CreationDate", date);
        }
        Document::from_bytes(builder.build(), "hl.pdf").unwrap()
    }

    #[test]
    fn test_tax_certificate() {
        let doc = certificate(Some(b"D:20230405101500Z"));
        let name = tax_certificate(&doc).unwrap().unwrap();

        assert_eq!(
            name.render_filename(true, true).unwrap(),
            "2023-04-05 - Hargreaves Lansdown - John Smith - Tax Certificate.pdf"
        );
    }

    #[test]
    fn test_missing_creation_date_is_not_applicable() {
        let doc = certificate(None);
        assert_eq!(tax_certificate(&doc).unwrap(), None);
    }
}

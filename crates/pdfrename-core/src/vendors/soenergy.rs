//! So Energy statements and annual summaries.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, Span};

use crate::bail_unless;
use crate::error::ExtractorError;
use crate::models::doctypes::STATEMENT;
use crate::models::NameComponents;
use crate::pdf::TextBoxes;
use crate::renamer::utils::extract_account_holder_from_address;
use crate::renamer::ExtractorResult;

const SERVICE: &str = "So Energy";
const ANNUAL_SUMMARY: &str = "Annual Summary";
const DATE_FORMAT: &str = "%d %b %Y";
const ANNUAL_DATE_FORMAT: &str = "%d %B %Y";

lazy_static! {
    static ref STATEMENT_PERIOD: Regex = Regex::new(
        r"^For the period of [0-9]{1,2} [A-Z][a-z]{2} [0-9]{4} - ([0-9]{1,2} [A-Z][a-z]{2} [0-9]{4})\n$"
    ).unwrap();
    static ref ANNUAL_PERIOD: Regex = Regex::new(
        r"^Your annual electricity\nsummary\nFor the period [0-9]{1,2} [A-Z][a-z]+ [0-9]{4} - ([0-9]{1,2} [A-Z][a-z]+ [0-9]{4})\n"
    ).unwrap();
}

/// Only needs the first page's boxes, so it is registered as a legacy extractor.
pub fn statement(text_boxes: &TextBoxes, span: &Span) -> ExtractorResult {
    if text_boxes.contains("www.so.energy\n") {
        bail_unless!(
            text_boxes.get(1) == Some("Hello, here is your statement.\n"),
            "So Energy statement without greeting"
        );

        let period_line = text_boxes
            .get(2)
            .ok_or_else(|| ExtractorError::assumption("no statement period"))?;
        debug!(parent: span, "found statement period: {:?}", period_line);

        let period = STATEMENT_PERIOD
            .captures(period_line)
            .ok_or_else(|| ExtractorError::assumption("unrecognised statement period"))?;
        let date = NaiveDate::parse_from_str(&period[1], DATE_FORMAT)?;

        let account_holder = extract_account_holder_from_address(&text_boxes[0]);
        return Ok(Some(NameComponents::new(date, SERVICE, [account_holder], STATEMENT)));
    }

    let Some(period_line) = text_boxes
        .find_one_starting_with("Your annual electricity\nsummary\n")
        .into_result()?
    else {
        return Ok(None);
    };
    debug!(parent: span, "found annual electricity summary period line {:?}", period_line);

    let period = ANNUAL_PERIOD
        .captures(period_line)
        .ok_or_else(|| ExtractorError::assumption("unrecognised annual summary period"))?;
    let date = NaiveDate::parse_from_str(&period[1], ANNUAL_DATE_FORMAT)?;

    let account_holder = extract_account_holder_from_address(&text_boxes[0]);
    Ok(Some(NameComponents::new(date, SERVICE, [account_holder], ANNUAL_SUMMARY)))
}

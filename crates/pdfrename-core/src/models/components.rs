//! The canonical name of a document, and how it becomes a filename.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::renamer::utils::normalize_account_holder_name;

const SEPARATOR: &str = " - ";
const HOLDER_SEPARATOR: &str = " & ";
const EXTENSION: &str = ".pdf";
const MAX_FILENAME_BYTES: usize = 255;

const RESERVED_STEMS: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// What an extractor found out about a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameComponents {
    /// Issue date of the document.
    pub date: NaiveDate,

    /// Issuer of the document.
    pub service_name: String,

    /// Names the document is addressed to, in document order.
    pub account_holders: Vec<String>,

    /// Kind of document, usually one of [`crate::models::doctypes`].
    pub document_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,

    /// Free-form qualifiers appended after everything else.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_components: Vec<String>,
}

impl NameComponents {
    pub fn new<H>(
        date: NaiveDate,
        service_name: impl Into<String>,
        account_holders: H,
        document_type: impl Into<String>,
    ) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
    {
        Self {
            date,
            service_name: service_name.into(),
            account_holders: account_holders.into_iter().map(Into::into).collect(),
            document_type: document_type.into(),
            account_number: None,
            document_number: None,
            additional_components: Vec::new(),
        }
    }

    pub fn with_account_number(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = Some(account_number.into());
        self
    }

    pub fn with_document_number(mut self, document_number: impl Into<String>) -> Self {
        self.document_number = Some(document_number.into());
        self
    }

    /// Append a qualifier component.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.additional_components.push(component.into());
        self
    }

    /// Render the filename for these components.
    ///
    /// The result is `date - service - holders - type - account - number -
    /// extras.pdf`, leaving out optional parts that are empty. Fails if the
    /// name could not be used as a single path component.
    pub fn render_filename(
        &self,
        include_account_holder: bool,
        drop_honorific: bool,
    ) -> Result<String, RenderError> {
        let mut components = vec![
            self.date.format("%Y-%m-%d").to_string(),
            self.service_name.clone(),
        ];

        if include_account_holder {
            let holders: Vec<String> = self
                .account_holders
                .iter()
                .map(|name| normalize_account_holder_name(name, drop_honorific))
                .filter(|name| !name.is_empty())
                .collect();
            if !holders.is_empty() {
                components.push(holders.join(HOLDER_SEPARATOR));
            }
        }

        components.push(self.document_type.clone());

        components.extend(
            [&self.account_number, &self.document_number]
                .into_iter()
                .flatten()
                .chain(&self.additional_components)
                .filter(|component| !component.is_empty())
                .cloned(),
        );

        let filename = components.join(SEPARATOR) + EXTENSION;
        validate_filename(&filename)?;
        Ok(filename)
    }
}

fn validate_filename(filename: &str) -> Result<(), RenderError> {
    let invalid = |reason: String| RenderError::InvalidFilename {
        filename: filename.to_string(),
        reason,
    };

    if let Some(c) = filename
        .chars()
        .find(|c| matches!(c, '/' | '\\' | ':') || c.is_control())
    {
        return Err(invalid(format!("contains reserved character {c:?}")));
    }

    let stem = filename.split('.').next().unwrap_or_default().trim_end();
    if RESERVED_STEMS.iter().any(|reserved| stem.eq_ignore_ascii_case(reserved)) {
        return Err(invalid(format!("{stem} is a reserved device name")));
    }

    if filename.len() > MAX_FILENAME_BYTES {
        return Err(invalid(format!(
            "{} bytes long, at most {MAX_FILENAME_BYTES} allowed",
            filename.len()
        )));
    }

    Ok(())
}

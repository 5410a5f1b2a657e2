//! Configuration for renaming runs.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RenameError, Result};

/// Main configuration, usually loaded from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// Filename rendering options.
    pub render: RenderConfig,

    /// PDF loading options.
    pub pdf: PdfConfig,
}

/// How name components are turned into a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Include the account holder names in the filename.
    pub include_account_holder: bool,

    /// Strip a leading "Mr", "Mrs", "Ms" or "Miss" from holder names.
    pub drop_honorific: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            include_account_holder: true,
            drop_honorific: true,
        }
    }
}

/// PDF loading configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Try to open encrypted documents with the empty user password.
    pub try_empty_password: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            try_empty_password: true,
        }
    }
}

impl RenameConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RenameError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| RenameError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

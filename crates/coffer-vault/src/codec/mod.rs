//! Interchange formats for the record collection.
//!
//! Two formats are supported:
//!
//! - [`json`]: the structured-document format, a lossless array of records.
//! - [`csv`]: the tabular-text format with a fixed export column order and
//!   header-driven import mapping.
//!
//! Imports are all-or-nothing: any malformed row or item fails the whole
//! payload. Values that are merely missing or unparseable (timestamps,
//! record type, favorite flag) fall back to defaults instead.

pub mod csv;
pub mod json;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};
use crate::record::VaultRecord;

/// Base name used for export files.
pub const EXPORT_FILE_STEM: &str = "passwords";

/// A supported interchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Parse a format name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::UnknownFormat`] for anything but `json`/`csv`.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(VaultError::UnknownFormat {
                format: other.to_string(),
            }),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }

    /// Default export file name, e.g. `passwords.csv`.
    pub fn file_name(&self) -> String {
        format!("{EXPORT_FILE_STEM}.{}", self.as_str())
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Format {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Serialize `records` in `format`.
pub fn export(records: &[VaultRecord], format: Format) -> Result<String> {
    match format {
        Format::Json => json::export_json(records),
        Format::Csv => Ok(csv::export_csv(records)),
    }
}

/// Parse `content` in `format`. `now` stands in for missing timestamps.
///
/// # Errors
///
/// Returns [`VaultError::Parse`] for malformed content and
/// [`VaultError::NoRecords`] when the payload holds no records.
pub fn import(content: &str, format: Format, now: DateTime<Utc>) -> Result<Vec<VaultRecord>> {
    let records = match format {
        Format::Json => json::import_json(content, now)?,
        Format::Csv => csv::import_csv(content, now)?,
    };

    if records.is_empty() {
        return Err(VaultError::NoRecords);
    }

    tracing::debug!(format = %format, count = records.len(), "parsed import payload");
    Ok(records)
}

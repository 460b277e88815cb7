//! Vault error types.
//!
//! Every fallible operation in this crate returns [`VaultError`]. Looking up
//! a record that does not exist is *not* an error: store operations report
//! it through `Option`/`bool` results instead.

/// Unified error type for the Coffer record store and codecs.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    // -- Validation ---------------------------------------------------------
    /// A record name was empty or whitespace only.
    #[error("record name must not be empty")]
    EmptyName,

    // -- Import / export ----------------------------------------------------
    /// The payload could not be parsed; nothing was imported.
    #[error("{format} parse error: {reason}")]
    Parse {
        format: &'static str,
        reason: String,
    },

    /// The payload parsed but held no records.
    #[error("no valid records found")]
    NoRecords,

    /// The requested interchange format is not supported.
    #[error("unknown format: {format}")]
    UnknownFormat { format: String },

    /// A backup file did not match the expected envelope.
    #[error("invalid backup file format: {reason}")]
    InvalidBackup { reason: String },

    // -- Underlying errors --------------------------------------------------
    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl VaultError {
    pub(crate) fn json(reason: impl Into<String>) -> Self {
        Self::Parse {
            format: "json",
            reason: reason.into(),
        }
    }

    pub(crate) fn csv(reason: impl Into<String>) -> Self {
        Self::Parse {
            format: "csv",
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the vault crate.
pub type Result<T> = std::result::Result<T, VaultError>;

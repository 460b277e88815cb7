//! Backup snapshots.
//!
//! A backup is a JSON envelope around the full record collection:
//!
//! ```json
//! {
//!   "items": [ ... ],
//!   "metadata": { "timestamp": "2024-01-01T00:00:00.000Z", "version": "1.0", "itemCount": 3 }
//! }
//! ```
//!
//! Restoring reads `items` with the same per-item coercion as a JSON import.
//! `metadata` is informational; a missing block is accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::json;
use crate::error::{Result, VaultError};
use crate::record::{VaultRecord, iso8601, parse_timestamp};

/// Envelope version written by this crate.
pub const BACKUP_VERSION: &str = "1.0";

/// Envelope metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub item_count: usize,
}

/// Point-in-time copy of the record collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupSnapshot {
    items: Vec<VaultRecord>,
    metadata: BackupMetadata,
}

impl BackupSnapshot {
    /// Snapshot `records` as of `now`.
    pub fn capture(records: &[VaultRecord], now: DateTime<Utc>) -> Self {
        Self {
            items: records.to_vec(),
            metadata: BackupMetadata {
                timestamp: now,
                version: BACKUP_VERSION.to_string(),
                item_count: records.len(),
            },
        }
    }

    pub fn records(&self) -> &[VaultRecord] {
        &self.items
    }

    pub fn into_records(self) -> Vec<VaultRecord> {
        self.items
    }

    pub fn metadata(&self) -> &BackupMetadata {
        &self.metadata
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.metadata.timestamp
    }

    pub fn record_count(&self) -> usize {
        self.items.len()
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    /// Suggested file name, e.g. `backup-2024-01-01.json`.
    pub fn file_name(&self) -> String {
        format!("backup-{}.json", self.metadata.timestamp.format("%Y-%m-%d"))
    }

    /// Pretty-printed envelope.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a backup envelope. `now` stands in for missing timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidBackup`] if the document is not an object
    /// with an `items` array or carries an unsupported version, and
    /// [`VaultError::Parse`] if an item is malformed.
    pub fn from_json(content: &str, now: DateTime<Utc>) -> Result<Self> {
        let value: Value = serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;

        let Value::Object(mut root) = value else {
            return Err(invalid("expected an object"));
        };
        let Some(Value::Array(items)) = root.remove("items") else {
            return Err(invalid("missing `items` array"));
        };

        let items = json::records_from_values(items, now)?;
        let metadata = read_metadata(root.get("metadata"), items.len(), now)?;

        if metadata.item_count != items.len() {
            tracing::warn!(
                declared = metadata.item_count,
                actual = items.len(),
                "backup item count mismatch"
            );
        }

        Ok(Self { items, metadata })
    }
}

fn read_metadata(value: Option<&Value>, actual: usize, now: DateTime<Utc>) -> Result<BackupMetadata> {
    let Some(Value::Object(meta)) = value else {
        tracing::debug!("backup has no metadata block");
        return Ok(BackupMetadata {
            timestamp: now,
            version: BACKUP_VERSION.to_string(),
            item_count: actual,
        });
    };

    let version = meta
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or(BACKUP_VERSION)
        .to_string();
    if !version.starts_with("1.") {
        return Err(invalid(format!("unsupported version {version}")));
    }

    let timestamp = meta
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .unwrap_or(now);

    let item_count = meta
        .get("itemCount")
        .and_then(Value::as_u64)
        .map_or(actual, |n| n as usize);

    Ok(BackupMetadata {
        timestamp,
        version,
        item_count,
    })
}

fn invalid(reason: impl Into<String>) -> VaultError {
    VaultError::InvalidBackup {
        reason: reason.into(),
    }
}

/// Human-readable size in kilobytes with one decimal, e.g. `1.5 KB`.
pub fn size_label(bytes: usize) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

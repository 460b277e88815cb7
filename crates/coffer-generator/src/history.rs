//! Bounded log of generated values.
//!
//! The log keeps at most `capacity` entries (50 by default). New entries go
//! to the front; once full, the oldest entry is evicted. Reads are
//! most-recent-first.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of entries retained.
pub const HISTORY_CAPACITY: usize = 50;

/// Which generator produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationKind {
    Password,
    Passphrase,
    Username,
}

impl GenerationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Passphrase => "passphrase",
            Self::Username => "username",
        }
    }
}

impl std::fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub value: String,
    pub kind: GenerationKind,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(value: impl Into<String>, kind: GenerationKind) -> Self {
        Self {
            id: Uuid::now_v7(),
            value: value.into(),
            kind,
            timestamp: Utc::now(),
        }
    }
}

/// Fixed-capacity, insertion-ordered history.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty log holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild a log from persisted entries given most-recent-first.
    ///
    /// Entries beyond `capacity` are dropped from the old end.
    pub fn from_entries(entries: impl IntoIterator<Item = HistoryEntry>, capacity: usize) -> Self {
        let mut history = Self::with_capacity(capacity);
        history
            .entries
            .extend(entries.into_iter().take(history.capacity));
        history
    }

    /// Record a freshly generated value and return the stored entry.
    pub fn record(&mut self, value: impl Into<String>, kind: GenerationKind) -> &HistoryEntry {
        self.push(HistoryEntry::new(value, kind))
    }

    /// Insert an entry at the front, evicting the oldest when full.
    pub fn push(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        if self.entries.len() == self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                tracing::debug!(id = %evicted.id, kind = %evicted.kind, "evicted history entry");
            }
        }
        self.entries.push_front(entry);
        &self.entries[0]
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// The most recently recorded entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

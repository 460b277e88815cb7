//! In-memory vault record store.
//!
//! [`RecordStore`] is the single source of truth for the record collection.
//! It owns identity assignment and timestamps, and keeps one invariant at
//! all times: record ids are pairwise distinct. Batch operations (import,
//! restore) may bring in colliding ids; they finish with [`RecordStore::dedupe`],
//! which mints fresh ids for later duplicates instead of rejecting them.
//!
//! Operations on a missing id are never errors. They report through `bool`
//! or `Option` results so callers can treat a stale id as a no-op.
//!
//! Destructive batch operations ([`RecordStore::restore`],
//! [`RecordStore::delete_many`], [`RecordStore::clear`]) take a
//! [`Confirmation`]; a declined confirmation leaves the store untouched.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::backup::BackupSnapshot;
use crate::clock::{Clock, SystemClock};
use crate::codec::{self, Format};
use crate::error::Result;
use crate::filter::RecordFilter;
use crate::record::{NewRecord, RecordId, RecordPatch, VaultRecord};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Explicit answer to a destructive-operation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

/// Result of a confirmation-guarded operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The operation ran and touched `affected` records.
    Applied { affected: usize },
    /// Confirmation was withheld; nothing changed.
    Declined,
}

impl GuardOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// What an import added to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records appended.
    pub imported: usize,
    /// Records (imported or pre-existing) that received a fresh id.
    pub reassigned: usize,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Insertion-ordered collection of vault records.
#[derive(Debug, Clone)]
pub struct RecordStore<C = SystemClock> {
    records: Vec<VaultRecord>,
    clock: C,
}

impl Default for RecordStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore<SystemClock> {
    /// Create an empty store using wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Load records handed over by a persistence layer.
    pub fn from_records(records: Vec<VaultRecord>) -> Self {
        Self::with_records(records, SystemClock)
    }
}

impl<C: Clock> RecordStore<C> {
    /// Create an empty store with a custom clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            records: Vec::new(),
            clock,
        }
    }

    /// Create a store holding `records`, restoring id uniqueness.
    pub fn with_records(records: Vec<VaultRecord>, clock: C) -> Self {
        let mut store = Self { records, clock };
        store.dedupe();
        store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[VaultRecord] {
        &self.records
    }

    pub fn get(&self, id: &RecordId) -> Option<&VaultRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Records matching `filter`, in insertion order.
    pub fn filter(&self, filter: &RecordFilter) -> Vec<&VaultRecord> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    /// Hand the records back to the persistence layer.
    pub fn into_records(self) -> Vec<VaultRecord> {
        self.records
    }

    // -- Single-record mutations --------------------------------------------

    /// Add a record with a fresh id and both timestamps set to now.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::EmptyName`](crate::VaultError::EmptyName) if the
    /// name is blank.
    pub fn add(&mut self, fields: NewRecord) -> Result<VaultRecord> {
        let id = self.fresh_id();
        let record = VaultRecord::from_new(fields, id, self.clock.now())?;

        tracing::info!(id = %record.id, record_type = %record.record_type, "added record");
        self.records.push(record.clone());
        Ok(record)
    }

    /// Merge `patch` into the record with `id` and refresh `updatedAt`.
    ///
    /// Returns `Ok(None)` when no record has that id.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::EmptyName`](crate::VaultError::EmptyName) if the
    /// patch would blank the name; the record is left unchanged.
    pub fn edit(&mut self, id: &RecordId, patch: RecordPatch) -> Result<Option<VaultRecord>> {
        let now = self.clock.now();
        let Some(record) = self.records.iter_mut().find(|r| &r.id == id) else {
            tracing::debug!(id = %id, "edit: record not found");
            return Ok(None);
        };

        patch.apply(record)?;
        bump_updated_at(record, now);

        tracing::info!(id = %id, "edited record");
        Ok(Some(record.clone()))
    }

    /// Remove the record with `id`. Returns `false` if it was already absent.
    pub fn delete(&mut self, id: &RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| &r.id != id);
        let removed = self.records.len() != before;

        if removed {
            tracing::info!(id = %id, "deleted record");
        } else {
            tracing::debug!(id = %id, "delete: record not found");
        }
        removed
    }

    /// Flip the favorite flag and refresh `updatedAt`.
    ///
    /// Returns the new flag value, or `None` if no record has that id.
    pub fn toggle_favorite(&mut self, id: &RecordId) -> Option<bool> {
        let now = self.clock.now();
        let record = self.records.iter_mut().find(|r| &r.id == id)?;

        record.favorite = !record.favorite;
        bump_updated_at(record, now);

        tracing::info!(id = %id, favorite = record.favorite, "toggled favorite");
        Some(record.favorite)
    }

    // -- Identity -----------------------------------------------------------

    /// Give every record whose id repeats an earlier one a fresh id.
    ///
    /// The first occurrence keeps its id; no other field is touched.
    /// Returns the number of ids reassigned.
    pub fn dedupe(&mut self) -> usize {
        let mut seen: HashSet<RecordId> = HashSet::with_capacity(self.records.len());
        let mut collisions = Vec::new();

        for (index, record) in self.records.iter().enumerate() {
            if !seen.insert(record.id.clone()) {
                collisions.push(index);
            }
        }

        for &index in &collisions {
            let fresh = loop {
                let candidate = RecordId::generate();
                if seen.insert(candidate.clone()) {
                    break candidate;
                }
            };
            let record = &mut self.records[index];
            tracing::debug!(old = %record.id, new = %fresh, "reassigned duplicate id");
            record.id = fresh;
        }

        if !collisions.is_empty() {
            tracing::info!(count = collisions.len(), "deduplicated record ids");
        }
        collisions.len()
    }

    fn fresh_id(&self) -> RecordId {
        loop {
            let id = RecordId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    // -- Batch operations ---------------------------------------------------

    /// Append imported records as new entries, then dedupe.
    ///
    /// Existing records are never overwritten or merged.
    pub fn import(&mut self, records: Vec<VaultRecord>) -> ImportSummary {
        let imported = records.len();
        self.records.extend(records);
        let reassigned = self.dedupe();

        tracing::info!(imported, reassigned, total = self.records.len(), "imported records");
        ImportSummary {
            imported,
            reassigned,
        }
    }

    /// Parse `content` in `format` and import the result.
    ///
    /// Parsing is all-or-nothing: on error the store is unchanged.
    pub fn import_from(&mut self, content: &str, format: Format) -> Result<ImportSummary> {
        let records = codec::import(content, format, self.clock.now())?;
        Ok(self.import(records))
    }

    /// Serialize every record in `format`.
    pub fn export(&self, format: Format) -> Result<String> {
        let content = codec::export(&self.records, format)?;
        tracing::info!(format = %format, count = self.records.len(), "exported records");
        Ok(content)
    }

    /// Capture a backup snapshot of the whole collection.
    pub fn backup(&self) -> BackupSnapshot {
        let snapshot = BackupSnapshot::capture(&self.records, self.clock.now());
        tracing::info!(count = snapshot.record_count(), "created backup snapshot");
        snapshot
    }

    /// Replace the entire collection with the snapshot's records.
    ///
    /// This discards every current record, so it only runs when
    /// `confirmation` is [`Confirmation::Confirmed`].
    pub fn restore(
        &mut self,
        snapshot: BackupSnapshot,
        confirmation: Confirmation,
    ) -> GuardOutcome {
        if confirmation == Confirmation::Declined {
            tracing::info!("restore declined, store unchanged");
            return GuardOutcome::Declined;
        }

        let discarded = self.records.len();
        self.records = snapshot.into_records();
        let reassigned = self.dedupe();

        tracing::info!(
            restored = self.records.len(),
            discarded,
            reassigned,
            "restored backup"
        );
        GuardOutcome::Applied {
            affected: self.records.len(),
        }
    }

    /// Delete every record whose id is in `ids`.
    pub fn delete_many(&mut self, ids: &[RecordId], confirmation: Confirmation) -> GuardOutcome {
        if confirmation == Confirmation::Declined {
            tracing::info!(requested = ids.len(), "bulk delete declined");
            return GuardOutcome::Declined;
        }

        let targets: HashSet<&RecordId> = ids.iter().collect();
        let before = self.records.len();
        self.records.retain(|r| !targets.contains(&r.id));
        let affected = before - self.records.len();

        tracing::info!(requested = ids.len(), deleted = affected, "bulk deleted records");
        GuardOutcome::Applied { affected }
    }

    /// Remove every record.
    pub fn clear(&mut self, confirmation: Confirmation) -> GuardOutcome {
        if confirmation == Confirmation::Declined {
            tracing::info!("clear declined");
            return GuardOutcome::Declined;
        }

        let affected = self.records.len();
        self.records.clear();
        tracing::info!(deleted = affected, "cleared store");
        GuardOutcome::Applied { affected }
    }
}

/// Refresh `updatedAt`, keeping it strictly increasing even when the clock
/// has not advanced (or went backwards) since the last mutation.
fn bump_updated_at(record: &mut VaultRecord, now: DateTime<Utc>) {
    record.updated_at = if now > record.updated_at {
        now
    } else {
        record.updated_at + Duration::milliseconds(1)
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

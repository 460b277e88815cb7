//! Vault record store for Coffer.
//!
//! Holds the collection of saved credentials and everything that moves
//! records in or out of it: CRUD with id/timestamp management, duplicate-id
//! repair, JSON and CSV import/export, and whole-collection backups.
//! Persistence to disk is left to the caller; the store works on plain
//! `Vec<VaultRecord>` handed in and out.
//!
//! # Example
//!
//! ```rust
//! use coffer_vault::{Format, NewRecord, RecordStore};
//!
//! # fn example() -> coffer_vault::Result<()> {
//! let mut store = RecordStore::new();
//! let record = store.add(NewRecord::named("Acme"))?;
//! store.toggle_favorite(&record.id);
//!
//! let csv = store.export(Format::Csv)?;
//! let mut copy = RecordStore::new();
//! copy.import_from(&csv, Format::Csv)?;
//! assert_eq!(copy.len(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod backup;
pub mod clock;
pub mod codec;
pub mod error;
pub mod filter;
pub mod record;
pub mod store;

pub use backup::{BACKUP_VERSION, BackupMetadata, BackupSnapshot, size_label};
pub use clock::{Clock, SystemClock};
pub use codec::Format;
pub use error::{Result, VaultError};
pub use filter::{FolderFilter, RecordFilter};
pub use record::{NewRecord, RecordId, RecordPatch, RecordType, VaultRecord};
pub use store::{Confirmation, GuardOutcome, ImportSummary, RecordStore};

//! On-disk persistence for the vault and the generation history.
//!
//! Both files are JSON. Writes go to a temporary file in the target
//! directory which is then renamed over the destination, so an interrupted
//! write never leaves a truncated vault behind.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use coffer_generator::{History, HistoryEntry};
use coffer_vault::{RecordStore, VaultRecord};

// ---------------------------------------------------------------------------
// Vault
// ---------------------------------------------------------------------------

/// Load the vault file into a store. A missing file is an empty vault.
pub fn load_store(path: &Path) -> Result<RecordStore> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "vault file not found, starting empty");
        return Ok(RecordStore::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read vault file {}", path.display()))?;
    let records: Vec<VaultRecord> = serde_json::from_str(&content)
        .with_context(|| format!("vault file {} is corrupt", path.display()))?;

    tracing::debug!(path = %path.display(), count = records.len(), "loaded vault");
    Ok(RecordStore::from_records(records))
}

/// Persist every record in `store`.
pub fn save_store(path: &Path, store: &RecordStore) -> Result<()> {
    let content = serde_json::to_string_pretty(store.list()).context("failed to serialize vault")?;
    write_atomic(path, content.as_bytes())?;
    tracing::debug!(path = %path.display(), count = store.len(), "saved vault");
    Ok(())
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Load persisted history. Unreadable files start an empty log.
pub fn load_history(path: &Path, capacity: usize) -> History {
    let entries = match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<Vec<HistoryEntry>>(&content) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "history file is corrupt, starting fresh");
                Vec::new()
            }
        },
        Err(_) => Vec::new(),
    };
    History::from_entries(entries, capacity)
}

pub fn save_history(path: &Path, history: &History) -> Result<()> {
    let entries: Vec<&HistoryEntry> = history.entries().collect();
    let content = serde_json::to_string_pretty(&entries).context("failed to serialize history")?;
    write_atomic(path, content.as_bytes())
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Write `bytes` to `path` via a sibling temp file and rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(bytes).context("failed to write temp file")?;
    tmp.as_file().sync_all().context("failed to flush temp file")?;
    tmp.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

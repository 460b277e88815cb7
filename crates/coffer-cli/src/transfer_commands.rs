//! `coffer export`, `coffer import` and `coffer backup ...`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use coffer_vault::{BackupSnapshot, Format, size_label};
use tracing::info;

use crate::cli::BackupAction;
use crate::config::CofferConfig;
use crate::helpers::confirm;
use crate::storage;
use crate::vault_commands::report_guarded;

// ---------------------------------------------------------------------------
// export / import
// ---------------------------------------------------------------------------

pub fn cmd_export(config: &CofferConfig, format: Format, output: Option<PathBuf>) -> Result<()> {
    let store = storage::load_store(&config.vault.path)?;
    let content = store.export(format)?;

    match output {
        Some(path) => {
            storage::write_atomic(&path, content.as_bytes())?;
            eprintln!(
                "Exported {} records to {} ({})",
                store.len(),
                path.display(),
                size_label(content.len())
            );
        }
        None => println!("{content}"),
    }
    Ok(())
}

pub fn cmd_import(config: &CofferConfig, format: Format, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut store = storage::load_store(&config.vault.path)?;
    let summary = store
        .import_from(&content, format)
        .with_context(|| format!("import from {} failed", path.display()))?;
    storage::save_store(&config.vault.path, &store)?;

    println!("Imported {} records.", summary.imported);
    if summary.reassigned > 0 {
        println!("{} duplicate ids were given fresh ids.", summary.reassigned);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// backup
// ---------------------------------------------------------------------------

pub fn cmd_backup(config: &CofferConfig, action: BackupAction) -> Result<()> {
    match action {
        BackupAction::Create { output } => backup_create(config, output),
        BackupAction::Restore { path, yes } => backup_restore(config, &path, yes),
    }
}

fn backup_create(config: &CofferConfig, output: Option<PathBuf>) -> Result<()> {
    let store = storage::load_store(&config.vault.path)?;
    let snapshot = store.backup();
    let content = snapshot.to_json()?;

    let path = output.unwrap_or_else(|| PathBuf::from(snapshot.file_name()));
    storage::write_atomic(&path, content.as_bytes())?;

    info!(path = %path.display(), count = snapshot.record_count(), "wrote backup");
    println!(
        "Backed up {} records to {} ({})",
        snapshot.record_count(),
        path.display(),
        size_label(content.len())
    );
    Ok(())
}

fn backup_restore(config: &CofferConfig, path: &Path, yes: bool) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut store = storage::load_store(&config.vault.path)?;
    let snapshot = BackupSnapshot::from_json(&content, store.now())
        .with_context(|| format!("cannot restore from {}", path.display()))?;

    let question = format!(
        "Replace all {} current records with {} records from the backup taken {}?",
        store.len(),
        snapshot.record_count(),
        snapshot.created_at().format("%Y-%m-%d %H:%M UTC")
    );
    let outcome = store.restore(snapshot, confirm(&question, yes)?);

    if report_guarded(outcome, "restored") {
        storage::save_store(&config.vault.path, &store)?;
    }
    Ok(())
}

//! `coffer vault ...` subcommands.

use anyhow::{Context, Result, bail};
use coffer_generator::{GenerationKind, PasswordRequest, generate_password};
use coffer_vault::{
    FolderFilter, GuardOutcome, NewRecord, RecordFilter, RecordId, RecordPatch, RecordStore,
    RecordType,
};
use tracing::info;

use crate::cli::{AddArgs, EditArgs, VaultAction};
use crate::config::CofferConfig;
use crate::helpers::{confirm, record_line};
use crate::storage;

pub fn cmd_vault(config: &CofferConfig, action: VaultAction) -> Result<()> {
    let path = &config.vault.path;
    let mut store = storage::load_store(path)?;

    let changed = match action {
        VaultAction::List {
            favorites,
            record_type,
            folder,
            search,
            reveal,
        } => {
            let filter = build_filter(favorites, record_type.as_deref(), folder, search)?;
            list(&store, &filter, reveal);
            false
        }
        VaultAction::Add(args) => add(config, &mut store, args)?,
        VaultAction::Edit { id, fields } => edit(&mut store, &RecordId::from(id), fields)?,
        VaultAction::Delete { ids, yes } => delete(&mut store, ids, yes)?,
        VaultAction::Favorite { id } => {
            let id = RecordId::from(id);
            match store.toggle_favorite(&id) {
                Some(true) => println!("Marked {id} as favorite."),
                Some(false) => println!("Removed {id} from favorites."),
                None => bail!("no record with id {id}"),
            }
            true
        }
        VaultAction::Purge { yes } => {
            let question = format!("Delete all {} records? This cannot be undone.", store.len());
            let outcome = store.clear(confirm(&question, yes)?);
            report_guarded(outcome, "deleted")
        }
    };

    if changed {
        storage::save_store(path, &store)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

pub fn build_filter(
    favorites: bool,
    record_type: Option<&str>,
    folder: Option<String>,
    search: Option<String>,
) -> Result<RecordFilter> {
    let mut filter = RecordFilter::new();
    if favorites {
        filter = filter.favorites();
    }
    if let Some(raw) = record_type {
        filter = filter.of_type(parse_type(raw)?);
    }
    if let Some(folder) = folder {
        filter = filter.in_folder(if folder.is_empty() {
            FolderFilter::Unfiled
        } else {
            FolderFilter::Named(folder)
        });
    }
    if let Some(query) = search {
        filter = filter.search(query);
    }
    Ok(filter)
}

fn list(store: &RecordStore, filter: &RecordFilter, reveal: bool) {
    let matches = store.filter(filter);
    if matches.is_empty() {
        println!("No records.");
        return;
    }
    for record in &matches {
        println!("{}", record_line(record, reveal));
    }
    eprintln!("{} of {} records", matches.len(), store.len());
}

// ---------------------------------------------------------------------------
// add / edit / delete
// ---------------------------------------------------------------------------

fn add(config: &CofferConfig, store: &mut RecordStore, args: AddArgs) -> Result<bool> {
    let password = match (args.password, args.generate) {
        (Some(password), _) => password,
        (None, true) => {
            let request = PasswordRequest::validate(&config.generator.password)
                .context("invalid [generator.password] settings")?;
            let password = generate_password(&request);
            if config.history.enabled {
                let mut history =
                    storage::load_history(&config.history.path, config.history.capacity);
                history.record(password.clone(), GenerationKind::Password);
                storage::save_history(&config.history.path, &history)?;
            }
            password
        }
        (None, false) => String::new(),
    };

    let fields = NewRecord {
        name: args.name,
        username: args.username.unwrap_or_default(),
        password,
        url: args.url,
        notes: args.notes,
        record_type: args
            .record_type
            .as_deref()
            .map(parse_type)
            .transpose()?
            .unwrap_or_default(),
        folder: args.folder,
    };

    let record = store.add(fields)?;
    println!("Added {} ({})", record.name, record.id);
    Ok(true)
}

fn edit(store: &mut RecordStore, id: &RecordId, fields: EditArgs) -> Result<bool> {
    let patch = RecordPatch {
        name: fields.name,
        username: fields.username,
        password: fields.password,
        url: fields.url,
        notes: fields.notes,
        record_type: fields.record_type.as_deref().map(parse_type).transpose()?,
        folder: fields.folder,
        favorite: None,
    };
    if patch.is_empty() {
        bail!("nothing to change; pass at least one field flag");
    }

    match store.edit(id, patch)? {
        Some(record) => {
            println!("Updated {} ({})", record.name, record.id);
            Ok(true)
        }
        None => bail!("no record with id {id}"),
    }
}

fn delete(store: &mut RecordStore, ids: Vec<String>, yes: bool) -> Result<bool> {
    let ids: Vec<RecordId> = ids.into_iter().map(RecordId::from).collect();

    if let [id] = ids.as_slice() {
        let Some(record) = store.get(id) else {
            bail!("no record with id {id}");
        };
        let question = format!("Delete \"{}\"?", record.name);
        if !matches!(confirm(&question, yes)?, coffer_vault::Confirmation::Confirmed) {
            println!("Cancelled.");
            return Ok(false);
        }
        store.delete(id);
        println!("Deleted 1 record.");
        return Ok(true);
    }

    let question = format!("Delete {} records?", ids.len());
    let outcome = store.delete_many(&ids, confirm(&question, yes)?);
    Ok(report_guarded(outcome, "deleted"))
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

fn parse_type(raw: &str) -> Result<RecordType> {
    RecordType::parse(raw).with_context(|| {
        let known: Vec<&str> = RecordType::ALL.iter().map(RecordType::as_str).collect();
        format!("unknown record type {raw:?}; expected one of {}", known.join(", "))
    })
}

/// Print the result of a confirmation-guarded operation. Returns whether
/// the store changed.
pub fn report_guarded(outcome: GuardOutcome, verb: &str) -> bool {
    match outcome {
        GuardOutcome::Applied { affected } => {
            info!(affected, verb, "guarded operation applied");
            println!("{} {affected} record(s).", capitalize(verb));
            true
        }
        GuardOutcome::Declined => {
            println!("Cancelled.");
            false
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

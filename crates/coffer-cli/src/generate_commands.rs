//! `coffer generate` and `coffer history`.

use anyhow::Result;
use coffer_generator::{
    GenerationKind, PassphraseOptions, PassphraseRequest, PasswordOptions, PasswordRequest,
    Strength, UsernameMode, generate_passphrase, generate_password, generate_username,
};
use tracing::info;

use crate::cli::{GenerateKind, PassphraseArgs, PasswordArgs};
use crate::config::CofferConfig;
use crate::storage;

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

pub fn cmd_generate(config: &CofferConfig, kind: GenerateKind) -> Result<()> {
    let generated: Vec<(String, GenerationKind)> = match kind {
        GenerateKind::Password(args) => {
            let options = password_options(&config.generator.password, &args);
            let request = PasswordRequest::validate(&options)?;
            (0..args.count.max(1))
                .map(|_| (generate_password(&request), GenerationKind::Password))
                .collect()
        }
        GenerateKind::Passphrase(args) => {
            let options = passphrase_options(&config.generator.passphrase, &args);
            let request = PassphraseRequest::validate(&options)?;
            vec![(generate_passphrase(&request), GenerationKind::Passphrase)]
        }
        GenerateKind::Username { email } => {
            let mode = if email {
                UsernameMode::Email
            } else {
                UsernameMode::Word
            };
            vec![(generate_username(mode), GenerationKind::Username)]
        }
    };

    for (value, kind) in &generated {
        println!("{value}");
        if *kind == GenerationKind::Password {
            eprintln!("strength: {}", Strength::rate(value));
        }
    }

    if config.history.enabled {
        let mut history = storage::load_history(&config.history.path, config.history.capacity);
        for (value, kind) in generated {
            history.record(value, kind);
        }
        storage::save_history(&config.history.path, &history)?;
    }

    Ok(())
}

/// Merge command-line flags over configured password defaults.
pub fn password_options(defaults: &PasswordOptions, args: &PasswordArgs) -> PasswordOptions {
    PasswordOptions {
        length: args.length.unwrap_or(defaults.length),
        uppercase: defaults.uppercase && !args.no_upper,
        lowercase: defaults.lowercase && !args.no_lower,
        digits: defaults.digits && !args.no_digits,
        symbols: defaults.symbols || args.symbols,
        min_digits: args.min_digits.unwrap_or(defaults.min_digits),
        min_symbols: args.min_symbols.unwrap_or(defaults.min_symbols),
        avoid_ambiguous: defaults.avoid_ambiguous || args.avoid_ambiguous,
    }
}

/// Merge command-line flags over configured passphrase defaults.
pub fn passphrase_options(defaults: &PassphraseOptions, args: &PassphraseArgs) -> PassphraseOptions {
    PassphraseOptions {
        word_count: args.words.unwrap_or(defaults.word_count),
        separator: args
            .separator
            .clone()
            .unwrap_or_else(|| defaults.separator.clone()),
        capitalize: defaults.capitalize && !args.no_capitalize,
        append_number: defaults.append_number && !args.no_number,
    }
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

pub fn cmd_history(config: &CofferConfig, clear: bool) -> Result<()> {
    let mut history = storage::load_history(&config.history.path, config.history.capacity);

    if clear {
        let removed = history.len();
        history.clear();
        storage::save_history(&config.history.path, &history)?;
        info!(removed, "cleared history");
        println!("Cleared {removed} history entries.");
        return Ok(());
    }

    if history.is_empty() {
        println!("No generated values yet.");
        return Ok(());
    }

    for entry in history.entries() {
        println!(
            "{}  {:<10}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.kind.as_str(),
            entry.value
        );
    }
    Ok(())
}

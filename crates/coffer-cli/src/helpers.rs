//! Shared helper functions used across CLI subcommands.

use std::io::{self, BufRead, Write};

use coffer_vault::{Confirmation, VaultRecord};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
///
/// Logs go to stderr so command output on stdout stays pipeable.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// Ask a yes/no question on stdin. `assume_yes` skips the prompt.
pub fn confirm(question: &str, assume_yes: bool) -> io::Result<Confirmation> {
    if assume_yes {
        return Ok(Confirmation::Confirmed);
    }

    let mut stderr = io::stderr();
    write!(stderr, "{question} [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(parse_answer(&answer))
}

fn parse_answer(answer: &str) -> Confirmation {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes").into()
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// One-line summary of a record for list output.
pub fn record_line(record: &VaultRecord, reveal: bool) -> String {
    let star = if record.favorite { "*" } else { " " };
    let password = if reveal {
        record.password.clone()
    } else {
        mask(&record.password)
    };

    let mut line = format!(
        "{star} {id}  {name:<24} {kind:<8} {user:<20} {password}",
        id = record.id.as_str(),
        name = record.name,
        kind = record.record_type.as_str(),
        user = record.username,
    );
    if let Some(folder) = &record.folder {
        line.push_str(&format!("  [{folder}]"));
    }
    line
}

/// Replace every character of a secret with a bullet, capped at 12.
pub fn mask(secret: &str) -> String {
    "\u{2022}".repeat(secret.chars().count().min(12))
}

//! CLI argument definitions for Coffer.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Coffer -- a local password vault and credential generator.
#[derive(Parser)]
#[command(
    name = "coffer",
    version,
    about = "Coffer -- local password vault and credential generator",
    long_about = "Generate passwords, passphrases and usernames, keep credentials in a \
                  local vault file, and move them in and out as JSON, CSV or backups."
)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, env = "COFFER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the vault file location.
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Log verbosely (same as RUST_LOG=debug).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a password, passphrase or username.
    Generate {
        #[command(subcommand)]
        kind: GenerateKind,
    },

    /// Show or clear the generation history.
    History {
        /// Remove every history entry.
        #[arg(long)]
        clear: bool,
    },

    /// Manage vault records.
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },

    /// Export every record to JSON or CSV.
    Export {
        #[arg(long, short, value_enum)]
        format: FormatArg,

        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import records from a JSON or CSV file.
    Import {
        #[arg(long, short, value_enum)]
        format: FormatArg,

        /// File to read.
        path: PathBuf,
    },

    /// Create or restore whole-vault backups.
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Check credentials against the configured account.
    Login {
        #[arg(long, short)]
        username: String,

        #[arg(long, short)]
        password: String,
    },

    /// Print a PBKDF2 hash for the `[auth] password_hash` config key.
    HashPassword {
        password: String,
    },
}

/// What to generate.
#[derive(Subcommand)]
pub enum GenerateKind {
    /// A random password.
    Password(PasswordArgs),

    /// A passphrase of dictionary words.
    Passphrase(PassphraseArgs),

    /// A random username or email handle.
    Username {
        /// Produce `name@example.com` instead of a bare handle.
        #[arg(long)]
        email: bool,
    },
}

/// Password flags. Unset flags fall back to the `[generator.password]`
/// config section.
#[derive(Args, Default)]
pub struct PasswordArgs {
    /// Password length (4-128).
    #[arg(long, short, allow_negative_numbers = true)]
    pub length: Option<i64>,

    #[arg(long)]
    pub no_upper: bool,

    #[arg(long)]
    pub no_lower: bool,

    #[arg(long)]
    pub no_digits: bool,

    /// Include symbols.
    #[arg(long)]
    pub symbols: bool,

    #[arg(long, allow_negative_numbers = true)]
    pub min_digits: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    pub min_symbols: Option<i64>,

    /// Skip look-alike characters such as `O`/`0` and `l`/`1`.
    #[arg(long)]
    pub avoid_ambiguous: bool,

    /// How many passwords to print (1 to 1000).
    #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=1000))]
    pub count: u16,
}

/// Passphrase flags. Unset flags fall back to `[generator.passphrase]`.
#[derive(Args, Default)]
pub struct PassphraseArgs {
    /// Number of words (2-20).
    #[arg(long, short, allow_negative_numbers = true)]
    pub words: Option<i64>,

    #[arg(long, short)]
    pub separator: Option<String>,

    #[arg(long)]
    pub no_capitalize: bool,

    #[arg(long)]
    pub no_number: bool,
}

/// Actions for managing vault records.
#[derive(Subcommand)]
pub enum VaultAction {
    /// List records, optionally filtered.
    List {
        #[arg(long)]
        favorites: bool,

        /// Only this record type (login, card, identity, note, ssh-key).
        #[arg(long = "type")]
        record_type: Option<String>,

        /// Only this folder. Pass an empty string for records without one.
        #[arg(long)]
        folder: Option<String>,

        /// Case-insensitive text search.
        #[arg(long, short)]
        search: Option<String>,

        /// Print passwords in clear text.
        #[arg(long)]
        reveal: bool,
    },

    /// Add a record.
    Add(AddArgs),

    /// Edit fields of an existing record.
    Edit {
        id: String,

        #[command(flatten)]
        fields: EditArgs,
    },

    /// Delete one or more records.
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Toggle the favorite flag.
    Favorite { id: String },

    /// Delete every record.
    Purge {
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long, short)]
    pub name: String,

    #[arg(long, short)]
    pub username: Option<String>,

    #[arg(long, short, conflicts_with = "generate")]
    pub password: Option<String>,

    /// Fill the password with the configured generator defaults.
    #[arg(long, short)]
    pub generate: bool,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long = "type")]
    pub record_type: Option<String>,

    #[arg(long)]
    pub folder: Option<String>,
}

/// Fields to change. An empty string clears `url`, `notes` and `folder`.
#[derive(Args)]
pub struct EditArgs {
    #[arg(long, short)]
    pub name: Option<String>,

    #[arg(long, short)]
    pub username: Option<String>,

    #[arg(long, short)]
    pub password: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long = "type")]
    pub record_type: Option<String>,

    #[arg(long)]
    pub folder: Option<String>,
}

/// Actions for backups.
#[derive(Subcommand)]
pub enum BackupAction {
    /// Write a backup of the whole vault.
    Create {
        /// Destination file. Defaults to `backup-YYYY-MM-DD.json`.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace the vault with the contents of a backup.
    Restore {
        path: PathBuf,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

/// Interchange format flag.
#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for coffer_vault::Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Self::Json,
            FormatArg::Csv => Self::Csv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definitions_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn password_count_is_bounded() {
        let parsed = Cli::try_parse_from(["coffer", "generate", "password", "--count", "1000"]);
        assert!(parsed.is_ok());

        for count in ["0", "1001", "100000000"] {
            let parsed = Cli::try_parse_from(["coffer", "generate", "password", "--count", count]);
            assert!(parsed.is_err(), "count {count} accepted");
        }
    }
}

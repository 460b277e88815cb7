//! CLI entry point for Coffer.
//!
//! This binary provides the `coffer` command: credential generation,
//! vault record management, import/export and backups. The vault itself
//! lives in a JSON file named by `[vault] path` in the config.

mod auth_commands;
mod cli;
mod config;
mod generate_commands;
mod helpers;
mod storage;
mod transfer_commands;
mod vault_commands;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::config::CofferConfig;

fn main() -> Result<()> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = CofferConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.vault);

    let level = if cli.verbose {
        "debug"
    } else {
        config.log.level.as_str()
    };
    helpers::init_tracing(level);
    tracing::debug!(vault = %config.vault.path.display(), "configuration loaded");

    match cli.command {
        Commands::Generate { kind } => generate_commands::cmd_generate(&config, kind),
        Commands::History { clear } => generate_commands::cmd_history(&config, clear),
        Commands::Vault { action } => {
            auth_commands::authorize(&config.auth)?;
            vault_commands::cmd_vault(&config, action)
        }
        Commands::Export { format, output } => {
            auth_commands::authorize(&config.auth)?;
            transfer_commands::cmd_export(&config, format.into(), output)
        }
        Commands::Import { format, path } => {
            auth_commands::authorize(&config.auth)?;
            transfer_commands::cmd_import(&config, format.into(), &path)
        }
        Commands::Backup { action } => {
            auth_commands::authorize(&config.auth)?;
            transfer_commands::cmd_backup(&config, action)
        }
        Commands::Login { username, password } => {
            auth_commands::cmd_login(&config.auth, username, password)
        }
        Commands::HashPassword { password } => auth_commands::cmd_hash_password(&password),
    }
}

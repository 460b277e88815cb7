//! Configuration loading.
//!
//! Settings come from `config/coffer.toml` (or the file named by
//! `--config` / `COFFER_CONFIG`). Every key is optional; a missing default
//! file yields [`CofferConfig::default`]. `COFFER_VAULT_PATH` overrides
//! `[vault] path`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use coffer_generator::history::HISTORY_CAPACITY;
use coffer_generator::{PassphraseOptions, PasswordOptions};
use serde::{Deserialize, Serialize};

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/coffer.toml";

/// Environment variable overriding the vault file location.
pub const VAULT_PATH_ENV: &str = "COFFER_VAULT_PATH";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CofferConfig {
    pub vault: VaultConfig,
    pub generator: GeneratorConfig,
    pub history: HistoryConfig,
    pub auth: AuthConfig,
    pub log: LogConfig,
}

/// `[vault]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// JSON file holding the record array.
    pub path: PathBuf,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/vault.json"),
        }
    }
}

/// `[generator.password]` and `[generator.passphrase]`: defaults for the
/// generate commands, overridden per invocation by flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub password: PasswordOptions,
    pub passphrase: PassphraseOptions,
}

/// `[history]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Set to `false` to stop recording generated values.
    pub enabled: bool,
    pub path: PathBuf,
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("data/history.json"),
            capacity: HISTORY_CAPACITY,
        }
    }
}

/// `[auth]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,
    /// Output of `coffer hash-password`. Login is impossible without it.
    pub password_hash: Option<String>,
    /// Require `COFFER_USERNAME`/`COFFER_PASSWORD` before vault commands.
    pub require_login: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: coffer_auth::ADMIN_USERNAME.to_string(),
            password_hash: None,
            require_login: false,
        }
    }
}

/// `[log]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl CofferConfig {
    /// Load the config file and apply environment overrides.
    ///
    /// An explicitly named file must exist; the default one may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("config file {} does not exist", path.display());
                }
                Self::from_file(path)?
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(std::env::var_os(VAULT_PATH_ENV).map(PathBuf::from));
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.history.capacity == 0 {
            bail!("[history] capacity must be at least 1");
        }
        Ok(config)
    }

    /// Apply an externally supplied vault path.
    pub fn apply_overrides(&mut self, vault_path: Option<PathBuf>) {
        if let Some(path) = vault_path.filter(|p| !p.as_os_str().is_empty()) {
            tracing::debug!(path = %path.display(), "vault path overridden");
            self.vault.path = path;
        }
    }
}

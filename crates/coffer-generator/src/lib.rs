//! Credential generators for Coffer.
//!
//! This crate produces random secrets under caller-supplied constraints. It
//! performs no I/O and keeps no global state; every entry point comes in two
//! flavours, one using the thread-local CSPRNG and a `_with` variant that
//! takes any [`rand::Rng`] (seed a `StdRng` for reproducible output).
//!
//! # Modules
//!
//! - [`charset`]: category pools and the ambiguity exclusion table.
//! - [`password`]: fixed-length passwords with per-category minimums.
//! - [`passphrase`]: separator-joined dictionary words.
//! - [`username`]: adjective/noun/number handles.
//! - [`history`]: bounded most-recent-first log of generated values.
//! - [`strength`]: length-based strength rating.
//! - [`error`]: validation errors.
//!
//! # Quick Start
//!
//! ```rust
//! use coffer_generator::{PasswordOptions, PasswordRequest, generate_password};
//!
//! # fn example() -> coffer_generator::Result<()> {
//! let request = PasswordRequest::validate(&PasswordOptions {
//!     length: 20,
//!     symbols: true,
//!     min_symbols: 2,
//!     ..PasswordOptions::default()
//! })?;
//! let password = generate_password(&request);
//! assert_eq!(password.len(), 20);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod charset;
pub mod error;
pub mod history;
pub mod passphrase;
pub mod password;
pub mod strength;
pub mod username;

pub use charset::{CharCategory, CharsetPolicy};
pub use error::{GeneratorError, Result};
pub use history::{GenerationKind, History, HistoryEntry};
pub use passphrase::{
    PassphraseOptions, PassphraseRequest, generate_passphrase, generate_passphrase_with,
};
pub use password::{PasswordOptions, PasswordRequest, generate_password, generate_password_with};
pub use strength::Strength;
pub use username::{UsernameMode, generate_username, generate_username_with};

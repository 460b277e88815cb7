//! Word-list passphrases.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};

pub const MIN_WORDS: usize = 2;
pub const MAX_WORDS: usize = 20;
pub const DEFAULT_WORDS: usize = 4;

/// Longest separator accepted, in characters.
pub const MAX_SEPARATOR_LEN: usize = 8;

/// Largest numeral appended by `append_number`.
pub const MAX_SUFFIX: u32 = 99;

/// Fixed dictionary. Words are lowercase ASCII.
pub const WORD_LIST: &[&str] = &[
    "apple", "brave", "cloud", "dance", "eagle", "flame", "grace", "heart", "ivory", "judge",
    "kneel", "lunar", "magic", "noble", "ocean", "peace", "quiet", "river", "solar", "trust",
    "unity", "vivid", "water", "xenon", "youth", "zebra", "amber", "blaze", "coral", "dream",
    "ember", "frost", "gleam", "haven", "image", "jewel", "karma", "light", "maple", "north",
    "oasis", "plume", "quest", "realm", "shine", "tiger", "ultra", "vapor", "wiser",
];

/// Raw, unvalidated passphrase options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassphraseOptions {
    pub word_count: i64,
    pub separator: String,
    pub capitalize: bool,
    pub append_number: bool,
}

impl Default for PassphraseOptions {
    fn default() -> Self {
        Self {
            word_count: DEFAULT_WORDS as i64,
            separator: "-".to_string(),
            capitalize: true,
            append_number: true,
        }
    }
}

/// A validated passphrase request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassphraseRequest {
    word_count: usize,
    separator: String,
    capitalize: bool,
    append_number: bool,
}

impl PassphraseRequest {
    /// Build a request, rejecting a word count outside `2..=20` or a
    /// separator longer than [`MAX_SEPARATOR_LEN`] characters.
    pub fn validate(options: &PassphraseOptions) -> Result<Self> {
        let word_count = usize::try_from(options.word_count)
            .ok()
            .filter(|n| (MIN_WORDS..=MAX_WORDS).contains(n))
            .ok_or(GeneratorError::WordCountOutOfRange {
                count: options.word_count,
                min: MIN_WORDS,
                max: MAX_WORDS,
            })?;

        let len = options.separator.chars().count();
        if len > MAX_SEPARATOR_LEN {
            return Err(GeneratorError::SeparatorTooLong {
                len,
                max: MAX_SEPARATOR_LEN,
            });
        }

        Ok(Self {
            word_count,
            separator: options.separator.clone(),
            capitalize: options.capitalize,
            append_number: options.append_number,
        })
    }

    /// Build a request, clamping the word count and truncating the separator.
    pub fn normalized(options: &PassphraseOptions) -> Self {
        let word_count = usize::try_from(options.word_count.max(0))
            .unwrap_or(MAX_WORDS)
            .clamp(MIN_WORDS, MAX_WORDS);

        Self {
            word_count,
            separator: options.separator.chars().take(MAX_SEPARATOR_LEN).collect(),
            capitalize: options.capitalize,
            append_number: options.append_number,
        }
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

/// Generate a passphrase using the thread-local CSPRNG.
pub fn generate_passphrase(request: &PassphraseRequest) -> String {
    generate_passphrase_with(request, &mut rand::thread_rng())
}

/// Generate a passphrase drawing randomness from `rng`.
///
/// Words are drawn independently, with replacement.
pub fn generate_passphrase_with<R: Rng + ?Sized>(
    request: &PassphraseRequest,
    rng: &mut R,
) -> String {
    let words: Vec<String> = (0..request.word_count)
        .filter_map(|_| WORD_LIST.choose(rng))
        .map(|word| {
            if request.capitalize {
                capitalize(word)
            } else {
                (*word).to_string()
            }
        })
        .collect();

    let mut phrase = words.join(request.separator.as_str());
    if request.append_number {
        let suffix = rng.gen_range(0..=MAX_SUFFIX);
        phrase.push_str(&suffix.to_string());
    }
    phrase
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! Constrained random password generation.
//!
//! Caller-facing knobs live in [`PasswordOptions`], which is plain data that
//! may hold out-of-range values (it is what a form or config file hands us).
//! A [`PasswordRequest`] is only obtained through [`PasswordRequest::validate`]
//! (reject bad input) or [`PasswordRequest::normalized`] (clamp into range),
//! so the generator itself never sees an invalid request.
//!
//! # Algorithm
//!
//! 1. Sample the required digits and symbols from their pools.
//! 2. Fill the remaining `length - required` positions (never negative) from
//!    the union of every enabled pool.
//! 3. Shuffle the whole sequence (Fisher-Yates) so required characters are
//!    not clustered at the front.
//!
//! The result is `max(length, required_digits + required_symbols)` long.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::charset::{CharCategory, CharsetPolicy};
use crate::error::{GeneratorError, Result};

/// Shortest password the generator will produce.
pub const MIN_LENGTH: usize = 4;

/// Longest requested length accepted.
pub const MAX_LENGTH: usize = 128;

/// Length used when the caller does not pick one.
pub const DEFAULT_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Raw, unvalidated password options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordOptions {
    pub length: i64,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub min_digits: i64,
    pub min_symbols: i64,
    pub avoid_ambiguous: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH as i64,
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: false,
            min_digits: 1,
            min_symbols: 0,
            avoid_ambiguous: false,
        }
    }
}

impl PasswordOptions {
    fn policy(&self) -> CharsetPolicy {
        CharsetPolicy {
            upper: self.uppercase,
            lower: self.lowercase,
            digit: self.digits,
            symbol: self.symbols,
            avoid_ambiguous: self.avoid_ambiguous,
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A validated password generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordRequest {
    length: usize,
    policy: CharsetPolicy,
    min_digits: usize,
    min_symbols: usize,
}

impl PasswordRequest {
    /// Build a request, rejecting out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::LengthOutOfRange`] if `length` is outside
    /// `4..=128`, [`GeneratorError::NegativeMinimum`] for a negative minimum,
    /// and [`GeneratorError::MinimumTooLarge`] for a minimum above 128.
    pub fn validate(options: &PasswordOptions) -> Result<Self> {
        let length = usize::try_from(options.length)
            .ok()
            .filter(|len| (MIN_LENGTH..=MAX_LENGTH).contains(len))
            .ok_or(GeneratorError::LengthOutOfRange {
                length: options.length,
                min: MIN_LENGTH,
                max: MAX_LENGTH,
            })?;

        Ok(Self {
            length,
            policy: options.policy(),
            min_digits: validate_minimum("min_digits", options.min_digits)?,
            min_symbols: validate_minimum("min_symbols", options.min_symbols)?,
        })
    }

    /// Build a request, clamping length into `4..=128` and minimums into
    /// `0..=128`.
    pub fn normalized(options: &PasswordOptions) -> Self {
        let clamp = |value: i64, lo: usize| {
            usize::try_from(value.max(0))
                .unwrap_or(MAX_LENGTH)
                .clamp(lo, MAX_LENGTH)
        };

        let request = Self {
            length: clamp(options.length, MIN_LENGTH),
            policy: options.policy(),
            min_digits: clamp(options.min_digits, 0),
            min_symbols: clamp(options.min_symbols, 0),
        };

        if request.length as i64 != options.length {
            tracing::debug!(
                requested = options.length,
                length = request.length,
                "clamped password length"
            );
        }

        request
    }

    /// The requested length before minimums are taken into account.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn policy(&self) -> &CharsetPolicy {
        &self.policy
    }

    /// Digits that must appear; zero when the digit category is disabled.
    pub fn required_digits(&self) -> usize {
        if self.policy.digit { self.min_digits } else { 0 }
    }

    /// Symbols that must appear; zero when the symbol category is disabled.
    pub fn required_symbols(&self) -> usize {
        if self.policy.symbol { self.min_symbols } else { 0 }
    }

    /// Exact length of every password produced for this request.
    pub fn output_len(&self) -> usize {
        self.length
            .max(self.required_digits() + self.required_symbols())
    }
}

fn validate_minimum(field: &'static str, value: i64) -> Result<usize> {
    if value < 0 {
        return Err(GeneratorError::NegativeMinimum { field, value });
    }
    usize::try_from(value)
        .ok()
        .filter(|v| *v <= MAX_LENGTH)
        .ok_or(GeneratorError::MinimumTooLarge {
            field,
            value,
            max: MAX_LENGTH,
        })
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate a password using the thread-local CSPRNG.
pub fn generate_password(request: &PasswordRequest) -> String {
    generate_password_with(request, &mut rand::thread_rng())
}

/// Generate a password drawing randomness from `rng`.
pub fn generate_password_with<R: Rng + ?Sized>(request: &PasswordRequest, rng: &mut R) -> String {
    let policy = request.policy();
    let digits = policy.pool(CharCategory::Digit).as_bytes();
    let symbols = policy.pool(CharCategory::Symbol).as_bytes();
    let union = policy.union();

    let mut chars: Vec<u8> = Vec::with_capacity(request.output_len());

    for _ in 0..request.required_digits() {
        chars.push(pick(digits, rng));
    }
    for _ in 0..request.required_symbols() {
        chars.push(pick(symbols, rng));
    }

    let remaining = request.length().saturating_sub(chars.len());
    for _ in 0..remaining {
        chars.push(pick(union.as_bytes(), rng));
    }

    chars.shuffle(rng);

    // Every pool is ASCII.
    chars.into_iter().map(char::from).collect()
}

fn pick<R: Rng + ?Sized>(pool: &[u8], rng: &mut R) -> u8 {
    pool[rng.gen_range(0..pool.len())]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::is_ambiguous;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn options(length: i64) -> PasswordOptions {
        PasswordOptions {
            length,
            ..PasswordOptions::default()
        }
    }

    #[test]
    fn validate_rejects_short_and_long() {
        assert!(matches!(
            PasswordRequest::validate(&options(3)),
            Err(GeneratorError::LengthOutOfRange { length: 3, .. })
        ));
        assert!(matches!(
            PasswordRequest::validate(&options(129)),
            Err(GeneratorError::LengthOutOfRange { .. })
        ));
        assert!(PasswordRequest::validate(&options(4)).is_ok());
        assert!(PasswordRequest::validate(&options(128)).is_ok());
    }

    #[test]
    fn validate_rejects_negative_minimum() {
        let opts = PasswordOptions {
            min_symbols: -1,
            ..PasswordOptions::default()
        };
        assert!(matches!(
            PasswordRequest::validate(&opts),
            Err(GeneratorError::NegativeMinimum {
                field: "min_symbols",
                value: -1
            })
        ));
    }

    #[test]
    fn normalized_clamps() {
        let opts = PasswordOptions {
            length: 1_000,
            min_digits: -5,
            ..PasswordOptions::default()
        };
        let request = PasswordRequest::normalized(&opts);
        assert_eq!(request.length(), MAX_LENGTH);
        assert_eq!(request.required_digits(), 0);

        let request = PasswordRequest::normalized(&options(-3));
        assert_eq!(request.length(), MIN_LENGTH);
    }

    #[test]
    fn twelve_chars_two_digits_no_symbols() {
        let opts = PasswordOptions {
            length: 12,
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: false,
            min_digits: 2,
            min_symbols: 0,
            avoid_ambiguous: false,
        };
        let request = PasswordRequest::validate(&opts).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let password = generate_password_with(&request, &mut rng);
            assert_eq!(password.chars().count(), 12);
            assert!(password.chars().filter(char::is_ascii_digit).count() >= 2);
            assert!(
                !password
                    .chars()
                    .any(|c| CharCategory::of(c) == Some(CharCategory::Symbol))
            );
        }
    }

    #[test]
    fn minimums_exceeding_length_extend_output() {
        let opts = PasswordOptions {
            length: 4,
            symbols: true,
            min_digits: 5,
            min_symbols: 3,
            ..PasswordOptions::default()
        };
        let request = PasswordRequest::validate(&opts).unwrap();
        assert_eq!(request.output_len(), 8);

        let password = generate_password_with(&request, &mut StdRng::seed_from_u64(1));
        assert_eq!(password.len(), 8);
        assert_eq!(password.chars().filter(char::is_ascii_digit).count(), 5);
    }

    #[test]
    fn disabled_category_ignores_minimum() {
        let opts = PasswordOptions {
            length: 6,
            digits: false,
            min_digits: 10,
            ..PasswordOptions::default()
        };
        let request = PasswordRequest::validate(&opts).unwrap();
        assert_eq!(request.required_digits(), 0);

        let password = generate_password_with(&request, &mut StdRng::seed_from_u64(3));
        assert_eq!(password.len(), 6);
        assert!(!password.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn avoid_ambiguous_excludes_table() {
        let opts = PasswordOptions {
            length: 128,
            symbols: true,
            min_symbols: 20,
            avoid_ambiguous: true,
            ..PasswordOptions::default()
        };
        let request = PasswordRequest::validate(&opts).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let password = generate_password_with(&request, &mut rng);
            assert!(!password.chars().any(is_ambiguous), "{password}");
        }
    }

    #[test]
    fn all_categories_off_uses_lowercase() {
        let opts = PasswordOptions {
            length: 32,
            uppercase: false,
            lowercase: false,
            digits: false,
            symbols: false,
            ..PasswordOptions::default()
        };
        let request = PasswordRequest::validate(&opts).unwrap();
        let password = generate_password_with(&request, &mut StdRng::seed_from_u64(5));
        assert_eq!(password.len(), 32);
        assert!(password.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn same_seed_same_password() {
        let request = PasswordRequest::validate(&PasswordOptions::default()).unwrap();
        let a = generate_password_with(&request, &mut StdRng::seed_from_u64(42));
        let b = generate_password_with(&request, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn thread_rng_entry_point() {
        let request = PasswordRequest::validate(&PasswordOptions::default()).unwrap();
        assert_eq!(generate_password(&request).len(), DEFAULT_LENGTH);
    }
}

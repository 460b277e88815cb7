//! Generator error types.
//!
//! Generation itself cannot fail once a request has been built. The only
//! errors are validation failures raised while turning caller-supplied
//! options into a request.

/// Unified error type for the Coffer generators.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The requested password length is outside the supported range.
    #[error("password length {length} is outside {min}..={max}")]
    LengthOutOfRange { length: i64, min: usize, max: usize },

    /// A minimum character count was negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeMinimum { field: &'static str, value: i64 },

    /// A minimum character count exceeds the longest supported password.
    #[error("{field} must be at most {max}, got {value}")]
    MinimumTooLarge {
        field: &'static str,
        value: i64,
        max: usize,
    },

    /// The requested passphrase word count is outside the supported range.
    #[error("word count {count} is outside {min}..={max}")]
    WordCountOutOfRange { count: i64, min: usize, max: usize },

    /// The passphrase separator is longer than allowed.
    #[error("separator is {len} characters long, at most {max} allowed")]
    SeparatorTooLong { len: usize, max: usize },
}

/// Convenience alias used throughout the generator crate.
pub type Result<T> = std::result::Result<T, GeneratorError>;

//! Character pools for password generation.
//!
//! Every category has a full pool and a "safe" pool that drops characters
//! easily confused in print. The tables are fixed; [`AMBIGUOUS`] is exactly
//! the set of characters present in a full pool but absent from its safe
//! counterpart.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pools
// ---------------------------------------------------------------------------

pub const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const UPPER_SAFE: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ";
pub const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
pub const LOWER_SAFE: &str = "abcdefghjkmnpqrstuvwxyz";
pub const DIGITS: &str = "0123456789";
pub const DIGITS_SAFE: &str = "23456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:',.<>?";
pub const SYMBOLS_SAFE: &str = "!@#$%^&*_+-=?";

/// Characters excluded when ambiguity avoidance is on.
pub const AMBIGUOUS: &str = "IOilo01()[]{}|;:',.<>";

/// Returns `true` if `c` belongs to the ambiguous exclusion table.
pub fn is_ambiguous(c: char) -> bool {
    AMBIGUOUS.contains(c)
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// A class of characters that can be toggled on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharCategory {
    Upper,
    Lower,
    Digit,
    Symbol,
}

impl CharCategory {
    /// All categories in union order.
    pub const ALL: [CharCategory; 4] = [Self::Upper, Self::Lower, Self::Digit, Self::Symbol];

    /// The pool for this category, optionally with ambiguous characters removed.
    pub fn pool(self, avoid_ambiguous: bool) -> &'static str {
        match (self, avoid_ambiguous) {
            (Self::Upper, false) => UPPER,
            (Self::Upper, true) => UPPER_SAFE,
            (Self::Lower, false) => LOWER,
            (Self::Lower, true) => LOWER_SAFE,
            (Self::Digit, false) => DIGITS,
            (Self::Digit, true) => DIGITS_SAFE,
            (Self::Symbol, false) => SYMBOLS,
            (Self::Symbol, true) => SYMBOLS_SAFE,
        }
    }

    /// Which category a character belongs to, if any (full pools).
    pub fn of(c: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.pool(false).contains(c))
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// The set of enabled categories plus the ambiguity flag.
///
/// Pure data: deriving pools has no side effects. If every category is
/// disabled the policy behaves as if only lowercase were enabled, so
/// generation never runs out of alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharsetPolicy {
    pub upper: bool,
    pub lower: bool,
    pub digit: bool,
    pub symbol: bool,
    pub avoid_ambiguous: bool,
}

impl Default for CharsetPolicy {
    fn default() -> Self {
        Self {
            upper: true,
            lower: true,
            digit: true,
            symbol: false,
            avoid_ambiguous: false,
        }
    }
}

impl CharsetPolicy {
    /// Whether the caller switched this category on.
    pub fn is_enabled(&self, category: CharCategory) -> bool {
        match category {
            CharCategory::Upper => self.upper,
            CharCategory::Lower => self.lower,
            CharCategory::Digit => self.digit,
            CharCategory::Symbol => self.symbol,
        }
    }

    /// `true` when no category is enabled and the lowercase fallback applies.
    pub fn is_fallback(&self) -> bool {
        !(self.upper || self.lower || self.digit || self.symbol)
    }

    /// The pool for one category, honouring the ambiguity flag.
    pub fn pool(&self, category: CharCategory) -> &'static str {
        category.pool(self.avoid_ambiguous)
    }

    /// Concatenation of every enabled pool, or the lowercase pool if none is.
    pub fn union(&self) -> String {
        if self.is_fallback() {
            return self.pool(CharCategory::Lower).to_string();
        }

        CharCategory::ALL
            .into_iter()
            .filter(|category| self.is_enabled(*category))
            .map(|category| self.pool(category))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

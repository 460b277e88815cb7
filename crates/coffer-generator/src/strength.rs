//! Length-based strength rating for generated passwords.

use serde::{Deserialize, Serialize};

/// Coarse strength bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl Strength {
    /// Rate a password by character count: <8 weak, <12 fair, <16 good.
    pub fn rate(password: &str) -> Self {
        match password.chars().count() {
            0..=7 => Self::Weak,
            8..=11 => Self::Fair,
            12..=15 => Self::Good,
            _ => Self::Strong,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Strong => "strong",
        }
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets() {
        assert_eq!(Strength::rate(""), Strength::Weak);
        assert_eq!(Strength::rate("1234567"), Strength::Weak);
        assert_eq!(Strength::rate("12345678"), Strength::Fair);
        assert_eq!(Strength::rate("123456789012"), Strength::Good);
        assert_eq!(Strength::rate("1234567890123456"), Strength::Strong);
        assert!(Strength::Strong > Strength::Weak);
    }
}

//! Pseudonymous username generation.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

pub const ADJECTIVES: &[&str] = &["swift", "calm", "bold", "keen", "wise", "cool", "fast", "neat"];
pub const NOUNS: &[&str] = &["tiger", "eagle", "wolf", "bear", "hawk", "lynx", "fox", "deer"];

/// Largest numeral appended to a username.
pub const MAX_NUMBER: u32 = 9999;

/// Domain used by [`UsernameMode::Email`].
pub const EMAIL_DOMAIN: &str = "example.com";

/// Output shape, chosen by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsernameMode {
    /// `adjectivenoun1234`
    #[default]
    Word,
    /// `adjective.noun1234@example.com`
    Email,
}

/// Generate a username using the thread-local CSPRNG.
pub fn generate_username(mode: UsernameMode) -> String {
    generate_username_with(mode, &mut rand::thread_rng())
}

/// Generate a username drawing randomness from `rng`.
pub fn generate_username_with<R: Rng + ?Sized>(mode: UsernameMode, rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("swift");
    let noun = NOUNS.choose(rng).copied().unwrap_or("tiger");
    let number = rng.gen_range(0..=MAX_NUMBER);

    match mode {
        UsernameMode::Word => format!("{adjective}{noun}{number}"),
        UsernameMode::Email => format!("{adjective}.{noun}{number}@{EMAIL_DOMAIN}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn split_number(s: &str) -> (&str, u32) {
        let idx = s.find(|c: char| c.is_ascii_digit()).unwrap();
        (&s[..idx], s[idx..].parse().unwrap())
    }

    #[test]
    fn word_mode_composition() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            let name = generate_username_with(UsernameMode::Word, &mut rng);
            let (letters, number) = split_number(&name);
            assert!(number <= MAX_NUMBER);
            assert!(
                ADJECTIVES
                    .iter()
                    .any(|a| NOUNS.iter().any(|n| letters == format!("{a}{n}")))
            );
        }
    }

    #[test]
    fn email_mode_composition() {
        let name = generate_username_with(UsernameMode::Email, &mut StdRng::seed_from_u64(8));
        let (local, domain) = name.split_once('@').unwrap();
        assert_eq!(domain, EMAIL_DOMAIN);

        let (adjective, rest) = local.split_once('.').unwrap();
        assert!(ADJECTIVES.contains(&adjective));
        let (noun, number) = split_number(rest);
        assert!(NOUNS.contains(&noun));
        assert!(number <= MAX_NUMBER);
    }

    #[test]
    fn default_mode_is_word() {
        assert_eq!(UsernameMode::default(), UsernameMode::Word);
        assert!(!generate_username(UsernameMode::Word).contains('@'));
    }
}

//! Complexity classification: can the provider's own display be trusted?
//!
//! The external provider parses the notation it was given and renders its
//! own expression text and total. For anything beyond a single plain term
//! (optionally with a trailing constant or a single `kh1`/`kl1`) that
//! rendering is wrong and must be overridden with locally computed results.

use serde::{Deserialize, Serialize};

use crate::parser::ParsedRoll;

/// Classification flags for a parsed roll. Pure function of structure;
/// never changes the numeric result, only how it is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Complexity {
    /// The provider's rendered notation/total cannot be trusted.
    pub is_complex: bool,
    /// Simple `2d..kh1` roll, natively rendered as advantage.
    pub is_advantage: bool,
    /// Simple `2d..kl1` roll, natively rendered as disadvantage.
    pub is_disadvantage: bool,
}

/// Classify a parsed roll.
pub fn classify(roll: &ParsedRoll) -> Complexity {
    let is_complex = complex(roll);
    Complexity {
        is_complex,
        is_advantage: !is_complex
            && roll.raw.starts_with("2d")
            && roll.terms[0].raw.ends_with("kh1"),
        is_disadvantage: !is_complex
            && roll.raw.starts_with("2d")
            && roll.terms[0].raw.ends_with("kl1"),
    }
}

fn complex(roll: &ParsedRoll) -> bool {
    if roll.terms.len() != 1 {
        // more than one term breaks the provider's expression parsing
        return true;
    }
    let term = &roll.terms[0];

    if term.reroll.is_some() {
        // reroll doubles the requested dice; the provider shows all of them
        return true;
    }

    if !roll.raw.starts_with(term.raw.as_str()) {
        // a leading constant ("1-1d4") breaks the provider's formatter,
        // while a trailing one ("1d4-1") renders fine
        return true;
    }

    // only a single kh1/kl1 is natively supported (advantage/disadvantage);
    // kh2, kl10, or stacked keep modifiers are not
    for marker in ["kh", "kl"] {
        let occurrences = term.raw.matches(marker).count();
        let natively_supported = format!("{marker}1");
        if occurrences > 1 || (occurrences == 1 && !term.raw.ends_with(&natively_supported)) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(text: &str) -> Complexity {
        classify(&ParsedRoll::parse(text).unwrap())
    }

    #[test]
    fn plain_roll_is_simple() {
        let c = flags("1d20");
        assert!(!c.is_complex);
        assert!(!c.is_advantage);
        assert!(!c.is_disadvantage);
    }

    #[test]
    fn trailing_constant_is_simple() {
        assert!(!flags("1d20-1").is_complex);
    }

    #[test]
    fn leading_constant_is_complex() {
        assert!(flags("1-1d20").is_complex);
    }

    #[test]
    fn multiple_terms_are_complex() {
        assert!(flags("2d20kh1+1d4").is_complex);
        assert!(flags("1d20+1d4").is_complex);
    }

    #[test]
    fn reroll_is_complex() {
        assert!(flags("2d6ro<3").is_complex);
    }

    #[test]
    fn keep_other_than_one_is_complex() {
        assert!(flags("4d6kh2").is_complex);
        assert!(flags("4d6kl3").is_complex);
        assert!(flags("3d20kh10").is_complex);
    }

    #[test]
    fn advantage_detection() {
        assert!(flags("2d20kh1").is_advantage);
        assert!(flags("2d20kh1+3").is_advantage);
        assert!(!flags("3d20kh1").is_advantage);
    }

    #[test]
    fn disadvantage_detection() {
        assert!(flags("2d20kl1").is_disadvantage);
        assert!(!flags("2d20kl1").is_advantage);
    }

    #[test]
    fn advantage_requires_simple_roll() {
        assert!(!flags("2d20kh1+1d4").is_advantage);
    }

    #[test]
    fn classify_is_idempotent() {
        let roll = ParsedRoll::parse("2d20kh1+3").unwrap();
        assert_eq!(classify(&roll), classify(&roll));
    }
}

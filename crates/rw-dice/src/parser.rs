//! Parsing full dice formulas into structured rolls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::die::Die;
use crate::error::{DiceError, DiceResult};
use crate::grammar;
use crate::term::DieTerm;

/// A fully parsed dice formula like `2d20kh1+1d4-3`.
///
/// Term order is left-to-right occurrence order and is semantically
/// significant: it is the only correlation key between the formula and the
/// flat value stream the roll provider returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRoll {
    /// The whitespace-stripped input.
    pub raw: String,
    /// Die terms in occurrence order. Never empty.
    pub terms: Vec<DieTerm>,
    /// Sum of all signed integer literals outside the die terms.
    pub constant: i32,
}

impl ParsedRoll {
    /// Parse a dice formula.
    ///
    /// Fails with [`DiceError::InvalidExpression`] when the input contains a
    /// character outside the notation alphabet or no die term at all, and
    /// with [`DiceError::UnsupportedDieType`] for die sizes the provider
    /// does not offer.
    pub fn parse(text: &str) -> DiceResult<Self> {
        let raw: String = text.chars().filter(|c| !c.is_whitespace()).collect();

        if !grammar::is_valid_character_set(&raw) {
            return Err(DiceError::InvalidExpression(format!(
                "'{text}' contains characters outside the dice notation alphabet"
            )));
        }

        let raw_terms = grammar::extract_terms(&raw);
        if raw_terms.is_empty() {
            return Err(DiceError::InvalidExpression(format!(
                "'{text}' contains no die terms"
            )));
        }

        // whatever is left after removing the terms holds the constants,
        // e.g. "1d20+1+1d4-3" leaves "+1-3"
        let mut remainder = raw.clone();
        for term in &raw_terms {
            remainder = remainder.replacen(term, "", 1);
        }
        let constant = sum_signed_literals(&remainder)?;

        let terms = raw_terms
            .iter()
            .map(|term| DieTerm::parse(term))
            .collect::<DiceResult<Vec<_>>>()?;

        terms
            .iter()
            .try_fold(0u32, |total, term| total.checked_add(term.rolled_count()))
            .ok_or_else(|| {
                DiceError::InvalidExpression(format!("'{text}' requests too many dice"))
            })?;

        Ok(Self {
            raw,
            terms,
            constant,
        })
    }

    /// Total dice needed per die size across all terms, reroll doubling
    /// included. This drives the select-die requests sent to the provider.
    pub fn dice_to_roll(&self) -> BTreeMap<Die, u32> {
        let mut needed = BTreeMap::new();
        for term in &self.terms {
            *needed.entry(term.die).or_insert(0) += term.rolled_count();
        }
        needed
    }
}

impl std::fmt::Display for ParsedRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Sum every `+N`/`-N` literal in `s`. A sign with no trailing digits
/// contributes nothing, and an unsigned leading number is not a signed
/// literal, so `1-1d4` carries a constant of zero. Literals (or their sum)
/// outside the `i32` range are rejected.
fn sum_signed_literals(s: &str) -> DiceResult<i32> {
    let out_of_range =
        |literal: &str| DiceError::InvalidExpression(format!("constant '{literal}' is out of range"));

    let bytes = s.as_bytes();
    let mut total = 0i32;
    let mut at = 0;
    while at < bytes.len() {
        if bytes[at] == b'+' || bytes[at] == b'-' {
            let digits = grammar::digit_run(&s[at + 1..]);
            if digits > 0 {
                let literal = &s[at..at + 1 + digits];
                let value: i32 = literal.parse().map_err(|_| out_of_range(literal))?;
                total = total.checked_add(value).ok_or_else(|| out_of_range(literal))?;
                at += 1 + digits;
                continue;
            }
        }
        at += 1;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::KeepMode;
    use proptest::prelude::*;

    #[test]
    fn parse_single_term() {
        let roll = ParsedRoll::parse("1d20").unwrap();
        assert_eq!(roll.raw, "1d20");
        assert_eq!(roll.terms.len(), 1);
        assert_eq!(roll.constant, 0);
    }

    #[test]
    fn parse_strips_whitespace() {
        let roll = ParsedRoll::parse(" 2d20kh1 + 3 ").unwrap();
        assert_eq!(roll.raw, "2d20kh1+3");
        assert_eq!(roll.constant, 3);
    }

    #[test]
    fn parse_mixed_constants() {
        let roll = ParsedRoll::parse("1d20+1+1d4-3").unwrap();
        assert_eq!(roll.constant, -2);
        assert_eq!(roll.terms.len(), 2);
    }

    #[test]
    fn leading_unsigned_number_is_not_a_constant() {
        // "1-1d4" leaves "1-" after term removal; no signed literal remains
        let roll = ParsedRoll::parse("1-1d4").unwrap();
        assert_eq!(roll.constant, 0);
    }

    #[test]
    fn terms_preserve_occurrence_order() {
        let roll = ParsedRoll::parse("1d4+2d6-3d8+4d10").unwrap();
        let raws: Vec<&str> = roll.terms.iter().map(|t| t.raw.as_str()).collect();
        assert_eq!(raws, vec!["1d4", "2d6", "3d8", "4d10"]);
    }

    #[test]
    fn dice_to_roll_sums_by_size() {
        let roll = ParsedRoll::parse("2d20kh1+1d20+1d4").unwrap();
        let needed = roll.dice_to_roll();
        assert_eq!(needed[&Die::D20], 3);
        assert_eq!(needed[&Die::D4], 1);
    }

    #[test]
    fn dice_to_roll_doubles_reroll_terms() {
        let roll = ParsedRoll::parse("2d6ro<3").unwrap();
        assert_eq!(roll.dice_to_roll()[&Die::D6], 4);
    }

    #[test]
    fn dice_to_roll_mixes_doubled_and_plain() {
        let roll = ParsedRoll::parse("2d6ro<3+1d6").unwrap();
        assert_eq!(roll.dice_to_roll()[&Die::D6], 5);
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(matches!(
            ParsedRoll::parse("1d20; rm -rf"),
            Err(DiceError::InvalidExpression(_))
        ));
    }

    #[test]
    fn rejects_diceless_input() {
        assert!(matches!(
            ParsedRoll::parse("hello world"),
            Err(DiceError::InvalidExpression(_))
        ));
        assert!(matches!(
            ParsedRoll::parse("3+4"),
            Err(DiceError::InvalidExpression(_))
        ));
    }

    #[test]
    fn rejects_unsupported_die() {
        assert_eq!(
            ParsedRoll::parse("1d3+1d20").map(|r| r.terms.len()),
            Ok(1)
        );
        // "1d3" is not scanned as a term; only the d20 survives. An
        // expression with nothing but unsupported sizes is dice-less.
        assert!(ParsedRoll::parse("1d3").is_err());
    }

    #[test]
    fn rejects_overflowing_constant() {
        assert!(matches!(
            ParsedRoll::parse("1d20+9999999999"),
            Err(DiceError::InvalidExpression(_))
        ));
    }

    #[test]
    fn rejects_absurd_dice_counts() {
        assert!(matches!(
            ParsedRoll::parse("3000000000d20+3000000000d20"),
            Err(DiceError::InvalidExpression(_))
        ));
        assert!(matches!(
            ParsedRoll::parse("4000000000d20ro<2"),
            Err(DiceError::InvalidExpression(_))
        ));
    }

    #[test]
    fn keep_modifier_carried_through() {
        let roll = ParsedRoll::parse("2d20kh1+3").unwrap();
        assert_eq!(roll.terms[0].keep, KeepMode::Highest(1));
    }

    proptest! {
        #[test]
        fn order_preserved_for_generated_formulas(
            counts in prop::collection::vec(1u32..=4, 1..5),
            sizes in prop::collection::vec(prop::sample::select(vec![4u32, 6, 8, 10, 12, 20, 100]), 1..5),
        ) {
            let n = counts.len().min(sizes.len());
            let formula: Vec<String> = (0..n)
                .map(|i| format!("{}d{}", counts[i], sizes[i]))
                .collect();
            let text = formula.join("+");
            let roll = ParsedRoll::parse(&text).unwrap();
            prop_assert_eq!(roll.terms.len(), n);
            for (term, expected) in roll.terms.iter().zip(&formula) {
                prop_assert_eq!(&term.raw, expected);
            }
        }

        #[test]
        fn constant_matches_literal_sum(
            constant in -50i32..50,
        ) {
            let text = if constant < 0 {
                format!("1d20{constant}")
            } else {
                format!("1d20+{constant}")
            };
            let roll = ParsedRoll::parse(&text).unwrap();
            prop_assert_eq!(roll.constant, constant);
        }
    }
}

//! Re-associating raw provider values with the originally requested terms.
//!
//! The roll provider understands only "roll N dice of size X". It returns
//! one flat value array, grouped by die size, in the same order the dice
//! were requested. Because requests are built from the parsed terms in
//! order, popping values off the front of each size group reconstructs the
//! per-term results; keep and reroll modifiers the provider never saw are
//! then applied locally.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classify::{Complexity, classify};
use crate::die::Die;
use crate::error::{DiceError, DiceResult};
use crate::eval::evaluate;
use crate::grammar::extract_terms;
use crate::parser::ParsedRoll;
use crate::term::{DieTerm, KeepMode};

/// The corrected result of a reconciled roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// The raw expression with every die term replaced by its values,
    /// e.g. `(18+2)-3`.
    pub expression_text: String,
    /// The locally computed total.
    pub total: i32,
    /// Every die value that contributed to the total, in term order,
    /// after keep/reroll filtering.
    pub used_values: Vec<i32>,
    /// The constant carried over from the parsed roll.
    pub constant: i32,
    /// Classification of the reconciled roll.
    pub complexity: Complexity,
}

/// Group the provider's flat value array by die size.
///
/// `notation` is the provider's own notation string (terms grouped by size,
/// e.g. `9d20+5d10+1d4`); the values arrive in that order. Reroll terms in
/// the notation are doubled the same way requests were.
pub fn group_values_by_die(notation: &str, values: &[i32]) -> DiceResult<BTreeMap<Die, Vec<i32>>> {
    let mut grouped: BTreeMap<Die, Vec<i32>> = BTreeMap::new();
    let mut remaining = values;

    for raw_term in extract_terms(notation) {
        let term = DieTerm::parse(raw_term)?;
        let take = term.rolled_count() as usize;
        if remaining.len() < take {
            return Err(DiceError::Reconciliation(format!(
                "notation '{notation}' expects {take} values for '{raw_term}' but only {} remain",
                remaining.len()
            )));
        }
        let (front, rest) = remaining.split_at(take);
        grouped.entry(term.die).or_default().extend_from_slice(front);
        remaining = rest;
    }

    Ok(grouped)
}

/// Apply keep/reroll rules and recompute the expression text and total.
///
/// Consumes values from `grouped` front-first, one term at a time. Fails
/// with [`DiceError::Reconciliation`] when a term demands more values than
/// the provider returned; the caller falls back to the untouched provider
/// message in that case.
pub fn reconcile(
    roll: &ParsedRoll,
    grouped: &mut BTreeMap<Die, Vec<i32>>,
) -> DiceResult<RollOutcome> {
    let mut expression = roll.raw.clone();
    let mut used_values = Vec::new();

    for term in &roll.terms {
        let take = term.rolled_count() as usize;
        let available = grouped.entry(term.die).or_default();
        if available.len() < take {
            return Err(DiceError::Reconciliation(format!(
                "term '{}' needs {take} values of {} but only {} remain",
                term.raw,
                term.die,
                available.len()
            )));
        }
        let mut values: Vec<i32> = available.drain(..take).collect();

        if let Some(rule) = term.reroll {
            // the pool was doubled up front: first half primaries, second
            // half reserves, consumed in order and never reused
            let reserves = values.split_off(values.len() / 2);
            let mut reserves = reserves.into_iter();
            values = values
                .into_iter()
                .map(|value| {
                    if rule.comparator.matches(value, rule.threshold) {
                        reserves.next().unwrap_or(value)
                    } else {
                        value
                    }
                })
                .collect();
        }

        match term.keep {
            KeepMode::All => {}
            KeepMode::Highest(n) => {
                values.sort_unstable_by(|a, b| b.cmp(a));
                values.truncate(n as usize);
            }
            KeepMode::Lowest(n) => {
                values.sort_unstable();
                values.truncate(n as usize);
            }
        }

        let replacement = if values.len() == 1 {
            values[0].to_string()
        } else {
            let joined: Vec<String> = values.iter().map(i32::to_string).collect();
            format!("({})", joined.join("+"))
        };
        expression = expression.replacen(term.raw.as_str(), &replacement, 1);
        used_values.extend_from_slice(&values);
    }

    let total = evaluate(&expression)?;

    Ok(RollOutcome {
        expression_text: expression,
        total,
        used_values,
        constant: roll.constant,
        complexity: classify(roll),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped(pairs: &[(Die, &[i32])]) -> BTreeMap<Die, Vec<i32>> {
        pairs
            .iter()
            .map(|(die, values)| (*die, values.to_vec()))
            .collect()
    }

    fn run(text: &str, pairs: &[(Die, &[i32])]) -> DiceResult<RollOutcome> {
        let roll = ParsedRoll::parse(text).unwrap();
        reconcile(&roll, &mut grouped(pairs))
    }

    #[test]
    fn single_die_with_constant() {
        let outcome = run("1d20+4", &[(Die::D20, &[13])]).unwrap();
        assert_eq!(outcome.expression_text, "13+4");
        assert_eq!(outcome.total, 17);
        assert_eq!(outcome.used_values, vec![13]);
        assert_eq!(outcome.constant, 4);
    }

    #[test]
    fn keep_highest_takes_the_top_value() {
        let outcome = run("2d20kh1", &[(Die::D20, &[3, 18])]).unwrap();
        assert_eq!(outcome.expression_text, "18");
        assert_eq!(outcome.total, 18);
        assert_eq!(outcome.used_values, vec![18]);
    }

    #[test]
    fn keep_lowest_takes_the_bottom_value() {
        let outcome = run("2d20kl1", &[(Die::D20, &[3, 18])]).unwrap();
        assert_eq!(outcome.total, 3);
    }

    #[test]
    fn keep_two_of_four() {
        let outcome = run("4d6kh2", &[(Die::D6, &[2, 6, 3, 5])]).unwrap();
        assert_eq!(outcome.expression_text, "(6+5)");
        assert_eq!(outcome.total, 11);
        assert_eq!(outcome.used_values, vec![6, 5]);
    }

    #[test]
    fn reroll_replaces_matching_primaries() {
        // doubled to 4 dice: primaries [1, 5], reserves [6, 2];
        // 1 < 3 so it is replaced by 6, 5 stays, reserve 2 is discarded
        let outcome = run("2d6ro<3", &[(Die::D6, &[1, 5, 6, 2])]).unwrap();
        assert_eq!(outcome.expression_text, "(6+5)");
        assert_eq!(outcome.total, 11);
        assert_eq!(outcome.used_values, vec![6, 5]);
    }

    #[test]
    fn reroll_reserves_consumed_in_order() {
        let outcome = run("2d6ro<3", &[(Die::D6, &[1, 2, 6, 4])]).unwrap();
        // both primaries reroll: 1 -> 6, 2 -> 4
        assert_eq!(outcome.used_values, vec![6, 4]);
        assert_eq!(outcome.total, 10);
    }

    #[test]
    fn reroll_keeps_non_matching_primaries() {
        let outcome = run("2d6ro>4", &[(Die::D6, &[1, 3, 6, 2])]).unwrap();
        assert_eq!(outcome.used_values, vec![1, 3]);
    }

    #[test]
    fn multiple_terms_pop_in_order() {
        let outcome = run(
            "2d20kh1+1d4-3",
            &[(Die::D20, &[9, 18]), (Die::D4, &[2])],
        )
        .unwrap();
        assert_eq!(outcome.expression_text, "18+2-3");
        assert_eq!(outcome.total, 17);
        assert_eq!(outcome.used_values, vec![18, 2]);
        assert_eq!(outcome.constant, -3);
    }

    #[test]
    fn same_size_terms_share_one_group() {
        let outcome = run("1d6+1d6", &[(Die::D6, &[4, 2])]).unwrap();
        assert_eq!(outcome.expression_text, "4+2");
        assert_eq!(outcome.used_values, vec![4, 2]);
    }

    #[test]
    fn leading_constant_expression() {
        let outcome = run("1-1d4", &[(Die::D4, &[3])]).unwrap();
        assert_eq!(outcome.expression_text, "1-3");
        assert_eq!(outcome.total, -2);
    }

    #[test]
    fn shortfall_aborts() {
        let err = run("2d20kh1", &[(Die::D20, &[7])]).unwrap_err();
        assert!(matches!(err, DiceError::Reconciliation(_)));
    }

    #[test]
    fn missing_group_aborts() {
        let err = run("1d4+1d6", &[(Die::D4, &[2])]).unwrap_err();
        assert!(matches!(err, DiceError::Reconciliation(_)));
    }

    #[test]
    fn simple_roll_agrees_with_provider_sum() {
        // non-destructive agreement: values + constant == provider total
        let values = [11];
        let outcome = run("1d20+4", &[(Die::D20, &values)]).unwrap();
        let provider_total: i32 = values.iter().sum::<i32>() + 4;
        assert_eq!(outcome.total, provider_total);
    }

    #[test]
    fn group_values_by_die_slices_in_notation_order() {
        let grouped = group_values_by_die("2d20+1d4", &[9, 18, 2]).unwrap();
        assert_eq!(grouped[&Die::D20], vec![9, 18]);
        assert_eq!(grouped[&Die::D4], vec![2]);
    }

    #[test]
    fn group_values_by_die_merges_same_size() {
        let grouped = group_values_by_die("1d6+1d6", &[4, 2]).unwrap();
        assert_eq!(grouped[&Die::D6], vec![4, 2]);
    }

    #[test]
    fn group_values_by_die_rejects_shortfall() {
        assert!(group_values_by_die("2d20", &[7]).is_err());
    }

    #[test]
    fn group_values_ignores_extra_values() {
        let grouped = group_values_by_die("1d20", &[7, 99]).unwrap();
        assert_eq!(grouped[&Die::D20], vec![7]);
    }

    #[test]
    fn end_to_end_with_grouped_notation() {
        // provider groups by size: 4 d6 (doubled reroll) then 1 d4
        let mut grouped = group_values_by_die("4d6+1d4", &[1, 5, 6, 2, 3]).unwrap();
        let roll = ParsedRoll::parse("2d6ro<3+1d4").unwrap();
        let outcome = reconcile(&roll, &mut grouped).unwrap();
        assert_eq!(outcome.expression_text, "(6+5)+3");
        assert_eq!(outcome.total, 14);
        assert_eq!(outcome.used_values, vec![6, 5, 3]);
    }
}

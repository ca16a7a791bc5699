//! Structured die terms: one atomic notation unit like `2d20kh1ro<3`.

use serde::{Deserialize, Serialize};

use crate::die::Die;
use crate::error::{DiceError, DiceResult};
use crate::grammar::{COMPARATOR_TOKENS, digit_run};

/// Comparator used by a reroll rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    /// Strictly less than the threshold.
    Lt,
    /// Less than or equal to the threshold.
    Le,
    /// Strictly greater than the threshold.
    Gt,
    /// Greater than or equal to the threshold.
    Ge,
    /// Equal to the threshold.
    Eq,
}

impl Comparator {
    /// Parse a comparator from its notation spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "=" => Some(Self::Eq),
            _ => None,
        }
    }

    /// Evaluate `value CMP threshold`.
    pub fn matches(self, value: i32, threshold: i32) -> bool {
        match self {
            Self::Lt => value < threshold,
            Self::Le => value <= threshold,
            Self::Gt => value > threshold,
            Self::Ge => value >= threshold,
            Self::Eq => value == threshold,
        }
    }
}

impl std::fmt::Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lt => write!(f, "<"),
            Self::Le => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::Ge => write!(f, ">="),
            Self::Eq => write!(f, "="),
        }
    }
}

/// Which rolled values a term keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeepMode {
    /// Keep every rolled value.
    #[default]
    All,
    /// Keep the highest `n` values (`khN`).
    Highest(u32),
    /// Keep the lowest `n` values (`klN`).
    Lowest(u32),
}

/// Conditional reroll: replace a value matching `CMP threshold` with a
/// reserve die from the shadow pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerollRule {
    /// The comparator applied to each primary value.
    pub comparator: Comparator,
    /// The threshold the comparator tests against.
    pub threshold: i32,
}

/// Most dice a single term may request, before reroll doubling. The
/// provider's tray is filled one selection at a time, so counts above this
/// bound are rejected at parse time.
pub const MAX_TERM_DICE: u32 = 100;

/// One atomic dice term, e.g. `2d20kh1` or `2d6ro<3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieTerm {
    /// The exact notation substring this term was scanned from.
    pub raw: String,
    /// Number of dice written in the notation.
    pub count: u32,
    /// The die to roll.
    pub die: Die,
    /// Keep-highest/lowest modifier, if any.
    pub keep: KeepMode,
    /// Conditional reroll rule, if any.
    pub reroll: Option<RerollRule>,
}

impl DieTerm {
    /// Parse a term substring produced by [`crate::grammar::extract_terms`].
    ///
    /// Validates the invariants the lexical scan cannot: counts of zero or
    /// above [`MAX_TERM_DICE`] and keep modifiers of zero are rejected.
    /// Where several keep modifiers appear, the first wins (the term is
    /// flagged complex downstream).
    pub fn parse(raw: &str) -> DiceResult<Self> {
        let invalid = || DiceError::InvalidExpression(format!("malformed die term '{raw}'"));

        let count_len = digit_run(raw);
        let count: u32 = raw[..count_len].parse().map_err(|_| invalid())?;
        if count == 0 {
            return Err(DiceError::InvalidExpression(format!(
                "die term '{raw}' rolls zero dice"
            )));
        }
        if count > MAX_TERM_DICE {
            return Err(DiceError::InvalidExpression(format!(
                "die term '{raw}' rolls more than {MAX_TERM_DICE} dice"
            )));
        }

        let rest = raw[count_len..].strip_prefix('d').ok_or_else(invalid)?;
        let size_len = digit_run(rest);
        let sides: u32 = rest[..size_len].parse().map_err(|_| invalid())?;
        let die = Die::from_sides(sides)?;

        let mut keep = KeepMode::All;
        let mut reroll = None;
        let mut modifiers = &rest[size_len..];
        while !modifiers.is_empty() {
            if let Some(after) = modifiers
                .strip_prefix("kh")
                .or_else(|| modifiers.strip_prefix("kl"))
            {
                let digits = digit_run(after);
                let n: u32 = after[..digits].parse().map_err(|_| invalid())?;
                if n == 0 {
                    return Err(DiceError::InvalidExpression(format!(
                        "die term '{raw}' keeps zero dice"
                    )));
                }
                if keep == KeepMode::All {
                    keep = if modifiers.starts_with("kh") {
                        KeepMode::Highest(n)
                    } else {
                        KeepMode::Lowest(n)
                    };
                }
                modifiers = &after[digits..];
            } else if let Some(after) = modifiers.strip_prefix("ro") {
                let token = COMPARATOR_TOKENS
                    .iter()
                    .find(|t| after.starts_with(*t))
                    .ok_or_else(invalid)?;
                let comparator = Comparator::parse(token).ok_or_else(invalid)?;
                let after_cmp = &after[token.len()..];
                let digits = digit_run(after_cmp);
                let threshold: i32 = after_cmp[..digits].parse().map_err(|_| invalid())?;
                if reroll.is_none() {
                    reroll = Some(RerollRule {
                        comparator,
                        threshold,
                    });
                }
                modifiers = &after_cmp[digits..];
            } else {
                return Err(invalid());
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            count,
            die,
            keep,
            reroll,
        })
    }

    /// How many dice this term actually requests from the provider.
    ///
    /// A reroll rule doubles the count: the provider cannot reroll after the
    /// fact, so a shadow die is reserved up front for every primary die.
    pub fn rolled_count(&self) -> u32 {
        if self.reroll.is_some() {
            self.count * 2
        } else {
            self.count
        }
    }
}

//! Dice-notation engine for Rollweaver.
//!
//! Parses a compact dice notation (counts, die sizes, keep-highest/lowest,
//! conditional reroll, arithmetic constants), classifies whether the
//! external roll provider can be trusted to render a roll, and reconciles
//! the provider's flat value stream back into per-term results with the
//! modifiers the provider does not understand applied locally.

pub mod classify;
pub mod die;
pub mod error;
pub mod eval;
pub mod grammar;
pub mod parser;
pub mod reconcile;
pub mod term;

pub use classify::{Complexity, classify};
pub use die::Die;
pub use error::{DiceError, DiceResult};
pub use parser::ParsedRoll;
pub use reconcile::{RollOutcome, group_values_by_die, reconcile};
pub use term::{Comparator, DieTerm, KeepMode, MAX_TERM_DICE, RerollRule};

//! Stat-modifier tokens inside dice expressions.
//!
//! Slash commands may reference ability modifiers and proficiency by name
//! (`/hit 1d20+str+pb`). The values live on the host's character sheet, so
//! substitution is abstracted behind [`ModifierSource`]; without a sheet
//! the expression is left untouched and parsing will reject the tokens.

/// Stat tokens recognized inside an expression, in scan order.
pub const STAT_TOKENS: [&str; 7] = ["str", "dex", "con", "int", "wis", "cha", "pb"];

/// A snapshot of the ability modifiers and proficiency bonus of whoever is
/// rolling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatModifiers {
    /// Strength modifier.
    pub strength: i32,
    /// Dexterity modifier.
    pub dexterity: i32,
    /// Constitution modifier.
    pub constitution: i32,
    /// Intelligence modifier.
    pub intelligence: i32,
    /// Wisdom modifier.
    pub wisdom: i32,
    /// Charisma modifier.
    pub charisma: i32,
    /// Proficiency bonus.
    pub proficiency: i32,
}

impl StatModifiers {
    /// The value behind a stat token, or `None` for unknown tokens.
    pub fn value_of(&self, token: &str) -> Option<i32> {
        match token {
            "str" => Some(self.strength),
            "dex" => Some(self.dexterity),
            "con" => Some(self.constitution),
            "int" => Some(self.intelligence),
            "wis" => Some(self.wisdom),
            "cha" => Some(self.charisma),
            "pb" => Some(self.proficiency),
            _ => None,
        }
    }
}

/// Where stat modifiers come from. `None` means no sheet is available and
/// no substitution happens.
pub trait ModifierSource {
    /// The current modifiers, if a sheet is selected.
    fn modifiers(&self) -> Option<StatModifiers>;
}

impl ModifierSource for StatModifiers {
    fn modifiers(&self) -> Option<StatModifiers> {
        Some(*self)
    }
}

/// A source with no sheet behind it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSheet;

impl ModifierSource for NoSheet {
    fn modifiers(&self) -> Option<StatModifiers> {
        None
    }
}

/// Replace stat tokens with their numeric values, left to right.
///
/// A token only counts when it stands alone as a word and the text before
/// it ends in a `+` or `-` (whitespace-padded or not). The first
/// stand-alone token without such a prefix stops substitution for the rest
/// of the expression, so prose that happens to contain `int` or `str` is
/// left alone.
pub fn substitute(expression: &str, modifiers: &StatModifiers) -> String {
    let lower = expression.to_ascii_lowercase();
    let mut out = String::with_capacity(expression.len());
    let mut at = 0;

    while at < lower.len() {
        match stat_token_at(&lower, at) {
            Some(token) => {
                let trimmed = out.trim_end();
                if !(trimmed.ends_with('+') || trimmed.ends_with('-')) {
                    out.push_str(&expression[at..]);
                    break;
                }
                // value_of cannot fail for a scanned token
                let value = modifiers.value_of(token).unwrap_or(0);
                out.push_str(&value.to_string());
                at += token.len();
            }
            None => {
                let c = expression[at..].chars().next().map_or(' ', |c| c);
                out.push(c);
                at += c.len_utf8();
            }
        }
    }
    out
}

/// The stat token starting at byte `at` of the lowercased text, when it is
/// bounded by non-alphanumeric characters on both sides.
fn stat_token_at(lower: &str, at: usize) -> Option<&'static str> {
    let token = STAT_TOKENS
        .iter()
        .find(|token| lower[at..].starts_with(*token))?;

    let before_is_word = lower[..at]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_alphanumeric());
    let after_is_word = lower[at + token.len()..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric());
    if before_is_word || after_is_word {
        return None;
    }
    Some(token)
}

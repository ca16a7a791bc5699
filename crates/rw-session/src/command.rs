//! Slash commands: the chat-box entry point for rolls.
//!
//! `/hit 1d20+str+pb Rapier` rolls an attack labeled "Rapier". The command
//! word picks a default roll type; the generic `/r` and `/roll` accept an
//! explicit one after a `:` in the label.

use rw_dice::ParsedRoll;

use crate::error::{SessionError, SessionResult};
use crate::metadata::{RollMetadata, RollType};
use crate::modifiers::{ModifierSource, substitute};

/// Command words and the roll type each implies.
const COMMANDS: [(&str, Option<RollType>); 7] = [
    ("r", None),
    ("roll", None),
    ("save", Some(RollType::Save)),
    ("hit", Some(RollType::ToHit)),
    ("dmg", Some(RollType::Damage)),
    ("skill", Some(RollType::Check)),
    ("heal", Some(RollType::Heal)),
];

/// A parsed slash command, before stat substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommand {
    /// The dice expression, possibly containing stat tokens.
    pub expression: String,
    /// Roll type implied by the command word or spelled out in the label.
    pub roll_type: Option<RollType>,
    /// Free-text action label shown in the game log.
    pub label: Option<String>,
}

impl SlashCommand {
    /// Parse a chat line of the form `/cmd expression [label[:rollType]]`.
    ///
    /// The expression is the longest leading run of words made of dice
    /// notation and stat tokens; everything after it is the label. Only
    /// `/r` and `/roll` honor the `label:rollType` form, since the other
    /// commands already carry their type.
    pub fn parse(text: &str) -> SessionResult<Self> {
        let text = text.trim();
        let body = text.strip_prefix('/').ok_or_else(|| {
            SessionError::InvalidCommand(format!("'{text}' does not start with '/'"))
        })?;

        let (word, rest) = match body.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (body, ""),
        };
        let word = word.to_lowercase();
        let (_, implied_type) = COMMANDS
            .iter()
            .find(|(name, _)| *name == word)
            .ok_or_else(|| SessionError::InvalidCommand(format!("unknown command '/{word}'")))?;

        let (expression, remainder) = split_expression(rest);
        if expression.is_empty() {
            return Err(SessionError::InvalidCommand(format!(
                "'/{word}' is missing a dice expression"
            )));
        }

        let mut roll_type = *implied_type;
        let label = match remainder {
            "" => None,
            remainder if roll_type.is_none() => {
                // "/r 1d20 Stealth:check" carries its type in the label
                match remainder.split_once(':') {
                    Some((label, type_text)) => {
                        roll_type = RollType::parse(type_text);
                        non_empty(label)
                    }
                    None => non_empty(remainder),
                }
            }
            remainder => non_empty(remainder),
        };

        Ok(Self {
            expression,
            roll_type,
            label,
        })
    }

    /// Substitute stat tokens from `source` and parse the expression,
    /// yielding the roll and its metadata.
    pub fn resolve(
        &self,
        source: &impl ModifierSource,
    ) -> SessionResult<(ParsedRoll, RollMetadata)> {
        let expression = match source.modifiers() {
            Some(modifiers) => substitute(&self.expression, &modifiers),
            None => self.expression.clone(),
        };
        let roll = ParsedRoll::parse(&expression)?;

        let mut metadata = RollMetadata::new();
        if let Some(label) = &self.label {
            metadata.set_action(label);
        }
        metadata.roll_type = self.roll_type;
        Ok((roll, metadata))
    }
}

/// Split `rest` into the leading expression and the free-text remainder.
fn split_expression(rest: &str) -> (String, &str) {
    let rest = rest.trim_start();
    let mut end = 0;
    let mut pos = 0;
    while pos < rest.len() {
        let tail = rest[pos..].trim_start();
        let word_start = rest.len() - tail.len();
        let word_len = tail
            .find(char::is_whitespace)
            .unwrap_or(tail.len());
        if word_len == 0 || !is_expression_word(&tail[..word_len]) {
            break;
        }
        end = word_start + word_len;
        pos = end;
    }
    (
        rest[..end].trim_end().to_string(),
        rest[end..].trim_start(),
    )
}

/// Trim `s`, mapping whitespace-only labels to `None`.
fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// True when `word` consists only of dice notation and stat tokens.
fn is_expression_word(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    let mut at = 0;
    while at < lower.len() {
        if let Some(token) = leading_stat_token(&lower[at..]) {
            let next_is_word = lower[at + token.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric());
            if !next_is_word {
                at += token.len();
                continue;
            }
        }
        let Some(c) = lower[at..].chars().next() else {
            break;
        };
        if !is_notation_char(c) {
            return false;
        }
        at += c.len_utf8();
    }
    true
}

fn leading_stat_token(s: &str) -> Option<&'static str> {
    crate::modifiers::STAT_TOKENS
        .iter()
        .find(|token| s.starts_with(*token))
        .copied()
}

fn is_notation_char(c: char) -> bool {
    c.is_ascii_digit()
        || matches!(
            c,
            'd' | 'k' | 'h' | 'l' | 'r' | 'o' | '<' | '=' | '>' | '+' | '-' | '(' | ')'
        )
}

//! Lexical scanning of dice notation.
//!
//! This module only recognizes text. It never evaluates values; parsing
//! scanned terms into structured form lives in [`crate::term`].

/// Comparator spellings accepted by a reroll modifier, longest first so
/// `ro<=2` is not cut short at `ro<`.
pub(crate) const COMPARATOR_TOKENS: [&str; 5] = ["<=", ">=", "<", ">", "="];

/// Supported die-size literals, largest first so `1d100` is not read as
/// `1d10` followed by a stray `0`.
const SIZE_TOKENS: [&str; 7] = ["100", "20", "12", "10", "8", "6", "4"];

/// Returns true when `text` contains only characters from the dice-notation
/// alphabet: digits, `d k h l r o`, comparators, signs, parentheses, and
/// whitespace. Anything else (letters, semicolons, ...) is rejected before
/// any further processing.
pub fn is_valid_character_set(text: &str) -> bool {
    text.chars().all(|c| {
        c.is_ascii_digit()
            || c.is_whitespace()
            || matches!(
                c,
                'd' | 'k' | 'h' | 'l' | 'r' | 'o' | '<' | '=' | '>' | '+' | '-' | '(' | ')'
            )
    })
}

/// Find all maximal die-term substrings in left-to-right order.
///
/// A term is `N "d" SIZE` followed by any run of `khN`, `klN`, or
/// `ro CMP N` modifiers, with SIZE drawn from the supported die sizes.
/// Matches are greedy and non-overlapping; text between terms is skipped.
/// Returns an empty vector when no term is present.
pub fn extract_terms(text: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    let mut at = 0;
    while at < text.len() {
        match match_term(&text[at..]) {
            Some(len) => {
                terms.push(&text[at..at + len]);
                at += len;
            }
            None => {
                // advance one character, staying on a char boundary
                at += text[at..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    terms
}

/// Length of the die term starting at the beginning of `s`, if any.
fn match_term(s: &str) -> Option<usize> {
    let count_len = digit_run(s);
    if count_len == 0 {
        return None;
    }
    let rest = &s[count_len..];
    if !rest.starts_with('d') {
        return None;
    }
    let size_len = match_die_size(&rest[1..])?;
    let mut len = count_len + 1 + size_len;

    // greedily consume keep/reroll modifiers
    while let Some(modifier_len) = match_modifier(&s[len..]) {
        len += modifier_len;
    }
    Some(len)
}

/// Length of a supported die-size literal at the beginning of `s`, if any.
fn match_die_size(s: &str) -> Option<usize> {
    SIZE_TOKENS
        .iter()
        .find(|literal| s.starts_with(*literal))
        .map(|literal| literal.len())
}

/// Length of a `khN`, `klN`, or `ro CMP N` modifier at the start of `s`.
fn match_modifier(s: &str) -> Option<usize> {
    if s.starts_with("kh") || s.starts_with("kl") {
        let digits = digit_run(&s[2..]);
        if digits > 0 {
            return Some(2 + digits);
        }
        return None;
    }
    if let Some(after_ro) = s.strip_prefix("ro") {
        let cmp = COMPARATOR_TOKENS
            .iter()
            .find(|token| after_ro.starts_with(*token))?;
        let digits = digit_run(&after_ro[cmp.len()..]);
        if digits > 0 {
            return Some(2 + cmp.len() + digits);
        }
    }
    None
}

/// Number of leading ASCII digits in `s`.
pub(crate) fn digit_run(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

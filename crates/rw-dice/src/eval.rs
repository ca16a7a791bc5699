//! Restricted arithmetic evaluation for substituted expressions.
//!
//! After reconciliation the expression contains only integers, `+`/`-`
//! operators, and single-level parenthesized `+`-joined sums, e.g.
//! `(18+2)-3` or `1-(6+5)`. This evaluator accepts exactly that grammar
//! and nothing else; its input ultimately derives from intercepted channel
//! traffic.

use crate::error::{DiceError, DiceResult};
use crate::grammar::digit_run;

/// Evaluate `[-] item (('+'|'-') item)*` where `item` is an integer or a
/// parenthesized `+`-joined sum of integers.
pub fn evaluate(text: &str) -> DiceResult<i32> {
    let reject = |reason: &str| DiceError::Reconciliation(format!("cannot evaluate '{text}': {reason}"));

    let bytes = text.as_bytes();
    let mut at = 0;
    let mut total = 0i32;
    let mut sign = 1i32;

    if bytes.first() == Some(&b'-') {
        sign = -1;
        at = 1;
    } else if bytes.first() == Some(&b'+') {
        at = 1;
    }

    loop {
        let (item, len) = parse_item(&text[at..]).ok_or_else(|| reject("expected a number"))?;
        total += sign * item;
        at += len;

        match bytes.get(at) {
            None => return Ok(total),
            Some(b'+') => sign = 1,
            Some(b'-') => sign = -1,
            Some(_) => return Err(reject("unexpected character")),
        }
        at += 1;
    }
}

/// Parse an integer or a parenthesized `+`-joined sum at the start of `s`.
/// Returns the value and the number of bytes consumed.
fn parse_item(s: &str) -> Option<(i32, usize)> {
    if let Some(inner) = s.strip_prefix('(') {
        let mut at = 0;
        let mut sum = 0i32;
        loop {
            let digits = digit_run(&inner[at..]);
            if digits == 0 {
                return None;
            }
            sum += inner[at..at + digits].parse::<i32>().ok()?;
            at += digits;
            match inner.as_bytes().get(at) {
                Some(b'+') => at += 1,
                Some(b')') => return Some((sum, at + 2)),
                _ => return None,
            }
        }
    }

    let digits = digit_run(s);
    if digits == 0 {
        return None;
    }
    let value = s[..digits].parse::<i32>().ok()?;
    Some((value, digits))
}

//! Built-in rules seeded into every fresh registry
//!
//! | name       | checks |
//! |------------|--------|
//! | `required` | value is not the zero value of its kind (records always pass) |
//! | `len`      | character count, element count or numeric value equals `param` |
//! | `min`      | same measures, at least `param` |
//! | `max`      | same measures, at most `param` |
//! | `email`    | string looks like an e-mail address |
//! | `regexp`   | string matches the pattern in `param` |
//! | `inList`   | string form of the value differs from `param` (`"Unknown"` when empty) |
//!
//! Absent values pass every rule except `required`.
//!
//! Copyright (c) 2025 Fieldrules Team
//! Licensed under the Apache-2.0 license

use std::cmp::Ordering;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::{Outcome, Rule};
use crate::value::Value;

pub const REQUIRED: &str = "required";
pub const LEN: &str = "len";
pub const MIN: &str = "min";
pub const MAX: &str = "max";
pub const EMAIL: &str = "email";
pub const REGEXP: &str = "regexp";
pub const IN_LIST: &str = "inList";

/// Comparison value used by `inList` when no parameter is given
pub const IN_LIST_DEFAULT: &str = "Unknown";

/// Every built-in rule with its registry name
pub fn all() -> Vec<(&'static str, Arc<dyn Rule>)> {
    fn entry<R: Rule + 'static>(name: &'static str, rule: R) -> (&'static str, Arc<dyn Rule>) {
        (name, Arc::new(rule))
    }

    vec![
        entry(REQUIRED, required),
        entry(LEN, length),
        entry(MIN, min),
        entry(MAX, max),
        entry(EMAIL, email),
        entry(REGEXP, regexp),
        entry(IN_LIST, in_list),
    ]
}

pub fn required(value: &Value<'_>, _param: &str) -> Outcome {
    let present = match value {
        Value::Absent => false,
        Value::Bool(b) => *b,
        Value::Int(n) => *n != 0,
        Value::Uint(n) => *n != 0,
        Value::Float(x) => *x != 0.0,
        Value::Str(s) => !s.is_empty(),
        Value::Seq(items) => !items.is_empty(),
        Value::Map(entries) => !entries.is_empty(),
        Value::Record(_) => true,
    };
    Outcome::from_bool(present)
}

pub fn length(value: &Value<'_>, param: &str) -> Outcome {
    measure(value, param, Bound::Exact)
}

pub fn min(value: &Value<'_>, param: &str) -> Outcome {
    measure(value, param, Bound::AtLeast)
}

pub fn max(value: &Value<'_>, param: &str) -> Outcome {
    measure(value, param, Bound::AtMost)
}

pub fn email(value: &Value<'_>, _param: &str) -> Outcome {
    match value {
        Value::Absent => Outcome::Valid,
        Value::Str(s) => Outcome::from_bool(email_pattern().is_match(s)),
        _ => Outcome::Unsupported,
    }
}

pub fn regexp(value: &Value<'_>, param: &str) -> Outcome {
    match value {
        Value::Absent => Outcome::Valid,
        Value::Str(s) => match Regex::new(param) {
            Ok(pattern) => Outcome::from_bool(pattern.is_match(s)),
            Err(_) => Outcome::BadParameter,
        },
        _ => Outcome::Unsupported,
    }
}

/// Fails when the value's string form equals `param`
///
/// This is an exclusion check: `inList=Unknown` rejects the literal
/// `Unknown` and accepts everything else.
pub fn in_list(value: &Value<'_>, param: &str) -> Outcome {
    let rejected = if param.is_empty() {
        IN_LIST_DEFAULT
    } else {
        param
    };
    Outcome::from_bool(value.to_string() != rejected)
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Exact,
    AtLeast,
    AtMost,
}

impl Bound {
    /// `None` means the operands are unordered (NaN), which only fails `Exact`
    fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Bound::Exact, Some(o)) => o == Ordering::Equal,
            (Bound::AtLeast, Some(o)) => o != Ordering::Less,
            (Bound::AtMost, Some(o)) => o != Ordering::Greater,
            (Bound::Exact, None) => false,
            (_, None) => true,
        }
    }
}

fn measure(value: &Value<'_>, param: &str, bound: Bound) -> Outcome {
    let ordering = match value {
        Value::Absent => return Outcome::Valid,
        Value::Str(s) => compare_count(s.chars().count(), param),
        Value::Seq(items) => compare_count(items.len(), param),
        Value::Map(entries) => compare_count(entries.len(), param),
        Value::Int(n) => parse_int(param).map(|p| Some(n.cmp(&p))),
        Value::Uint(n) => parse_uint(param).map(|p| Some(n.cmp(&p))),
        Value::Float(x) => param.parse::<f64>().ok().map(|p| x.partial_cmp(&p)),
        Value::Bool(_) | Value::Record(_) => return Outcome::Unsupported,
    };
    match ordering {
        Some(ordering) => Outcome::from_bool(bound.holds(ordering)),
        None => Outcome::BadParameter,
    }
}

fn compare_count(count: usize, param: &str) -> Option<Option<Ordering>> {
    let expected = parse_int(param)?;
    Some(Some((count as i128).cmp(&i128::from(expected))))
}

/// Parse an integer literal with an optional sign and base prefix
/// (`0x`, `0o`, `0b`, or a leading `0` for octal)
pub fn parse_int(literal: &str) -> Option<i64> {
    let (negative, digits) = match literal.as_bytes().first()? {
        b'-' => (true, &literal[1..]),
        b'+' => (false, &literal[1..]),
        _ => (false, literal),
    };
    let magnitude = parse_uint(digits)?;
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

/// Parse an unsigned integer literal with an optional base prefix
pub fn parse_uint(literal: &str) -> Option<u64> {
    let (radix, digits) = split_radix(literal);
    let digits = if radix == 10 {
        digits.to_string()
    } else {
        // underscores are only allowed alongside a base prefix
        digits.replace('_', "")
    };
    if digits.is_empty() || digits.starts_with(|c| c == '+' || c == '-') {
        return None;
    }
    u64::from_str_radix(&digits, radix).ok()
}

fn split_radix(literal: &str) -> (u32, &str) {
    let bytes = literal.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return (10, literal);
    }
    match bytes[1] {
        b'x' | b'X' => (16, &literal[2..]),
        b'o' | b'O' => (8, &literal[2..]),
        b'b' | b'B' => (2, &literal[2..]),
        _ => (8, &literal[1..]),
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}-]+",
            r"(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}-]+)*",
            r"@(?:[a-zA-Z0-9\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]",
            r"(?:[a-zA-Z0-9._~\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}-]*",
            r"[a-zA-Z0-9\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}])?\.)+",
            r"[a-zA-Z\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]",
            r"(?:[a-zA-Z0-9._~\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}-]*",
            r"[a-zA-Z\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}])?\.?$",
        ))
        .expect("e-mail pattern compiles")
    })
}

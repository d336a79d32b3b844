//! # Numeric Coercion
//!
//! Transport layers deliver query strings, headers and path params as
//! strings. When a schema asks for it, those strings are coerced to JSON
//! numbers here.
//!
//! Parsing is lenient and prefix-based: leading whitespace is skipped
//! and the longest numeric prefix wins, so `"42px"` coerces to `42`.
//! Integer coercion stops at the first non-digit (`"3.7"` -> `3`).
//!
//! ## Soft failure
//!
//! Input with no numeric prefix, or one that overflows to a non-finite
//! float, does not coerce: [`coerce_numeric`] returns `None` and the
//! caller keeps the original value. It reaches the validator unchanged
//! and is rejected there by the declared numeric type. `null` is never
//! produced, so a nullable numeric field cannot absorb bad input.

use serde_json::{Number, Value};

/// Largest integer magnitude an `f64` represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// The numeric flavor a schema leaf declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    /// `type: number`.
    Float,
    /// `type: integer`.
    Integer,
}

/// Coerce `value` to a JSON number of the requested kind, or `None` if
/// it has no numeric reading.
pub fn coerce_numeric(value: &Value, kind: NumericKind) -> Option<Value> {
    let parsed = match value {
        Value::Number(n) => n.as_f64().map(|f| match kind {
            NumericKind::Float => f,
            NumericKind::Integer => f.trunc(),
        }),
        Value::String(s) => match kind {
            NumericKind::Float => parse_float_prefix(s),
            NumericKind::Integer => parse_integer_prefix(s),
        },
        _ => None,
    };
    parsed.and_then(number_value)
}

/// Render an `f64` as a JSON number, preferring the integer form for
/// integral values in the exactly-representable range.
fn number_value(f: f64) -> Option<Value> {
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        return Some(Value::Number(Number::from(f as i64)));
    }
    Number::from_f64(f).map(Value::Number)
}

/// Index just past a run of ASCII digits starting at `from`.
fn digits_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |n| from + n)
}

/// Index just past an optional leading `+` or `-` at `from`.
fn sign_end(bytes: &[u8], from: usize) -> usize {
    match bytes.get(from) {
        Some(b'+' | b'-') => from + 1,
        _ => from,
    }
}

fn parse_float_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();

    let int_start = sign_end(bytes, 0);
    let int_end = digits_end(bytes, int_start);
    let mut end = int_end;
    let mut has_digits = int_end > int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_end(bytes, end + 1);
        if frac_end > end + 1 || has_digits {
            has_digits |= frac_end > end + 1;
            end = frac_end;
        }
    }
    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_start = sign_end(bytes, end + 1);
        let exp_end = digits_end(bytes, exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn parse_integer_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();

    let digits_start = sign_end(bytes, 0);
    let end = digits_end(bytes, digits_start);
    if end == digits_start {
        return None;
    }
    s[..end].parse::<f64>().ok()
}

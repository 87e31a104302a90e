//! Loosely-typed attribute values.
//!
//! Records store raw values exactly as a backend or a form hands them over,
//! so the runtime representation is [`serde_json::Value`]. An attribute that
//! was never assigned is modelled as `None` (an *absent* value), which is
//! distinct from an explicit `Value::Null`.
//!
//! The helpers in this module give those values the loose semantics the
//! validators and formatters rely on:
//!
//! | Helper | Meaning |
//! |--------|---------|
//! | [`is_truthy`] | `false` for absent, `null`, `false`, `0`, `""` |
//! | [`display`] | Text form used in messages, lookups and unit suffixes |
//! | [`to_number`] | Numeric coercion (`NaN` when impossible) |
//! | [`loose_eq`] / [`strict_eq`] | `==` / `===` equality |
//! | [`loose_cmp`] | Ordering for `<`, `<=`, `>`, `>=` |

use std::cmp::Ordering;

use serde_json::{Number, Value};

/// Check whether a value counts as "set".
///
/// - absent, `null`, `false`: falsy
/// - numbers: falsy only when zero
/// - strings: falsy only when empty
/// - arrays and objects: always truthy (emptiness is a separate check)
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Render a value as text.
///
/// Absent values render as `"undefined"`, arrays join their elements with
/// commas and objects collapse to `"[object Object]"`.
pub fn display(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => number_text(n),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// Text form of a JSON number: whole numbers print without a fraction.
pub fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    float_text(n.as_f64().unwrap_or(f64::NAN))
}

/// Text form of a float: `3.0` prints as `"3"`, `2.5` as `"2.5"`.
pub fn float_text(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{:.0}", f)
    } else {
        f.to_string()
    }
}

/// Fixed-point text with `digits` decimals, rounding exact ties away from
/// zero (`2.5` -> `"3"`, `0.125` at 2 digits -> `"0.13"`).
///
/// Rounding works on the exact binary value, so `2.675` (stored slightly
/// below the tie) still renders as `"2.67"`.
pub fn fixed_text(f: f64, digits: usize) -> String {
    // -0 renders without a sign
    let f = if f == 0.0 { 0.0 } else { f };
    if !f.is_finite() || fraction_digits(f.abs()) != digits + 1 {
        return format!("{:.*}", digits, f);
    }

    // Exact tie: the full expansion has one more digit than requested, and
    // that digit is a 5. Drop it and round the rest up by one unit.
    let exact = format!("{:.*}", digits + 1, f.abs());
    let mut chars: Vec<char> = exact.chars().collect();
    chars.pop();
    if chars.last() == Some(&'.') {
        chars.pop();
    }

    let mut index = chars.len();
    loop {
        if index == 0 {
            chars.insert(0, '1');
            break;
        }
        index -= 1;
        match chars[index] {
            '.' => continue,
            '9' => chars[index] = '0',
            digit => {
                chars[index] = char::from(digit as u8 + 1);
                break;
            }
        }
    }

    let sign = if f < 0.0 { "-" } else { "" };
    format!("{}{}", sign, chars.into_iter().collect::<String>())
}

/// Number of decimal digits after the point in the exact expansion of a
/// finite, non-negative float.
fn fraction_digits(f: f64) -> usize {
    let bits = f.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let mut mantissa = bits & 0x000f_ffff_ffff_ffff;
    let mut exponent = if biased == 0 {
        -1074
    } else {
        mantissa |= 1 << 52;
        biased - 1075
    };
    if mantissa == 0 {
        return 0;
    }
    exponent += mantissa.trailing_zeros() as i32;
    if exponent >= 0 {
        0
    } else {
        (-exponent) as usize
    }
}

/// Build a JSON value from a float.
///
/// Whole numbers become integers; `NaN` and infinities have no JSON form and
/// become `null`.
pub fn number_value(f: f64) -> Value {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
        Value::from(f as i64)
    } else {
        Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Get the number if the value is a finite JSON number.
pub fn as_finite(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Check whether the value is a JSON number without a fractional part.
pub fn is_whole_number(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Number(n)) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

/// Coerce a value to a number.
///
/// Returns `NaN` when no numeric reading exists (absent values, objects,
/// non-numeric text).
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => text_to_number(s),
        Some(v @ Value::Array(_)) => text_to_number(&display(Some(v))),
        Some(Value::Object(_)) => f64::NAN,
    }
}

fn text_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

/// Parse the leading integer of a text, ignoring anything after it.
///
/// `"12.7px"` parses as `12`; text without leading digits yields `None`.
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = split_sign(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(sign * magnitude)
}

/// Parse the leading decimal number of a text, ignoring anything after it.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let (sign, rest) = split_sign(trimmed);
    if rest.starts_with("Infinity") {
        return Some(sign as f64 * f64::INFINITY);
    }

    let bytes = rest.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }

    // Optional exponent, only consumed when well-formed.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    let magnitude: f64 = rest[..end].parse().ok()?;
    Some(sign as f64 * magnitude)
}

fn split_sign(text: &str) -> (i64, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (-1, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (1, rest)
    } else {
        (1, text)
    }
}

/// Strict (`===`) equality: same kind and same content.
///
/// Numbers compare by numeric value, so `1` and `1.0` are equal.
pub fn strict_eq(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x.as_f64() == y.as_f64(),
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Loose (`==`) equality.
///
/// - absent and `null` are equal to each other and to nothing else
/// - a number or boolean against a primitive compares numerically
/// - an array or object against a primitive compares through its text form
pub fn loose_eq(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => true,
        (None | Some(Value::Null), _) | (_, None | Some(Value::Null)) => false,
        (Some(Value::String(x)), Some(Value::String(y))) => x == y,
        (Some(x @ (Value::Array(_) | Value::Object(_))), Some(y @ (Value::Array(_) | Value::Object(_)))) => {
            x == y
        }
        (Some(x @ (Value::Array(_) | Value::Object(_))), Some(other)) => {
            loose_eq(Some(&Value::String(display(Some(x)))), Some(other))
        }
        (Some(other), Some(y @ (Value::Array(_) | Value::Object(_)))) => {
            loose_eq(Some(other), Some(&Value::String(display(Some(y)))))
        }
        (x, y) => {
            let (l, r) = (to_number(x), to_number(y));
            !l.is_nan() && !r.is_nan() && l == r
        }
    }
}

/// Ordering used by the relational operators.
///
/// Two strings compare lexicographically; anything else compares
/// numerically. `None` means the values are unordered (a `NaN` was involved),
/// in which case every relational operator is false.
pub fn loose_cmp(a: Option<&Value>, b: Option<&Value>) -> Option<Ordering> {
    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => Some(x.cmp(y)),
        _ => to_number(a).partial_cmp(&to_number(b)),
    }
}

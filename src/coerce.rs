//! Lenient readers for loosely-typed JSON fields.
//!
//! The storefront sends ids and money either as JSON numbers or as strings.
//! Strings are read up to their first non-numeric character, so `"12abc"`
//! is 12, while a string with no leading number is rejected.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoerceError {
    #[error("field `{0}` is required")]
    Missing(&'static str),

    #[error("field `{field}` is not a valid integer: {value}")]
    NotAnInteger { field: &'static str, value: String },

    #[error("field `{field}` is not a valid number: {value}")]
    NotANumber { field: &'static str, value: String },

    #[error("field `{field}` must be a string: {value}")]
    NotText { field: &'static str, value: String },

    #[error("field `{0}` must be an array")]
    NotAnArray(&'static str),
}

/// Loose truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy, arrays and
/// objects are always truthy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Integer from a number (fractional part truncated) or a string's leading integer.
pub fn int_field(field: &'static str, value: Option<&Value>) -> Result<i32, CoerceError> {
    let invalid = |v: &Value| CoerceError::NotAnInteger {
        field,
        value: v.to_string(),
    };
    match value {
        None | Some(Value::Null) => Err(CoerceError::Missing(field)),
        Some(v @ Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i32::try_from(i).map_err(|_| invalid(v))
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(f64::trunc)
                    .filter(|f| *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
                    .map(|f| f as i32)
                    .ok_or_else(|| invalid(v))
            }
        }
        Some(v @ Value::String(s)) => leading_int(s).ok_or_else(|| invalid(v)),
        Some(v) => Err(invalid(v)),
    }
}

/// Finite float from a number or a string's leading decimal.
pub fn float_field(field: &'static str, value: Option<&Value>) -> Result<f64, CoerceError> {
    let invalid = |v: &Value| CoerceError::NotANumber {
        field,
        value: v.to_string(),
    };
    match value {
        None | Some(Value::Null) => Err(CoerceError::Missing(field)),
        Some(v @ Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()).ok_or_else(|| invalid(v)),
        Some(v @ Value::String(s)) => leading_float(s).ok_or_else(|| invalid(v)),
        Some(v) => Err(invalid(v)),
    }
}

/// Optional text; `null` and absence both read as `None`.
pub fn text_field(field: &'static str, value: Option<&Value>) -> Result<Option<String>, CoerceError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(v) => Err(CoerceError::NotText {
            field,
            value: v.to_string(),
        }),
    }
}

pub fn array_field<'a>(
    field: &'static str,
    value: Option<&'a Value>,
) -> Result<&'a [Value], CoerceError> {
    match value {
        Some(Value::Array(items)) => Ok(items.as_slice()),
        None | Some(Value::Null) => Err(CoerceError::Missing(field)),
        Some(_) => Err(CoerceError::NotAnArray(field)),
    }
}

fn digits_at(bytes: &[u8], from: usize) -> usize {
    bytes
        .get(from..)
        .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
}

fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

/// Optionally signed digits at the start of `s`, after leading whitespace.
fn leading_int(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let sign = sign_len(bytes);
    let digits = digits_at(bytes, sign);
    if digits == 0 {
        return None;
    }
    s[..sign + digits].parse::<i32>().ok()
}

/// Longest decimal literal (with optional fraction and exponent) at the start of `s`.
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = sign_len(bytes);

    let int_digits = digits_at(bytes, end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_at(bytes, end + 1);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits_at(bytes, exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|f| f.is_finite())
}

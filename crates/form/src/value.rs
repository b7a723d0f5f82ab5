//! Helpers for treating loosely-typed form values uniformly
//!
//! Form data arrives as whatever the request decoder produced, so every
//! string filter and validator works on a single textual representation of
//! the current value.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

/// Longest leading numeric literal, in the spirit of a lenient `parseFloat`.
static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("float prefix pattern is valid")
});

/// Returns the textual representation used by string operations.
///
/// - strings are returned as-is
/// - numbers use their shortest decimal form
/// - booleans become `"true"` / `"false"`
/// - `null` becomes the empty string
/// - arrays join their elements' representations with `,`
/// - objects become compact JSON
pub fn as_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(items) => Cow::Owned(
            items
                .iter()
                .map(|item| as_text(item).into_owned())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

/// Returns true for `""`, `null` and `[]`.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Returns true for arrays and objects.
pub fn is_compound(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Parses the leading number of the value's text, ignoring leading
/// whitespace and any trailing garbage.
///
/// Numbers pass through unchanged. Returns `None` when there is no numeric
/// prefix.
pub fn leading_float(value: &Value) -> Option<f64> {
    if let Value::Number(n) = value {
        return n.as_f64();
    }
    let text = as_text(value);
    let found = FLOAT_PREFIX.find(text.trim_start())?;
    found.as_str().parse::<f64>().ok()
}

/// Converts a float to a JSON number, preferring an integer representation
/// when the value is integral. Non-finite values become `null`.
pub fn number_value(n: f64) -> Value {
    if !n.is_finite() {
        return Value::Null;
    }
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

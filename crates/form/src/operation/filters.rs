//! Filter operations
//!
//! Filters transform the working value and cannot fail. String filters work
//! on the value's text representation (see [`as_text`]) and always produce a
//! string.

use serde_json::Value;

use crate::value::{as_text, is_empty, leading_float, number_value};

/// Characters escaped by [`entity_encode`], paired with their entities.
const ENTITIES: [(char, &str); 4] = [('&', "&amp;"), ('"', "&quot;"), ('<', "&lt;"), ('>', "&gt;")];

const ELLIPSIS: &str = "...";

/// Strips `chars` (or whitespace) from both ends.
pub fn trim(value: &Value, chars: Option<&str>) -> Value {
    let text = as_text(value);
    Value::String(match chars {
        Some(set) => text.trim_matches(|c| set.contains(c)).to_owned(),
        None => text.trim().to_owned(),
    })
}

/// Strips `chars` (or whitespace) from the start.
pub fn ltrim(value: &Value, chars: Option<&str>) -> Value {
    let text = as_text(value);
    Value::String(match chars {
        Some(set) => text.trim_start_matches(|c| set.contains(c)).to_owned(),
        None => text.trim_start().to_owned(),
    })
}

/// Strips `chars` (or whitespace) from the end.
pub fn rtrim(value: &Value, chars: Option<&str>) -> Value {
    let text = as_text(value);
    Value::String(match chars {
        Some(set) => text.trim_end_matches(|c| set.contains(c)).to_owned(),
        None => text.trim_end().to_owned(),
    })
}

/// Replaces `""` and `null` with `replacement`.
pub fn if_null(value: &Value, replacement: &Value) -> Value {
    match value {
        Value::Null => replacement.clone(),
        Value::String(s) if s.is_empty() => replacement.clone(),
        other => other.clone(),
    }
}

/// Parses the leading number; `null` when there is none.
pub fn to_float(value: &Value) -> Value {
    leading_float(value).map_or(Value::Null, number_value)
}

/// Parses the leading number and rounds it toward negative infinity.
pub fn to_int(value: &Value) -> Value {
    leading_float(value).map_or(Value::Null, |n| number_value(n.floor()))
}

/// Lenient boolean coercion: everything is true except `false`, `0`, `""`,
/// `"0"`, `"false"` and `null`.
pub fn to_boolean(value: &Value) -> Value {
    Value::Bool(match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !matches!(s.as_str(), "" | "0" | "false"),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Strict boolean coercion: only `true`, `"true"`, `1` and `"1"` are true.
pub fn to_boolean_strict(value: &Value) -> Value {
    Value::Bool(match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => matches!(s.as_str(), "true" | "1"),
        _ => false,
    })
}

/// Escapes `& " < >` as HTML entities.
pub fn entity_encode(value: &Value) -> Value {
    let text = as_text(value);
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ENTITIES.iter().find(|(c, _)| *c == ch) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(ch),
        }
    }
    Value::String(out)
}

/// Reverses [`entity_encode`].
pub fn entity_decode(value: &Value) -> Value {
    let mut text = as_text(value).into_owned();
    // `&amp;` goes last so `&amp;lt;` decodes to `&lt;`, not `<`.
    for (ch, entity) in ENTITIES.iter().rev() {
        text = text.replace(entity, &ch.to_string());
    }
    Value::String(text)
}

/// Lowercases the text.
pub fn to_lower(value: &Value) -> Value {
    Value::String(as_text(value).to_lowercase())
}

/// Uppercases the text.
pub fn to_upper(value: &Value) -> Value {
    Value::String(as_text(value).to_uppercase())
}

/// Shortens text longer than `length` characters to `length - 3`
/// characters followed by `...`.
///
/// For `length < 3` no characters are kept and only the ellipsis remains.
pub fn truncate(value: &Value, length: usize) -> Value {
    let text = as_text(value);
    if text.chars().count() <= length {
        return Value::String(text.into_owned());
    }
    let mut out: String = text.chars().take(length.saturating_sub(ELLIPSIS.len())).collect();
    out.push_str(ELLIPSIS);
    Value::String(out)
}

/// Whole-value trim applied before a chain runs when auto-trim is enabled.
///
/// Strings are trimmed, arrays have their string elements trimmed, anything
/// else is left alone.
pub fn auto_trim(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_owned()),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Value::String(s.trim().to_owned()),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

/// Coerces a value to a list: `null` and `""` become empty, arrays pass
/// through, an object becomes a one-element list holding it unchanged, and
/// any other scalar becomes a one-element list of its text.
pub fn coerce_array(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(_) => vec![value],
        ref v if is_empty(v) => Vec::new(),
        other => vec![Value::String(as_text(&other).into_owned())],
    }
}

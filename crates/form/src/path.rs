//! Field paths over nested mappings
//!
//! A field path names where a value lives in (and is written back to) a
//! nested object. Both notations used by HTML forms are accepted and can be
//! mixed:
//!
//! - dotted: `user.address.city`
//! - bracketed: `user[address][city]`
//! - mixed: `user[address].city`
//!
//! Segments are plain string keys. Numeric segments are not turned into
//! array indices when writing; reading through an array that already exists
//! does honor them.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::DeclarationError;

/// Maximum number of path segments allowed.
const MAX_PATH_SEGMENTS: usize = 100;

/// A parsed, non-empty field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dotted or bracketed path.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nebula_form::path::FieldPath;
    ///
    /// let path = FieldPath::parse("user[address].city").unwrap();
    /// assert_eq!(path.segments(), ["user", "address", "city"]);
    /// assert_eq!(path.to_string(), "user.address.city");
    /// ```
    pub fn parse(path: &str) -> Result<Self, DeclarationError> {
        let segments = parse_segments(path)?;
        if segments.len() > MAX_PATH_SEGMENTS {
            return Err(DeclarationError::path_syntax(
                path,
                format!("more than {MAX_PATH_SEGMENTS} segments"),
            ));
        }
        Ok(Self { segments })
    }

    /// Returns the path segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the last segment, used as the default label.
    pub fn last(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Looks up the value at this path.
    ///
    /// Returns `None` when any segment along the way is missing or when a
    /// scalar is reached before the path ends.
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |node, segment| match node {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    /// Writes `value` at this path, creating intermediate objects.
    ///
    /// Intermediate scalars are replaced by empty objects. Arrays are never
    /// created; an existing array is written into only for an in-range
    /// numeric segment.
    pub fn set(&self, root: &mut Value, value: Value) {
        let Some((last, parents)) = self.segments.split_last() else {
            *root = value;
            return;
        };

        let mut node = root;
        for segment in parents {
            node = child_mut(node, segment);
        }

        if let Some(i) = array_index(node, last) {
            if let Some(slot) = node.as_array_mut().and_then(|items| items.get_mut(i)) {
                *slot = value;
            }
            return;
        }
        ensure_object(node).insert(last.clone(), value);
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = DeclarationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn array_index(node: &Value, segment: &str) -> Option<usize> {
    match node {
        Value::Array(items) => segment.parse::<usize>().ok().filter(|&i| i < items.len()),
        _ => None,
    }
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    match node {
        Value::Object(map) => map,
        other => {
            *other = Value::Object(Map::new());
            ensure_object(other)
        }
    }
}

fn child_mut<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = array_index(node, segment);
    match (node, index) {
        (Value::Array(items), Some(i)) => &mut items[i],
        (other, _) => ensure_object(other)
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new())),
    }
}

fn parse_segments(path: &str) -> Result<Vec<String>, DeclarationError> {
    if path.is_empty() {
        return Err(DeclarationError::path_syntax(path, "path is empty"));
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    // True right after a ']' that closed a segment.
    let mut after_bracket = false;
    // True right after a '.' that still needs a segment.
    let mut pending_dot = false;
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if current.is_empty() && !after_bracket {
                    return Err(DeclarationError::path_syntax(path, "empty segment before '.'"));
                }
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                after_bracket = false;
                pending_dot = true;
            }
            '[' => {
                if pending_dot {
                    return Err(DeclarationError::path_syntax(path, "'[' cannot follow '.'"));
                }
                if current.is_empty() && segments.is_empty() {
                    return Err(DeclarationError::path_syntax(path, "path cannot start with '['"));
                }
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }

                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some('[') => {
                            return Err(DeclarationError::path_syntax(path, "nested '['"));
                        }
                        Some(c) => key.push(c),
                        None => return Err(DeclarationError::path_syntax(path, "unclosed '['")),
                    }
                }
                if key.is_empty() {
                    return Err(DeclarationError::path_syntax(path, "empty '[]' segment"));
                }
                segments.push(key);

                if !matches!(chars.peek(), None | Some('.' | '[')) {
                    return Err(DeclarationError::path_syntax(
                        path,
                        "expected '.' or '[' after ']'",
                    ));
                }
                after_bracket = true;
            }
            ']' => return Err(DeclarationError::path_syntax(path, "unmatched ']'")),
            c => {
                current.push(c);
                after_bracket = false;
                pending_dot = false;
            }
        }
    }

    if pending_dot {
        return Err(DeclarationError::path_syntax(path, "path ends with '.'"));
    }
    if !current.is_empty() {
        segments.push(current);
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("user", &["user"])]
    #[case("user.name", &["user", "name"])]
    #[case("user[name]", &["user", "name"])]
    #[case("a[b][c]", &["a", "b", "c"])]
    #[case("a[b].c", &["a", "b", "c"])]
    #[case("items[0]", &["items", "0"])]
    #[case("a.b[c d]", &["a", "b", "c d"])]
    fn parses_valid_paths(#[case] input: &str, #[case] expected: &[&str]) {
        let path = FieldPath::parse(input).unwrap();
        assert_eq!(path.segments(), expected);
    }

    #[rstest]
    #[case("")]
    #[case(".a")]
    #[case("a.")]
    #[case("a..b")]
    #[case("a[b")]
    #[case("a]b")]
    #[case("a[]")]
    #[case("a[b[c]]")]
    #[case("[a]")]
    #[case("a.[b]")]
    #[case("a[b]c")]
    fn rejects_malformed_paths(#[case] input: &str) {
        let err = FieldPath::parse(input).unwrap_err();
        assert!(matches!(err, DeclarationError::PathSyntax { .. }), "{input}");
    }

    #[test]
    fn rejects_too_many_segments() {
        let input = vec!["a"; MAX_PATH_SEGMENTS + 1].join(".");
        assert!(FieldPath::parse(&input).is_err());
    }

    #[test]
    fn display_uses_dotted_form() {
        let path: FieldPath = "user[address][city]".parse().unwrap();
        assert_eq!(path.to_string(), "user.address.city");
        assert_eq!(path.last(), "city");
    }

    #[test]
    fn get_walks_nested_objects() {
        let root = json!({"user": {"address": {"city": "Oslo"}}});
        let path = FieldPath::parse("user.address.city").unwrap();
        assert_eq!(path.get(&root), Some(&json!("Oslo")));

        let missing = FieldPath::parse("user.phone").unwrap();
        assert_eq!(missing.get(&root), None);

        let through_scalar = FieldPath::parse("user.address.city.zip").unwrap();
        assert_eq!(through_scalar.get(&root), None);
    }

    #[test]
    fn get_reads_existing_arrays_by_index() {
        let root = json!({"tags": ["a", "b"]});
        assert_eq!(FieldPath::parse("tags[1]").unwrap().get(&root), Some(&json!("b")));
        assert_eq!(FieldPath::parse("tags[5]").unwrap().get(&root), None);
    }

    #[test]
    fn get_keeps_null_as_defined() {
        let root = json!({"a": null});
        assert_eq!(FieldPath::parse("a").unwrap().get(&root), Some(&Value::Null));
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut root = json!({});
        FieldPath::parse("user[address].city")
            .unwrap()
            .set(&mut root, json!("Oslo"));
        assert_eq!(root, json!({"user": {"address": {"city": "Oslo"}}}));
    }

    #[test]
    fn set_never_creates_arrays() {
        let mut root = json!({});
        FieldPath::parse("items[0]").unwrap().set(&mut root, json!("x"));
        assert_eq!(root, json!({"items": {"0": "x"}}));
    }

    #[test]
    fn set_writes_into_existing_array_slot() {
        let mut root = json!({"items": ["a", "b"]});
        FieldPath::parse("items[1]").unwrap().set(&mut root, json!("z"));
        assert_eq!(root, json!({"items": ["a", "z"]}));
    }

    #[test]
    fn set_walks_through_existing_array_element() {
        let mut root = json!({"items": [{"name": "a"}, "b"]});
        FieldPath::parse("items[0].name").unwrap().set(&mut root, json!("z"));
        FieldPath::parse("items[1].name").unwrap().set(&mut root, json!("y"));
        assert_eq!(root, json!({"items": [{"name": "z"}, {"name": "y"}]}));
    }

    #[test]
    fn set_replaces_scalar_intermediates() {
        let mut root = json!({"user": "bob"});
        FieldPath::parse("user.name").unwrap().set(&mut root, json!("bob"));
        assert_eq!(root, json!({"user": {"name": "bob"}}));
    }

    #[test]
    fn set_keeps_sibling_keys() {
        let mut root = json!({"user": {"name": "bob"}});
        FieldPath::parse("user.age").unwrap().set(&mut root, json!(42));
        assert_eq!(root, json!({"user": {"name": "bob", "age": 42}}));
    }
}

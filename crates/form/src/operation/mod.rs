//! The operation catalog
//!
//! Every step a chain can perform is a variant of [`OperationKind`]. Each
//! kind has a canonical name (used as the error code), optional aliases,
//! and, for validators, a default message template. Kinds can be built
//! directly, through the typed [`Chain`](crate::Chain) methods, or by name
//! with [`OperationKind::from_name`].
//!
//! | Family     | Kinds |
//! |------------|-------|
//! | Filter     | `trim` `ltrim` `rtrim` `ifNull` `ifNullOrNaN` `toFloat` `toInt` `toBoolean` `toBooleanStrict` `entityEncode` `entityDecode` `toLower` `toUpper` `truncate` |
//! | Validator  | `isNumeric` `isInt` `isDecimal` `isFloat` `isDate` `isEmail` `isUrl` `isIP` `isAlpha` `isAlphanumeric` `isLowercase` `isUppercase` `notEmpty` `equals` `contains` `notContains` `regex` `notRegex` `minLength` `maxLength` `required` |
//! | Array      | `array` |
//! | Hook       | `custom` `customAsync` |

pub mod custom;
pub mod filters;
pub mod validators;

use regex::{Regex, RegexBuilder};
use serde_json::Value;

pub use custom::{CustomHook, CustomOutcome};

use crate::error::DeclarationError;
use crate::path::FieldPath;
use crate::source::MergedSource;
use crate::value::as_text;

/// Prefix marking an `equals` argument as a reference to another field.
pub const FIELD_TOKEN_PREFIX: &str = "field::";

// ============================================================================
// OPERATION
// ============================================================================

/// One step of a chain: what to do, plus an optional message override.
#[derive(Debug, Clone)]
pub struct Operation {
    kind: OperationKind,
    message: Option<String>,
}

impl Operation {
    /// Creates an operation with the default message.
    pub fn new(kind: OperationKind) -> Self {
        Self { kind, message: None }
    }

    /// Creates an operation with a custom message template.
    pub fn with_message(kind: OperationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    /// Returns the operation kind.
    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    /// Returns the canonical name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Returns the message template in effect: the override if one was
    /// given, the kind's default otherwise.
    pub fn message_template(&self) -> Option<&str> {
        self.message.as_deref().or(self.kind.default_message())
    }

    pub(crate) fn set_message(&mut self, message: String) {
        self.message = Some(message);
    }
}

/// The family an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Transforms the value, cannot fail.
    Filter,
    /// Checks the value, may record an error.
    Validator,
    /// Switches the chain into array mode.
    Array,
    /// User-supplied code.
    Hook,
}

// ============================================================================
// COMPARAND
// ============================================================================

/// The right-hand side of `equals`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparand {
    /// A fixed string compared with the value's text.
    Literal(String),
    /// Another field, looked up in the raw sources.
    Field(FieldPath),
}

impl Comparand {
    /// Parses a literal or a `field::<path>` token.
    pub fn parse(arg: &str) -> Result<Self, DeclarationError> {
        match arg.strip_prefix(FIELD_TOKEN_PREFIX) {
            Some(path) => Ok(Self::Field(FieldPath::parse(path)?)),
            None => Ok(Self::Literal(arg.to_owned())),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Field(path) => path.to_string(),
        }
    }
}

// ============================================================================
// OPERATION KIND
// ============================================================================

/// Every operation a chain can perform.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum OperationKind {
    // ── filters ─────────────────────────────────────────────────────────
    /// Strip characters (whitespace by default) from both ends.
    Trim(Option<String>),
    /// Strip characters (whitespace by default) from the start.
    Ltrim(Option<String>),
    /// Strip characters (whitespace by default) from the end.
    Rtrim(Option<String>),
    /// Replace `""` and `null` with the given value.
    IfNull(Value),
    /// Replace `""`, `null` and failed numeric coercions with the given value.
    IfNullOrNaN(Value),
    /// Leading number of the text, or `null`.
    ToFloat,
    /// Leading number rounded toward negative infinity, or `null`.
    ToInt,
    /// Lenient boolean coercion.
    ToBoolean,
    /// Strict boolean coercion.
    ToBooleanStrict,
    /// Escape `& " < >`.
    EntityEncode,
    /// Unescape `& " < >`.
    EntityDecode,
    /// Lowercase.
    ToLower,
    /// Uppercase.
    ToUpper,
    /// Limit to the given number of characters, ellipsis included.
    Truncate(usize),

    // ── validators ──────────────────────────────────────────────────────
    /// Optional minus sign followed by digits.
    IsNumeric,
    /// Integer without leading zeros.
    IsInt,
    /// Decimal number.
    IsDecimal,
    /// Floating point number.
    IsFloat,
    /// Calendar date or date-time.
    IsDate,
    /// Email address.
    IsEmail,
    /// http, https or ftp URL.
    IsUrl,
    /// IPv4 or IPv6 address.
    IsIp,
    /// ASCII letters only.
    IsAlpha,
    /// ASCII letters and digits only.
    IsAlphanumeric,
    /// No uppercase letters.
    IsLowercase,
    /// No lowercase letters.
    IsUppercase,
    /// Not blank after trimming whitespace.
    NotEmpty,
    /// Equal to a literal or to another field's raw value.
    Equals(Comparand),
    /// Text contains the substring.
    Contains(String),
    /// Text does not contain the substring.
    NotContains(String),
    /// Text matches the pattern.
    Regex(Regex),
    /// Text does not match the pattern.
    NotRegex(Regex),
    /// At least this many characters.
    MinLength(usize),
    /// At most this many characters.
    MaxLength(usize),
    /// Present and non-empty, and not equal to the placeholder if one is set.
    Required(Option<String>),

    // ── array ───────────────────────────────────────────────────────────
    /// Coerce to a list and broadcast later operations over its elements.
    /// Optional inclusive `(min, max)` bounds on the list length.
    Array(Option<(usize, usize)>),

    // ── hooks ───────────────────────────────────────────────────────────
    /// User-supplied hook.
    Custom(CustomHook),
}

impl OperationKind {
    /// Returns the canonical name, also used as the error code.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Trim(_) => "trim",
            Self::Ltrim(_) => "ltrim",
            Self::Rtrim(_) => "rtrim",
            Self::IfNull(_) => "ifNull",
            Self::IfNullOrNaN(_) => "ifNullOrNaN",
            Self::ToFloat => "toFloat",
            Self::ToInt => "toInt",
            Self::ToBoolean => "toBoolean",
            Self::ToBooleanStrict => "toBooleanStrict",
            Self::EntityEncode => "entityEncode",
            Self::EntityDecode => "entityDecode",
            Self::ToLower => "toLower",
            Self::ToUpper => "toUpper",
            Self::Truncate(_) => "truncate",
            Self::IsNumeric => "isNumeric",
            Self::IsInt => "isInt",
            Self::IsDecimal => "isDecimal",
            Self::IsFloat => "isFloat",
            Self::IsDate => "isDate",
            Self::IsEmail => "isEmail",
            Self::IsUrl => "isUrl",
            Self::IsIp => "isIP",
            Self::IsAlpha => "isAlpha",
            Self::IsAlphanumeric => "isAlphanumeric",
            Self::IsLowercase => "isLowercase",
            Self::IsUppercase => "isUppercase",
            Self::NotEmpty => "notEmpty",
            Self::Equals(_) => "equals",
            Self::Contains(_) => "contains",
            Self::NotContains(_) => "notContains",
            Self::Regex(_) => "regex",
            Self::NotRegex(_) => "notRegex",
            Self::MinLength(_) => "minLength",
            Self::MaxLength(_) => "maxLength",
            Self::Required(_) => "required",
            Self::Array(_) => "array",
            Self::Custom(hook) if hook.is_async() => "customAsync",
            Self::Custom(_) => "custom",
        }
    }

    /// Returns the family of this kind.
    pub fn family(&self) -> Family {
        match self {
            Self::Trim(_)
            | Self::Ltrim(_)
            | Self::Rtrim(_)
            | Self::IfNull(_)
            | Self::IfNullOrNaN(_)
            | Self::ToFloat
            | Self::ToInt
            | Self::ToBoolean
            | Self::ToBooleanStrict
            | Self::EntityEncode
            | Self::EntityDecode
            | Self::ToLower
            | Self::ToUpper
            | Self::Truncate(_) => Family::Filter,
            Self::Array(_) => Family::Array,
            Self::Custom(_) => Family::Hook,
            _ => Family::Validator,
        }
    }

    /// Returns the default message template, if this kind can fail.
    pub fn default_message(&self) -> Option<&'static str> {
        let template = match self {
            Self::IsNumeric => "%s is not a number",
            Self::IsInt => "%s is not an integer",
            Self::IsDecimal => "%s is not a decimal",
            Self::IsFloat => "%s is not a float",
            Self::IsDate => "%s is not a date",
            Self::IsEmail => "%s is not an email address",
            Self::IsUrl => "%s is not a URL",
            Self::IsIp => "%s is not an IP address",
            Self::IsAlpha => "%s contains non-letter characters",
            Self::IsAlphanumeric => "%s contains non alpha-numeric characters",
            Self::IsLowercase => "%s contains uppercase letters",
            Self::IsUppercase => "%s contains lowercase letters",
            Self::NotEmpty => "%s has no value or is only whitespace",
            Self::Equals(_) => "%s does not equal %s",
            Self::Contains(_) => "%s does not contain required characters",
            Self::NotContains(_) => "%s contains invalid characters",
            Self::Regex(_) | Self::NotRegex(_) => "%s has invalid characters",
            Self::MinLength(_) => "%s is too short",
            Self::MaxLength(_) => "%s is too long",
            Self::Required(_) => "%s is required",
            Self::Array(_) => "%s has an invalid number of entries",
            _ => return None,
        };
        Some(template)
    }

    /// Builds a kind from its name (canonical or alias) and JSON arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nebula_form::operation::OperationKind;
    /// use serde_json::json;
    ///
    /// let kind = OperationKind::from_name("is", &[json!("^[a-z]+$"), json!("i")]).unwrap();
    /// assert_eq!(kind.name(), "regex");
    ///
    /// assert!(OperationKind::from_name("isBanana", &[]).is_err());
    /// ```
    pub fn from_name(name: &str, args: &[Value]) -> Result<Self, DeclarationError> {
        let args = Args::new(canonical_name(name)?, args);
        let kind = match args.op {
            "trim" => Self::Trim(args.opt_string(0)?),
            "ltrim" => Self::Ltrim(args.opt_string(0)?),
            "rtrim" => Self::Rtrim(args.opt_string(0)?),
            "ifNull" => Self::IfNull(args.value(0)?),
            "ifNullOrNaN" => Self::IfNullOrNaN(args.value(0)?),
            "toFloat" => Self::ToFloat,
            "toInt" => Self::ToInt,
            "toBoolean" => Self::ToBoolean,
            "toBooleanStrict" => Self::ToBooleanStrict,
            "entityEncode" => Self::EntityEncode,
            "entityDecode" => Self::EntityDecode,
            "toLower" => Self::ToLower,
            "toUpper" => Self::ToUpper,
            "truncate" => Self::Truncate(args.count(0)?),
            "isNumeric" => Self::IsNumeric,
            "isInt" => Self::IsInt,
            "isDecimal" => Self::IsDecimal,
            "isFloat" => Self::IsFloat,
            "isDate" => Self::IsDate,
            "isEmail" => Self::IsEmail,
            "isUrl" => Self::IsUrl,
            "isIP" => Self::IsIp,
            "isAlpha" => Self::IsAlpha,
            "isAlphanumeric" => Self::IsAlphanumeric,
            "isLowercase" => Self::IsLowercase,
            "isUppercase" => Self::IsUppercase,
            "notEmpty" => Self::NotEmpty,
            "equals" => Self::Equals(Comparand::parse(&args.text(0)?)?),
            "contains" => Self::Contains(args.text(0)?),
            "notContains" => Self::NotContains(args.text(0)?),
            "regex" => Self::Regex(args.pattern()?),
            "notRegex" => Self::NotRegex(args.pattern()?),
            "minLength" => Self::MinLength(args.count(0)?),
            "maxLength" => Self::MaxLength(args.count(0)?),
            "required" => Self::Required(args.opt_string(0)?),
            "array" => Self::Array(args.bounds()?),
            _ => {
                return Err(DeclarationError::invalid_argument(
                    args.op,
                    "custom hooks take a function; use Chain::custom or Chain::custom_async",
                ));
            }
        };
        Ok(kind)
    }

    /// Applies a filter. Returns `None` for kinds that are not filters.
    pub fn filter(&self, value: &Value) -> Option<Value> {
        let out = match self {
            Self::Trim(chars) => filters::trim(value, chars.as_deref()),
            Self::Ltrim(chars) => filters::ltrim(value, chars.as_deref()),
            Self::Rtrim(chars) => filters::rtrim(value, chars.as_deref()),
            Self::IfNull(replacement) | Self::IfNullOrNaN(replacement) => {
                filters::if_null(value, replacement)
            }
            Self::ToFloat => filters::to_float(value),
            Self::ToInt => filters::to_int(value),
            Self::ToBoolean => filters::to_boolean(value),
            Self::ToBooleanStrict => filters::to_boolean_strict(value),
            Self::EntityEncode => filters::entity_encode(value),
            Self::EntityDecode => filters::entity_decode(value),
            Self::ToLower => filters::to_lower(value),
            Self::ToUpper => filters::to_upper(value),
            Self::Truncate(length) => filters::truncate(value, *length),
            _ => return None,
        };
        Some(out)
    }

    /// Runs a validator against `value`.
    ///
    /// Returns `None` when the check passes (or the kind is not a
    /// validator), and `Some(extra)` on failure, where `extra` holds the
    /// message arguments that follow the label.
    pub fn check(&self, value: &Value, merged: &MergedSource<'_>) -> Option<Vec<String>> {
        let text = as_text(value);
        let passed = match self {
            Self::IsNumeric => validators::is_numeric(&text),
            Self::IsInt => validators::is_int(&text),
            Self::IsDecimal => validators::is_decimal(&text),
            Self::IsFloat => validators::is_float(&text),
            Self::IsDate => validators::is_date(&text),
            Self::IsEmail => validators::is_email(&text),
            Self::IsUrl => validators::is_url(&text),
            Self::IsIp => validators::is_ip(&text),
            Self::IsAlpha => validators::is_alpha(&text),
            Self::IsAlphanumeric => validators::is_alphanumeric(&text),
            Self::IsLowercase => validators::is_lowercase(&text),
            Self::IsUppercase => validators::is_uppercase(&text),
            Self::NotEmpty => validators::not_empty(&text),
            Self::Equals(comparand) => {
                let equal = match comparand {
                    Comparand::Literal(expected) => text == expected.as_str(),
                    Comparand::Field(path) => match merged.resolve(path) {
                        Some(other) => value == other,
                        None => value.as_str() == Some(""),
                    },
                };
                if !equal {
                    return Some(vec![comparand.describe()]);
                }
                true
            }
            Self::Contains(needle) => text.contains(needle.as_str()),
            Self::NotContains(needle) => !text.contains(needle.as_str()),
            Self::Regex(pattern) => pattern.is_match(&text),
            Self::NotRegex(pattern) => !pattern.is_match(&text),
            Self::MinLength(min) => text.chars().count() >= *min,
            Self::MaxLength(max) => text.chars().count() <= *max,
            Self::Required(placeholder) => {
                !crate::value::is_empty(value)
                    && placeholder.as_deref().is_none_or(|p| text != p)
            }
            _ => true,
        };
        (!passed).then(Vec::new)
    }
}

/// Compiles a pattern with JavaScript-style modifier letters.
///
/// `i`, `m`, `s` and `x` map to the matching regex flags; `g` is accepted and
/// ignored since matching is always a single test.
pub fn compile_pattern(pattern: &str, modifiers: &str) -> Result<Regex, DeclarationError> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in modifiers.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            'g' => {}
            other => {
                return Err(DeclarationError::invalid_argument(
                    "regex",
                    format!("unsupported modifier '{other}'"),
                ));
            }
        }
    }
    builder
        .build()
        .map_err(|e| DeclarationError::invalid_argument("regex", e.to_string()))
}

// ============================================================================
// NAME RESOLUTION
// ============================================================================

fn canonical_name(name: &str) -> Result<&'static str, DeclarationError> {
    let canonical = match name {
        "trim" => "trim",
        "ltrim" => "ltrim",
        "rtrim" => "rtrim",
        "ifNull" => "ifNull",
        "ifNullOrNaN" => "ifNullOrNaN",
        "toFloat" => "toFloat",
        "toInt" => "toInt",
        "toBoolean" => "toBoolean",
        "toBooleanStrict" => "toBooleanStrict",
        "entityEncode" => "entityEncode",
        "entityDecode" => "entityDecode",
        "toLower" | "toLowerCase" => "toLower",
        "toUpper" | "toUpperCase" => "toUpper",
        "truncate" => "truncate",
        "isNumeric" => "isNumeric",
        "isInt" => "isInt",
        "isDecimal" => "isDecimal",
        "isFloat" => "isFloat",
        "isDate" => "isDate",
        "isEmail" => "isEmail",
        "isUrl" => "isUrl",
        "isIP" => "isIP",
        "isAlpha" => "isAlpha",
        "isAlphanumeric" => "isAlphanumeric",
        "isLowercase" => "isLowercase",
        "isUppercase" => "isUppercase",
        "notEmpty" => "notEmpty",
        "equals" => "equals",
        "contains" => "contains",
        "notContains" => "notContains",
        "regex" | "is" => "regex",
        "notRegex" | "not" => "notRegex",
        "minLength" => "minLength",
        "maxLength" => "maxLength",
        "required" => "required",
        "array" => "array",
        "custom" => "custom",
        "customAsync" => "customAsync",
        _ => {
            return Err(DeclarationError::UnknownOperation {
                name: name.to_owned(),
            });
        }
    };
    Ok(canonical)
}

/// Positional argument access with per-operation error messages.
struct Args<'a> {
    op: &'static str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn new(op: &'static str, values: &'a [Value]) -> Self {
        Self { op, values }
    }

    fn get(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index).filter(|v| !v.is_null())
    }

    fn missing(&self, index: usize) -> DeclarationError {
        DeclarationError::invalid_argument(self.op, format!("missing argument #{}", index + 1))
    }

    fn value(&self, index: usize) -> Result<Value, DeclarationError> {
        // `null` is a legitimate replacement value, so look it up directly.
        self.values
            .get(index)
            .cloned()
            .ok_or_else(|| self.missing(index))
    }

    fn opt_string(&self, index: usize) -> Result<Option<String>, DeclarationError> {
        match self.get(index) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(DeclarationError::invalid_argument(
                self.op,
                format!("expected a string, got {other}"),
            )),
        }
    }

    fn text(&self, index: usize) -> Result<String, DeclarationError> {
        self.get(index)
            .map(|v| as_text(v).into_owned())
            .ok_or_else(|| self.missing(index))
    }

    fn count(&self, index: usize) -> Result<usize, DeclarationError> {
        let value = self.get(index).ok_or_else(|| self.missing(index))?;
        value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                DeclarationError::invalid_argument(
                    self.op,
                    format!("expected a non-negative integer, got {value}"),
                )
            })
    }

    fn pattern(&self) -> Result<Regex, DeclarationError> {
        let pattern = match self.get(0) {
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(DeclarationError::invalid_argument(
                    self.op,
                    format!("expected a pattern string, got {other}"),
                ));
            }
            None => return Err(self.missing(0)),
        };
        let modifiers = self.opt_string(1)?.unwrap_or_default();
        compile_pattern(pattern, &modifiers)
    }

    fn bounds(&self) -> Result<Option<(usize, usize)>, DeclarationError> {
        match (self.get(0), self.get(1)) {
            (None, None) => Ok(None),
            (Some(_), Some(_)) => {
                let (min, max) = (self.count(0)?, self.count(1)?);
                checked_bounds(min, max).map(Some)
            }
            _ => Err(DeclarationError::invalid_argument(
                self.op,
                "expected both min and max, or neither",
            )),
        }
    }
}

/// Validates inclusive array-length bounds.
pub(crate) fn checked_bounds(min: usize, max: usize) -> Result<(usize, usize), DeclarationError> {
    if min > max {
        return Err(DeclarationError::invalid_argument(
            "array",
            format!("min ({min}) is greater than max ({max})"),
        ));
    }
    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DataSources;
    use rstest::rstest;
    use serde_json::json;

    fn no_sources() -> DataSources {
        DataSources::new()
    }

    fn fails(kind: &OperationKind, value: Value) -> bool {
        let sources = no_sources();
        let merged = MergedSource::new(&sources, &["body"]);
        kind.check(&value, &merged).is_some()
    }

    #[rstest]
    #[case("toLowerCase", "toLower")]
    #[case("toUpperCase", "toUpper")]
    #[case("is", "regex")]
    #[case("not", "notRegex")]
    #[case("isIP", "isIP")]
    fn aliases_resolve_to_canonical_names(#[case] alias: &str, #[case] canonical: &str) {
        let args = if canonical.ends_with("egex") {
            vec![json!("x")]
        } else {
            vec![]
        };
        let kind = OperationKind::from_name(alias, &args).unwrap();
        assert_eq!(kind.name(), canonical);
    }

    #[test]
    fn unknown_operation() {
        let err = OperationKind::from_name("isBanana", &[]).unwrap_err();
        assert_eq!(
            err,
            DeclarationError::UnknownOperation {
                name: "isBanana".into()
            }
        );
    }

    #[rstest]
    #[case("truncate", vec![])]
    #[case("truncate", vec![json!("five")])]
    #[case("truncate", vec![json!(-1)])]
    #[case("trim", vec![json!(3)])]
    #[case("regex", vec![json!("(")])]
    #[case("regex", vec![json!("a"), json!("q")])]
    #[case("array", vec![json!(1)])]
    #[case("array", vec![json!(5), json!(2)])]
    #[case("ifNull", vec![])]
    #[case("custom", vec![])]
    fn invalid_arguments(#[case] name: &str, #[case] args: Vec<Value>) {
        let err = OperationKind::from_name(name, &args).unwrap_err();
        assert!(
            matches!(err, DeclarationError::InvalidArgument { .. }),
            "{name}: {err}"
        );
    }

    #[test]
    fn if_null_accepts_null_replacement() {
        let kind = OperationKind::from_name("ifNull", &[Value::Null]).unwrap();
        assert!(matches!(kind, OperationKind::IfNull(Value::Null)));
    }

    #[test]
    fn if_null_or_nan_by_name() {
        let kind = OperationKind::from_name("ifNullOrNaN", &[json!(0)]).unwrap();
        assert_eq!(kind.name(), "ifNullOrNaN");
        assert_eq!(kind.family(), Family::Filter);

        let coerced = OperationKind::ToFloat.filter(&json!("abc")).unwrap();
        assert_eq!(kind.filter(&coerced), Some(json!(0)));
        assert_eq!(kind.filter(&json!(2.5)), Some(json!(2.5)));
    }

    #[test]
    fn families() {
        assert_eq!(OperationKind::Trim(None).family(), Family::Filter);
        assert_eq!(OperationKind::IsEmail.family(), Family::Validator);
        assert_eq!(OperationKind::Required(None).family(), Family::Validator);
        assert_eq!(OperationKind::Array(None).family(), Family::Array);
        assert_eq!(
            OperationKind::Custom(CustomHook::sync(|_, _| CustomOutcome::Unchanged)).family(),
            Family::Hook
        );
    }

    #[test]
    fn filters_have_no_message_and_validators_do() {
        assert!(OperationKind::Trim(None).default_message().is_none());
        assert_eq!(
            OperationKind::Required(None).default_message(),
            Some("%s is required")
        );
    }

    #[test]
    fn message_override_wins() {
        let op = Operation::with_message(OperationKind::IsEmail, "bad %s");
        assert_eq!(op.message_template(), Some("bad %s"));
        assert_eq!(
            Operation::new(OperationKind::IsEmail).message_template(),
            Some("%s is not an email address")
        );
    }

    #[test]
    fn filter_returns_none_for_validators() {
        assert!(OperationKind::IsEmail.filter(&json!("x")).is_none());
        assert_eq!(OperationKind::ToUpper.filter(&json!("x")), Some(json!("X")));
    }

    #[test]
    fn required_with_placeholder() {
        let kind = OperationKind::Required(Some("Type here".into()));
        assert!(fails(&kind, json!("Type here")));
        assert!(fails(&kind, json!("")));
        assert!(fails(&kind, Value::Null));
        assert!(!fails(&kind, json!("hello")));

        let plain = OperationKind::Required(None);
        assert!(!fails(&plain, json!("Type here")));
        assert!(!fails(&plain, json!(0)));
    }

    #[test]
    fn regex_modifiers() {
        let strict = OperationKind::from_name("regex", &[json!("^[a-z]+$")]).unwrap();
        let loose = OperationKind::from_name("regex", &[json!("^[a-z]+$"), json!("gi")]).unwrap();
        assert!(fails(&strict, json!("Admin")));
        assert!(!fails(&loose, json!("Admin")));

        let negated = OperationKind::from_name("not", &[json!("[0-9]")]).unwrap();
        assert!(fails(&negated, json!("abc1")));
        assert!(!fails(&negated, json!("abc")));
    }

    #[test]
    fn length_counts_characters() {
        assert!(!fails(&OperationKind::MinLength(3), json!("héé")));
        assert!(fails(&OperationKind::MinLength(4), json!("héé")));
        assert!(!fails(&OperationKind::MaxLength(3), json!("héé")));
        assert!(fails(&OperationKind::MaxLength(2), json!("héé")));
    }

    #[test]
    fn contains_and_not_contains() {
        assert!(!fails(&OperationKind::Contains("@".into()), json!("a@b")));
        assert!(fails(&OperationKind::Contains("@".into()), json!("ab")));
        assert!(fails(&OperationKind::NotContains("<".into()), json!("a<b")));
    }

    #[test]
    fn equals_literal_compares_text() {
        let kind = OperationKind::from_name("equals", &[json!(5)]).unwrap();
        assert!(!fails(&kind, json!("5")));
        assert!(!fails(&kind, json!(5)));
        assert!(fails(&kind, json!("6")));
    }

    #[test]
    fn equals_field_token_uses_raw_sources() {
        let sources = DataSources::new().with("body", json!({"password": "s3cret"}));
        let merged = MergedSource::new(&sources, &["body"]);
        let kind = OperationKind::from_name("equals", &[json!("field::password")]).unwrap();

        assert!(kind.check(&json!("s3cret"), &merged).is_none());
        assert_eq!(
            kind.check(&json!("other"), &merged),
            Some(vec!["password".to_owned()])
        );
    }

    #[test]
    fn equals_field_token_rejects_bad_path() {
        let err = OperationKind::from_name("equals", &[json!("field::a[")]).unwrap_err();
        assert!(matches!(err, DeclarationError::PathSyntax { .. }));
    }

    #[test]
    fn equals_missing_field_compares_with_empty_string() {
        let kind = OperationKind::Equals(Comparand::parse("field::nope").unwrap());
        assert!(!fails(&kind, json!("")));
        assert!(fails(&kind, json!("x")));
    }
}

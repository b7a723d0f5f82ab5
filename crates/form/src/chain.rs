//! Field chains
//!
//! A [`Chain`] is declared once per field and holds the field's identity
//! plus an ordered list of operations. Calling order defines the pipeline:
//!
//! ```rust
//! use nebula_form::field;
//!
//! let username = field("username")
//!     .unwrap()
//!     .trim()
//!     .required()
//!     .regex_str("^[a-z]+$", "i")
//!     .unwrap();
//! assert_eq!(username.operations().len(), 3);
//! ```
//!
//! Every operation always runs, in order, against the current working
//! value. Filters replace it; failed validators record a [`FieldError`] and
//! the chain carries on. After [`Chain::array`], each later operation is
//! applied to every element separately.

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::FormConfig;
use crate::error::{DeclarationError, FieldError, RunError};
use crate::message::render;
use crate::operation::filters::coerce_array;
use crate::operation::{
    Comparand, CustomHook, CustomOutcome, Family, Operation, OperationKind, checked_bounds,
    compile_pattern,
};
use crate::path::FieldPath;
use crate::source::MergedSource;
use crate::value::{is_compound, is_empty};

// ============================================================================
// FIELD SPEC
// ============================================================================

/// Identity of a declared field: where it lives and what to call it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    path: FieldPath,
    label: String,
}

impl FieldSpec {
    /// Parses `path`; the label defaults to the last path segment.
    pub fn new(path: &str, label: Option<&str>) -> Result<Self, DeclarationError> {
        let path = FieldPath::parse(path)?;
        let label = label.map_or_else(|| path.last().to_owned(), str::to_owned);
        Ok(Self { path, label })
    }

    /// Returns the field path.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Declares a field whose label is its last path segment.
pub fn field(path: &str) -> Result<Chain, DeclarationError> {
    Ok(Chain::new(FieldSpec::new(path, None)?))
}

/// Declares a field with an explicit label.
pub fn field_labeled(path: &str, label: &str) -> Result<Chain, DeclarationError> {
    Ok(Chain::new(FieldSpec::new(path, Some(label))?))
}

// ============================================================================
// EXECUTION TYPES
// ============================================================================

/// Everything a chain needs from the surrounding run.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionContext<'a> {
    /// Prioritised raw sources, for cross-field lookups.
    pub merged: &'a MergedSource<'a>,
    /// The merged raw source as one object, handed to custom hooks.
    pub source: &'a Arc<Value>,
    /// Run configuration.
    pub config: &'a FormConfig,
}

/// What a chain produced for its field.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutput {
    /// The final working value.
    pub value: Value,
    /// Errors in operation order.
    pub errors: Vec<FieldError>,
}

/// The working value: one value, or a list being broadcast over.
enum Working {
    Single(Value),
    Broadcast(Vec<Value>),
}

// ============================================================================
// CHAIN
// ============================================================================

/// An ordered pipeline of operations bound to one field.
#[derive(Debug, Clone)]
pub struct Chain {
    spec: FieldSpec,
    operations: Vec<Operation>,
    validate_custom_if_empty: bool,
}

impl Chain {
    /// Creates an empty chain for `spec`.
    pub fn new(spec: FieldSpec) -> Self {
        Self {
            spec,
            operations: Vec::new(),
            validate_custom_if_empty: false,
        }
    }

    /// Returns the field path.
    pub fn path(&self) -> &FieldPath {
        &self.spec.path
    }

    /// Returns the field label.
    pub fn label(&self) -> &str {
        &self.spec.label
    }

    /// Returns the operations in declaration order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns true when the chain contains `required`.
    pub fn is_required(&self) -> bool {
        self.operations
            .iter()
            .any(|op| matches!(op.kind(), OperationKind::Required(_)))
    }

    /// Appends an operation.
    pub fn push(mut self, kind: OperationKind) -> Self {
        self.operations.push(Operation::new(kind));
        self
    }

    /// Appends an operation looked up by name, with JSON arguments and an
    /// optional message template.
    ///
    /// ```rust
    /// use nebula_form::field;
    /// use serde_json::json;
    ///
    /// let chain = field("bio").unwrap()
    ///     .add_operation("truncate", &[json!(140)], None).unwrap()
    ///     .add_operation("notContains", &[json!("<script")], Some("%s looks unsafe")).unwrap();
    /// assert_eq!(chain.operations()[1].message_template(), Some("%s looks unsafe"));
    /// ```
    pub fn add_operation(
        mut self,
        name: &str,
        args: &[Value],
        message: Option<&str>,
    ) -> Result<Self, DeclarationError> {
        let kind = OperationKind::from_name(name, args)?;
        self.operations.push(match message {
            Some(message) => Operation::with_message(kind, message),
            None => Operation::new(kind),
        });
        Ok(self)
    }

    /// Overrides the message of the most recently added operation.
    ///
    /// `%s` is replaced by the field label.
    pub fn message(mut self, template: impl Into<String>) -> Self {
        match self.operations.last_mut() {
            Some(op) => op.set_message(template.into()),
            None => warn!(field = %self.spec.path, "message() called before any operation"),
        }
        self
    }

    /// Reports custom-hook failures even when the field is empty and not
    /// required.
    pub fn validate_custom_if_empty(mut self) -> Self {
        self.validate_custom_if_empty = true;
        self
    }

    // ── filters ─────────────────────────────────────────────────────────

    /// Strips surrounding whitespace.
    pub fn trim(self) -> Self {
        self.push(OperationKind::Trim(None))
    }

    /// Strips any of `chars` from both ends.
    pub fn trim_chars(self, chars: impl Into<String>) -> Self {
        self.push(OperationKind::Trim(Some(chars.into())))
    }

    /// Strips leading whitespace.
    pub fn ltrim(self) -> Self {
        self.push(OperationKind::Ltrim(None))
    }

    /// Strips any of `chars` from the start.
    pub fn ltrim_chars(self, chars: impl Into<String>) -> Self {
        self.push(OperationKind::Ltrim(Some(chars.into())))
    }

    /// Strips trailing whitespace.
    pub fn rtrim(self) -> Self {
        self.push(OperationKind::Rtrim(None))
    }

    /// Strips any of `chars` from the end.
    pub fn rtrim_chars(self, chars: impl Into<String>) -> Self {
        self.push(OperationKind::Rtrim(Some(chars.into())))
    }

    /// Replaces `""` and `null` with `replacement`.
    pub fn if_null(self, replacement: impl Into<Value>) -> Self {
        self.push(OperationKind::IfNull(replacement.into()))
    }

    /// Replaces `""`, `null` and failed numeric coercions with `replacement`.
    pub fn if_null_or_nan(self, replacement: impl Into<Value>) -> Self {
        self.push(OperationKind::IfNullOrNaN(replacement.into()))
    }

    /// Converts to a float.
    pub fn to_float(self) -> Self {
        self.push(OperationKind::ToFloat)
    }

    /// Converts to an integer, rounding toward negative infinity.
    pub fn to_int(self) -> Self {
        self.push(OperationKind::ToInt)
    }

    /// Converts to a boolean, leniently.
    ///
    /// Only `false`, `0`, `""`, `"0"`, `"false"` and `null` become `false`.
    pub fn to_boolean(self) -> Self {
        self.push(OperationKind::ToBoolean)
    }

    /// Converts to a boolean; only `true`, `"true"`, `1`, `"1"` are true.
    pub fn to_boolean_strict(self) -> Self {
        self.push(OperationKind::ToBooleanStrict)
    }

    /// Escapes `& " < >`.
    pub fn entity_encode(self) -> Self {
        self.push(OperationKind::EntityEncode)
    }

    /// Unescapes `& " < >`.
    pub fn entity_decode(self) -> Self {
        self.push(OperationKind::EntityDecode)
    }

    /// Lowercases.
    pub fn to_lower(self) -> Self {
        self.push(OperationKind::ToLower)
    }

    /// Alias of [`Chain::to_lower`].
    pub fn to_lower_case(self) -> Self {
        self.to_lower()
    }

    /// Uppercases.
    pub fn to_upper(self) -> Self {
        self.push(OperationKind::ToUpper)
    }

    /// Alias of [`Chain::to_upper`].
    pub fn to_upper_case(self) -> Self {
        self.to_upper()
    }

    /// Truncates to `length` characters, ellipsis included.
    pub fn truncate(self, length: usize) -> Self {
        self.push(OperationKind::Truncate(length))
    }

    // ── validators ──────────────────────────────────────────────────────

    /// Optional minus sign followed by digits.
    pub fn is_numeric(self) -> Self {
        self.push(OperationKind::IsNumeric)
    }

    /// Integer.
    pub fn is_int(self) -> Self {
        self.push(OperationKind::IsInt)
    }

    /// Decimal number.
    pub fn is_decimal(self) -> Self {
        self.push(OperationKind::IsDecimal)
    }

    /// Floating point number.
    pub fn is_float(self) -> Self {
        self.push(OperationKind::IsFloat)
    }

    /// Date or date-time.
    pub fn is_date(self) -> Self {
        self.push(OperationKind::IsDate)
    }

    /// Email address.
    pub fn is_email(self) -> Self {
        self.push(OperationKind::IsEmail)
    }

    /// URL.
    pub fn is_url(self) -> Self {
        self.push(OperationKind::IsUrl)
    }

    /// IP address.
    pub fn is_ip(self) -> Self {
        self.push(OperationKind::IsIp)
    }

    /// Letters only.
    pub fn is_alpha(self) -> Self {
        self.push(OperationKind::IsAlpha)
    }

    /// Letters and digits only.
    pub fn is_alphanumeric(self) -> Self {
        self.push(OperationKind::IsAlphanumeric)
    }

    /// No uppercase letters.
    pub fn is_lowercase(self) -> Self {
        self.push(OperationKind::IsLowercase)
    }

    /// No lowercase letters.
    pub fn is_uppercase(self) -> Self {
        self.push(OperationKind::IsUppercase)
    }

    /// Not blank.
    pub fn not_empty(self) -> Self {
        self.push(OperationKind::NotEmpty)
    }

    /// Equal to `other`, or to another field's raw value when `other` is a
    /// `field::<path>` token.
    pub fn equals(self, other: &str) -> Result<Self, DeclarationError> {
        Ok(self.push(OperationKind::Equals(Comparand::parse(other)?)))
    }

    /// Contains `needle`.
    pub fn contains(self, needle: impl Into<String>) -> Self {
        self.push(OperationKind::Contains(needle.into()))
    }

    /// Does not contain `needle`.
    pub fn not_contains(self, needle: impl Into<String>) -> Self {
        self.push(OperationKind::NotContains(needle.into()))
    }

    /// Matches a compiled pattern.
    pub fn regex(self, pattern: Regex) -> Self {
        self.push(OperationKind::Regex(pattern))
    }

    /// Alias of [`Chain::regex`].
    pub fn is(self, pattern: Regex) -> Self {
        self.regex(pattern)
    }

    /// Matches a pattern given as source text plus modifier letters
    /// (`i`, `m`, `s`, `x`; `g` is ignored).
    pub fn regex_str(self, pattern: &str, modifiers: &str) -> Result<Self, DeclarationError> {
        Ok(self.regex(compile_pattern(pattern, modifiers)?))
    }

    /// Does not match a compiled pattern.
    pub fn not_regex(self, pattern: Regex) -> Self {
        self.push(OperationKind::NotRegex(pattern))
    }

    /// Alias of [`Chain::not_regex`].
    #[allow(clippy::should_implement_trait)]
    pub fn not(self, pattern: Regex) -> Self {
        self.not_regex(pattern)
    }

    /// Does not match a pattern given as source text plus modifiers.
    pub fn not_regex_str(self, pattern: &str, modifiers: &str) -> Result<Self, DeclarationError> {
        Ok(self.not_regex(compile_pattern(pattern, modifiers)?))
    }

    /// At least `min` characters.
    pub fn min_length(self, min: usize) -> Self {
        self.push(OperationKind::MinLength(min))
    }

    /// At most `max` characters.
    pub fn max_length(self, max: usize) -> Self {
        self.push(OperationKind::MaxLength(max))
    }

    /// Present and non-empty.
    pub fn required(self) -> Self {
        self.push(OperationKind::Required(None))
    }

    /// Present, non-empty and different from `placeholder`.
    pub fn required_placeholder(self, placeholder: impl Into<String>) -> Self {
        self.push(OperationKind::Required(Some(placeholder.into())))
    }

    // ── array ───────────────────────────────────────────────────────────

    /// Coerces the value to a list; later operations apply per element.
    pub fn array(self) -> Self {
        self.push(OperationKind::Array(None))
    }

    /// Like [`Chain::array`], and checks `min <= len <= max`.
    pub fn array_bounded(self, min: usize, max: usize) -> Result<Self, DeclarationError> {
        Ok(self.push(OperationKind::Array(Some(checked_bounds(min, max)?))))
    }

    // ── hooks ───────────────────────────────────────────────────────────

    /// Runs a synchronous hook `fn(value, source) -> CustomOutcome`.
    pub fn custom<F>(self, hook: F) -> Self
    where
        F: Fn(&Value, &Value) -> CustomOutcome + Send + Sync + 'static,
    {
        self.push(OperationKind::Custom(CustomHook::sync(hook)))
    }

    /// Runs an asynchronous hook; the rest of the chain waits for it.
    pub fn custom_async<F, Fut>(self, hook: F) -> Self
    where
        F: Fn(Value, Arc<Value>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = CustomOutcome> + Send + 'static,
    {
        self.push(OperationKind::Custom(CustomHook::asynchronous(hook)))
    }

    // ── execution ───────────────────────────────────────────────────────

    /// Runs every operation against `raw` and returns the final value with
    /// the errors collected on the way.
    ///
    /// Fails only when broadcasting meets a nested array or object while
    /// the nested-array guard is enabled.
    pub async fn execute(
        &self,
        raw: Value,
        ctx: ExecutionContext<'_>,
    ) -> Result<ChainOutput, RunError> {
        let required = self.is_required();
        let mut working = Working::Single(raw);
        let mut errors = Vec::new();

        for op in &self.operations {
            trace!(field = %self.spec.path, operation = op.name(), "applying operation");

            if let OperationKind::Array(bounds) = op.kind() {
                let items = match std::mem::replace(&mut working, Working::Single(Value::Null)) {
                    Working::Single(value) => coerce_array(value),
                    Working::Broadcast(items) => items,
                };
                if let Some((min, max)) = bounds {
                    if !(*min..=*max).contains(&items.len()) {
                        errors.push(self.error(op, &[]));
                    }
                }
                working = Working::Broadcast(items);
                continue;
            }

            let is_required_op = matches!(op.kind(), OperationKind::Required(_));
            match &mut working {
                Working::Broadcast(items) if is_required_op && items.is_empty() => {
                    errors.push(self.error(op, &[]));
                }
                Working::Single(value) => {
                    self.apply(op, value, ctx, required, &mut errors).await;
                }
                Working::Broadcast(items) => {
                    for item in items.iter_mut() {
                        if is_compound(item) && ctx.config.throw_nested_array_error {
                            return Err(RunError::UnsupportedNestedArray {
                                field: self.spec.path.to_string(),
                                operation: op.name(),
                            });
                        }
                        self.apply(op, item, ctx, required, &mut errors).await;
                    }
                }
            }
        }

        let value = match working {
            Working::Single(value) => value,
            Working::Broadcast(items) => Value::Array(items),
        };
        Ok(ChainOutput { value, errors })
    }

    /// Applies one non-array operation to one value.
    async fn apply(
        &self,
        op: &Operation,
        value: &mut Value,
        ctx: ExecutionContext<'_>,
        required: bool,
        errors: &mut Vec<FieldError>,
    ) {
        match op.kind().family() {
            Family::Filter => {
                if let Some(filtered) = op.kind().filter(value) {
                    *value = filtered;
                }
            }
            Family::Validator => {
                if let Some(extra) = op.kind().check(value, ctx.merged) {
                    let extra: Vec<&str> = extra.iter().map(String::as_str).collect();
                    errors.push(self.error(op, &extra));
                    trace!(field = %self.spec.path, operation = op.name(), "check failed");
                }
            }
            Family::Hook => {
                let OperationKind::Custom(hook) = op.kind() else {
                    return;
                };
                let was_empty = is_empty(value);
                match hook.call(value, ctx.source).await {
                    CustomOutcome::Unchanged => {}
                    CustomOutcome::Replace(replacement) => *value = replacement,
                    CustomOutcome::Fail(message) => {
                        if was_empty && !required && !self.validate_custom_if_empty {
                            debug!(
                                field = %self.spec.path,
                                %message,
                                "custom failure dropped for empty optional field"
                            );
                            return;
                        }
                        let template = op.message_template().unwrap_or(message.as_str());
                        errors.push(FieldError::new(
                            self.spec.path.to_string(),
                            &self.spec.label,
                            op.name(),
                            render(template, &[&self.spec.label]),
                        ));
                    }
                }
            }
            // Array coercion acts on the whole value in `execute`.
            Family::Array => {}
        }
    }

    fn error(&self, op: &Operation, extra: &[&str]) -> FieldError {
        let mut args = Vec::with_capacity(extra.len() + 1);
        args.push(self.spec.label.as_str());
        args.extend_from_slice(extra);

        let template = op.message_template().unwrap_or("%s is invalid");
        FieldError::new(
            self.spec.path.to_string(),
            &self.spec.label,
            op.name(),
            render(template, &args),
        )
    }
}

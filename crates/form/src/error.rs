//! Error types for form processing
//!
//! Two kinds of failure exist and they travel differently:
//!
//! - **Hard failures** ([`DeclarationError`], [`RunError`]) are developer
//!   mistakes. They are returned as `Err` and abort chain construction or the
//!   whole run.
//! - **Soft failures** ([`FieldError`]) are per-field validation outcomes.
//!   They are plain data, collected in order into the report and never
//!   returned as `Err`.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// DECLARATION ERRORS
// ============================================================================

/// A mistake in how a field chain was declared.
///
/// Raised while the chain is being built, so it surfaces before any request
/// data is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DeclarationError {
    /// The field path could not be parsed.
    #[error("invalid field path '{path}': {reason}")]
    PathSyntax {
        /// The path as written by the caller.
        path: String,
        /// What is wrong with it.
        reason: Cow<'static, str>,
    },

    /// No operation is registered under this name or alias.
    #[error("unknown operation '{name}'")]
    UnknownOperation {
        /// The name that failed to resolve.
        name: String,
    },

    /// An operation was given arguments it cannot accept.
    #[error("invalid argument for '{operation}': {reason}")]
    InvalidArgument {
        /// Canonical name of the operation.
        operation: &'static str,
        /// What is wrong with the arguments.
        reason: String,
    },
}

impl DeclarationError {
    pub(crate) fn path_syntax(
        path: impl Into<String>,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::PathSyntax {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_argument(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// RUN ERRORS
// ============================================================================

/// A failure that aborts a whole run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RunError {
    /// An array-broadcast operation met an element that is itself an array
    /// or an object while the nested-array guard was enabled.
    #[error("field '{field}' contains a nested array or object; '{operation}' cannot broadcast over it")]
    UnsupportedNestedArray {
        /// Dotted path of the field.
        field: String,
        /// Canonical name of the operation that tried to broadcast.
        operation: &'static str,
    },
}

/// Any hard failure produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// See [`DeclarationError`].
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    /// See [`RunError`].
    #[error(transparent)]
    Run(#[from] RunError),
}

// ============================================================================
// FIELD ERRORS
// ============================================================================

/// A recoverable validation failure for one field (or one element of an
/// array field).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the field, e.g. `user.email`.
    pub path: String,

    /// Display name of the field.
    pub label: String,

    /// Canonical name of the operation that failed, e.g. `isEmail`.
    pub code: Cow<'static, str>,

    /// Rendered, human-readable message.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    pub fn new(
        path: impl Into<String>,
        label: impl Into<String>,
        code: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.path, self.code, self.message)
    }
}

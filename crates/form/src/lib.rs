//! # nebula-form
//!
//! Declarative filtering and validation of request fields.
//!
//! A form is a list of field chains. Each chain names a field path and an
//! ordered list of operations: filters that rewrite the value, validators
//! that record errors, array coercion that broadcasts later steps over
//! elements, and custom hooks (sync or async). Running a form against the
//! request's named data sources produces cleaned values plus every error,
//! in declaration order.
//!
//! ## Quick Start
//!
//! ```rust
//! use nebula_form::prelude::*;
//! use serde_json::json;
//!
//! let form = Form::new(FormConfig::default())
//!     .field(field("username").unwrap().trim().required().regex_str("^[a-z]+$", "i").unwrap())
//!     .field(field("password").unwrap().trim().required().regex_str("^[0-9]+$", "").unwrap())
//!     .field(field_labeled("password_confirmation", "Confirmation").unwrap()
//!         .equals("field::password").unwrap());
//!
//! let sources = DataSources::new().with("body", json!({
//!     "username": " Admin ",
//!     "password": "12345",
//!     "password_confirmation": "12345",
//! }));
//!
//! let report = form.run_blocking(&sources).unwrap();
//! assert!(report.is_valid());
//! assert_eq!(report.values["username"], json!("Admin"));
//! ```
//!
//! ## Failure modes
//!
//! - Malformed paths, unknown operation names and bad arguments fail while
//!   declaring a chain with [`DeclarationError`].
//! - Failed validators become [`FieldError`]s in the [`FormReport`]; they
//!   never stop a run.
//! - Broadcasting over a nested array or object aborts the run with
//!   [`RunError::UnsupportedNestedArray`] unless the guard is disabled in
//!   [`FormConfig`].

pub mod chain;
pub mod config;
pub mod error;
pub mod form;
pub mod message;
pub mod operation;
pub mod path;
pub mod prelude;
pub mod source;
pub mod value;

pub use chain::{Chain, ChainOutput, ExecutionContext, FieldSpec, field, field_labeled};
pub use config::{FormConfig, configure, default_config};
pub use error::{DeclarationError, Error, FieldError, RunError};
pub use form::{Form, FormReport, run_form};
pub use operation::{CustomHook, CustomOutcome, Operation, OperationKind};
pub use path::FieldPath;
pub use source::{DataSources, MergedSource};

/// Result type for fallible crate operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

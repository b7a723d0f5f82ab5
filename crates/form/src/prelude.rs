//! Prelude module for convenient imports.
//!
//! ```rust
//! use nebula_form::prelude::*;
//!
//! let chain = field("email").unwrap().trim().to_lower().is_email();
//! let form = Form::default().field(chain);
//! assert_eq!(form.chains().len(), 1);
//! ```

pub use crate::chain::{Chain, field, field_labeled};
pub use crate::config::{FormConfig, configure, default_config};
pub use crate::error::{DeclarationError, Error, FieldError, RunError};
pub use crate::form::{Form, FormReport, run_form};
pub use crate::operation::{CustomOutcome, OperationKind};
pub use crate::source::DataSources;

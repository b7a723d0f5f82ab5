//! Form runner
//!
//! A [`Form`] owns a list of chains and the configuration it was built
//! with. Running it against a request's [`DataSources`] resolves each
//! field, runs all chains concurrently and assembles a [`FormReport`].
//!
//! Errors in the report are ordered by field declaration, then by
//! operation declaration, no matter in which order asynchronous hooks
//! complete.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::chain::{Chain, ExecutionContext};
use crate::config::{FormConfig, default_config};
use crate::error::{FieldError, RunError};
use crate::operation::filters::auto_trim;
use crate::source::{DataSources, MergedSource, fill_missing};

// ============================================================================
// REPORT
// ============================================================================

/// The outcome of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormReport {
    /// Nested object with a value at every declared field path.
    pub values: Value,
    /// Every field error, in declaration order.
    pub errors: Vec<FieldError>,
}

impl FormReport {
    /// Returns the output values.
    pub fn values(&self) -> &Value {
        &self.values
    }

    /// Returns all errors.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns true when no field error was recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the errors recorded for the field at `path` (dotted form).
    pub fn errors_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.path == path)
    }

    /// Splits the report into values and errors.
    pub fn into_parts(self) -> (Value, Vec<FieldError>) {
        (self.values, self.errors)
    }
}

// ============================================================================
// FORM
// ============================================================================

/// A set of field chains plus the configuration they run under.
///
/// ```rust
/// use nebula_form::{DataSources, Form, FormConfig, field};
/// use serde_json::json;
///
/// let form = Form::new(FormConfig::default())
///     .field(field("username").unwrap().trim().required())
///     .field(field("age").unwrap().to_int());
///
/// let sources = DataSources::new().with("body", json!({"username": " ada ", "age": "36"}));
/// let report = form.run_blocking(&sources).unwrap();
///
/// assert!(report.is_valid());
/// assert_eq!(report.values, json!({"username": "ada", "age": 36}));
/// ```
#[derive(Debug, Clone)]
pub struct Form {
    chains: Vec<Chain>,
    config: Arc<FormConfig>,
}

impl Default for Form {
    /// An empty form using a snapshot of the process-wide default
    /// configuration.
    fn default() -> Self {
        Self {
            chains: Vec::new(),
            config: default_config(),
        }
    }
}

impl Form {
    /// Creates an empty form with an explicit configuration.
    pub fn new(config: FormConfig) -> Self {
        Self {
            chains: Vec::new(),
            config: Arc::new(config),
        }
    }

    /// Adds a field.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, chain: Chain) -> Self {
        self.chains.push(chain);
        self
    }

    /// Adds several fields, in order.
    #[must_use = "builder methods must be chained or built"]
    pub fn fields(mut self, chains: impl IntoIterator<Item = Chain>) -> Self {
        self.chains.extend(chains);
        self
    }

    /// Returns the declared chains.
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// Returns the configuration this form runs with.
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Runs every chain against `sources`.
    #[instrument(skip_all, fields(fields = self.chains.len()))]
    pub async fn run(&self, sources: &DataSources) -> Result<FormReport, RunError> {
        run_form(sources, &self.chains, &self.config).await
    }

    /// Runs the form on the current thread, for callers without an async
    /// runtime.
    ///
    /// Asynchronous hooks that rely on a specific runtime (timers, I/O)
    /// need [`Form::run`] inside that runtime instead.
    pub fn run_blocking(&self, sources: &DataSources) -> Result<FormReport, RunError> {
        futures::executor::block_on(self.run(sources))
    }
}

/// Runs `chains` against `sources` under `config`.
///
/// Each field's raw value is looked up across `config.data_sources`; a
/// missing field starts out as `""`. All chains are polled together and
/// their results are joined in declaration order.
pub async fn run_form(
    sources: &DataSources,
    chains: &[Chain],
    config: &FormConfig,
) -> Result<FormReport, RunError> {
    let merged = MergedSource::new(sources, &config.data_sources);
    let source = Arc::new(merged.to_value());
    let ctx = ExecutionContext {
        merged: &merged,
        source: &source,
        config,
    };

    let pending = chains.iter().map(|chain| {
        let raw = merged
            .resolve(chain.path())
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()));
        let raw = if config.auto_trim { auto_trim(raw) } else { raw };
        chain.execute(raw, ctx)
    });
    let outputs = try_join_all(pending).await?;

    let mut values = Value::Object(Map::new());
    let mut errors = Vec::new();
    for (chain, output) in chains.iter().zip(outputs) {
        debug!(
            field = %chain.path(),
            errors = output.errors.len(),
            "field processed"
        );
        chain.path().set(&mut values, output.value);
        errors.extend(output.errors);
    }

    if config.pass_through {
        fill_missing(&mut values, &source);
    }

    Ok(FormReport { values, errors })
}

//! Form configuration
//!
//! [`FormConfig`] is a plain value threaded into every run. A process-wide
//! default exists for convenience: set it once at startup with
//! [`configure`], read it with [`default_config`]. A [`Form`](crate::Form)
//! snapshots the default when it is built, so reconfiguring never affects a
//! run that is already in flight.

use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: LazyLock<ArcSwap<FormConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(FormConfig::default()));

/// Options recognised by the form runner.
///
/// Deserializes from camelCase keys so it can be loaded straight from the
/// same configuration documents a web adapter uses. Missing keys take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormConfig {
    /// Forwarded to the web adapter; unused by the core.
    pub flash_errors: bool,

    /// Forwarded to the web adapter; unused by the core.
    pub auto_locals: bool,

    /// Source names to look values up in, highest priority first.
    pub data_sources: Vec<String>,

    /// Trim every string value before its chain runs.
    pub auto_trim: bool,

    /// Copy undeclared raw keys into the output values.
    pub pass_through: bool,

    /// Abort the run when an array-broadcast operation meets a nested array
    /// or object.
    pub throw_nested_array_error: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            flash_errors: true,
            auto_locals: true,
            data_sources: vec!["body".into(), "query".into(), "params".into()],
            auto_trim: false,
            pass_through: false,
            throw_nested_array_error: true,
        }
    }
}

impl FormConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source lookup order.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_data_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables automatic trimming.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_auto_trim(mut self, enabled: bool) -> Self {
        self.auto_trim = enabled;
        self
    }

    /// Enables or disables pass-through of undeclared keys.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_pass_through(mut self, enabled: bool) -> Self {
        self.pass_through = enabled;
        self
    }

    /// Enables or disables the nested-array guard.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_nested_array_guard(mut self, enabled: bool) -> Self {
        self.throw_nested_array_error = enabled;
        self
    }

    /// Sets the adapter-only flags.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_adapter_flags(mut self, flash_errors: bool, auto_locals: bool) -> Self {
        self.flash_errors = flash_errors;
        self.auto_locals = auto_locals;
        self
    }
}

/// Replaces the process-wide default configuration.
///
/// Call this during startup. Forms built afterwards pick up the new value;
/// forms already built keep the snapshot they took.
pub fn configure(config: FormConfig) {
    tracing::debug!(?config, "form defaults replaced");
    DEFAULT_CONFIG.store(Arc::new(config));
}

/// Returns the current process-wide default configuration.
pub fn default_config() -> Arc<FormConfig> {
    DEFAULT_CONFIG.load_full()
}

//! User-supplied hooks
//!
//! A hook sees the working value and the merged raw source, and answers
//! with a [`CustomOutcome`]: keep the value, replace it, or fail with a
//! message. Hooks come in a synchronous and an asynchronous flavor; the
//! chain awaits asynchronous ones before moving to its next operation.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

/// What a custom hook decided.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomOutcome {
    /// Leave the working value as it is.
    Unchanged,
    /// Replace the working value.
    Replace(Value),
    /// Record a field error. `%s` in the message is replaced by the label.
    Fail(String),
}

impl CustomOutcome {
    /// Shorthand for [`CustomOutcome::Fail`].
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

/// `Ok(None)` keeps the value, `Ok(Some(v))` replaces it, `Err(e)` fails
/// with `e`'s display text.
impl<E: fmt::Display> From<Result<Option<Value>, E>> for CustomOutcome {
    fn from(result: Result<Option<Value>, E>) -> Self {
        match result {
            Ok(None) => Self::Unchanged,
            Ok(Some(value)) => Self::Replace(value),
            Err(err) => Self::Fail(err.to_string()),
        }
    }
}

type SyncHook = dyn Fn(&Value, &Value) -> CustomOutcome + Send + Sync;
type AsyncHook = dyn Fn(Value, Arc<Value>) -> BoxFuture<'static, CustomOutcome> + Send + Sync;

/// A custom hook bound into a chain.
#[derive(Clone)]
pub enum CustomHook {
    /// Runs inline.
    Sync(Arc<SyncHook>),
    /// Suspends the chain until its future resolves.
    Async(Arc<AsyncHook>),
}

impl CustomHook {
    /// Wraps a synchronous hook `fn(value, source) -> outcome`.
    pub fn sync<F>(hook: F) -> Self
    where
        F: Fn(&Value, &Value) -> CustomOutcome + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(hook))
    }

    /// Wraps an asynchronous hook `async fn(value, source) -> outcome`.
    pub fn asynchronous<F, Fut>(hook: F) -> Self
    where
        F: Fn(Value, Arc<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CustomOutcome> + Send + 'static,
    {
        Self::Async(Arc::new(move |value, source| hook(value, source).boxed()))
    }

    /// Returns true for asynchronous hooks.
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }

    /// Runs the hook.
    pub async fn call(&self, value: &Value, source: &Arc<Value>) -> CustomOutcome {
        match self {
            Self::Sync(hook) => hook(value, source.as_ref()),
            Self::Async(hook) => hook(value.clone(), Arc::clone(source)).await,
        }
    }
}

impl fmt::Debug for CustomHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("CustomHook::Sync(<function>)"),
            Self::Async(_) => f.write_str("CustomHook::Async(<function>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcome_from_result() {
        let ok: Result<Option<Value>, String> = Ok(None);
        assert_eq!(CustomOutcome::from(ok), CustomOutcome::Unchanged);

        let replaced: Result<Option<Value>, String> = Ok(Some(json!(1)));
        assert_eq!(CustomOutcome::from(replaced), CustomOutcome::Replace(json!(1)));

        let failed: Result<Option<Value>, String> = Err("%s is taken".into());
        assert_eq!(CustomOutcome::from(failed), CustomOutcome::fail("%s is taken"));
    }

    #[tokio::test]
    async fn sync_hook_sees_value_and_source() {
        let hook = CustomHook::sync(|value, source| {
            if value == &source["expected"] {
                CustomOutcome::Unchanged
            } else {
                CustomOutcome::fail("mismatch")
            }
        });
        let source = Arc::new(json!({"expected": "a"}));

        assert!(!hook.is_async());
        assert_eq!(hook.call(&json!("a"), &source).await, CustomOutcome::Unchanged);
        assert_eq!(
            hook.call(&json!("b"), &source).await,
            CustomOutcome::fail("mismatch")
        );
    }

    #[tokio::test]
    async fn async_hook_resolves() {
        let hook = CustomHook::asynchronous(|value, _source| async move {
            tokio::task::yield_now().await;
            CustomOutcome::Replace(json!(format!("{}!", value.as_str().unwrap_or_default())))
        });

        assert!(hook.is_async());
        assert_eq!(
            hook.call(&json!("hi"), &Arc::new(json!({}))).await,
            CustomOutcome::Replace(json!("hi!"))
        );
        assert_eq!(format!("{hook:?}"), "CustomHook::Async(<function>)");
    }
}

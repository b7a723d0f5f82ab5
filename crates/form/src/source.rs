//! Named data sources and their prioritised, merged view

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::path::FieldPath;

/// Raw request data keyed by source name (`body`, `query`, `params`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSources {
    sources: IndexMap<String, Value>,
}

impl DataSources {
    /// Creates an empty set of sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a named source.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, name: impl Into<String>, data: Value) -> Self {
        self.insert(name, data);
        self
    }

    /// Adds (or replaces) a named source in place.
    pub fn insert(&mut self, name: impl Into<String>, data: Value) {
        self.sources.insert(name.into(), data);
    }

    /// Returns the source with the given name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.sources.get(name)
    }

    /// Returns the number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true when no source has been added.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for DataSources {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            sources: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A read-only, prioritised view over several [`DataSources`] entries.
///
/// Lookups try each configured source in order and return the first one
/// where the path is defined. Source names that were not supplied are
/// skipped.
#[derive(Debug, Clone)]
pub struct MergedSource<'a> {
    layers: Vec<&'a Value>,
}

impl<'a> MergedSource<'a> {
    /// Builds the view for `order`, highest priority first.
    pub fn new<S: AsRef<str>>(sources: &'a DataSources, order: &[S]) -> Self {
        let layers = order
            .iter()
            .filter_map(|name| sources.get(name.as_ref()))
            .collect();
        Self { layers }
    }

    /// Resolves `path` against the layers, first match wins.
    pub fn resolve(&self, path: &FieldPath) -> Option<&'a Value> {
        self.layers.iter().find_map(|layer| path.get(*layer))
    }

    /// Builds one merged object out of all layers.
    ///
    /// Objects are merged key by key, recursively; for any other conflict
    /// the higher-priority layer wins. Non-object layers are ignored.
    pub fn to_value(&self) -> Value {
        let mut merged = Value::Object(Map::new());
        for layer in &self.layers {
            if layer.is_object() {
                fill_missing(&mut merged, layer);
            }
        }
        merged
    }
}

/// Copies every key of `from` that `into` does not already have, recursing
/// into objects present on both sides.
pub(crate) fn fill_missing(into: &mut Value, from: &Value) {
    let (Value::Object(target), Value::Object(source)) = (into, from) else {
        return;
    };
    for (key, value) in source {
        match target.get_mut(key) {
            Some(existing) => fill_missing(existing, value),
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

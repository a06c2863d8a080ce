//! The path-keyed error map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tree::{FieldPath, Value, path::normalize_path};

/// Path-keyed field errors.
///
/// Only values that signal an error (see [`Value::is_error`]) are stored: writing `Null`
/// or `false` for a path removes its entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<String, Value>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the error stored for exactly `path`.
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        self.0.get(path.as_str())
    }

    /// Stores `error` for `path`, or removes the entry if `error` is not an error.
    pub fn set(&mut self, path: &FieldPath, error: impl Into<Value>) {
        let error = error.into();
        if error.is_error() {
            self.0.insert(path.as_str().to_string(), error);
        } else {
            self.0.remove(path.as_str());
        }
    }

    pub fn remove(&mut self, path: &FieldPath) -> Option<Value> {
        self.0.remove(path.as_str())
    }

    pub fn contains(&self, path: &FieldPath) -> bool {
        self.0.contains_key(path.as_str())
    }

    /// Returns the error for `path` itself, or else the first error below it.
    pub fn find_at_or_below(&self, path: &FieldPath) -> Option<(&str, &Value)> {
        if let Some((key, error)) = self.0.get_key_value(path.as_str()) {
            return Some((key.as_str(), error));
        }
        self.0
            .iter()
            .find(|(key, _)| FieldPath::parse(key).starts_with(path))
            .map(|(key, error)| (key.as_str(), error))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, error)| (key.as_str(), error))
    }

    pub(crate) fn entries_mut(&mut self) -> &mut BTreeMap<String, Value> {
        &mut self.0
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for ErrorMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, error)| (normalize_path(key.as_ref()), error.into()))
                .filter(|(_, error)| error.is_error())
                .collect(),
        )
    }
}

impl<K: AsRef<str>, V: Into<Value>, const N: usize> From<[(K, V); N]> for ErrorMap {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl From<ErrorMap> for Value {
    fn from(errors: ErrorMap) -> Self {
        errors.0.into_iter().collect()
    }
}

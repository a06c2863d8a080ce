//! Touched and dirty tracking.
//!
//! Both statuses are path-keyed maps of explicit overrides. A path with no entry derives
//! its status from data: touched falls back to "some descendant is touched", dirty falls
//! back to a deep comparison between the current values and the snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::tree::{FieldPath, Value, get_path, path::normalize_path};

/// The status of one path in a [`StatusMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// No override; the status is derived from data
    #[default]
    Unset,
    /// Explicitly set
    Explicit(bool),
}

impl Status {
    /// Returns the override, if any.
    pub fn explicit(self) -> Option<bool> {
        match self {
            Status::Unset => None,
            Status::Explicit(value) => Some(value),
        }
    }
}

/// Path-keyed explicit status overrides.
///
/// Keys are normalized path strings, the same strings [`FieldPath::as_str`] produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusMap(BTreeMap<String, bool>);

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the override stored for exactly `path`.
    pub fn get(&self, path: &FieldPath) -> Status {
        self.0
            .get(path.as_str())
            .copied()
            .map_or(Status::Unset, Status::Explicit)
    }

    pub fn set(&mut self, path: &FieldPath, value: bool) {
        self.0.insert(path.as_str().to_string(), value);
    }

    /// Removes the override for exactly `path`.
    pub fn unset(&mut self, path: &FieldPath) -> Status {
        self.0
            .remove(path.as_str())
            .map_or(Status::Unset, Status::Explicit)
    }

    /// Removes every override strictly below `path`.
    pub fn clear_descendants(&mut self, path: &FieldPath) {
        self.0
            .retain(|key, _| !FieldPath::parse(key).is_descendant_of(path));
    }

    /// Returns true if some override strictly below `path` is `true`.
    pub fn any_descendant(&self, path: &FieldPath) -> bool {
        self.0
            .iter()
            .any(|(key, value)| *value && FieldPath::parse(key).is_descendant_of(path))
    }

    /// Returns true if any override is `true`.
    pub fn any(&self) -> bool {
        self.0.values().any(|value| *value)
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

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub(crate) fn entries_mut(&mut self) -> &mut BTreeMap<String, bool> {
        &mut self.0
    }
}

impl<K: AsRef<str>> FromIterator<(K, bool)> for StatusMap {
    fn from_iter<T: IntoIterator<Item = (K, bool)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (normalize_path(key.as_ref()), value))
                .collect(),
        )
    }
}

impl<K: AsRef<str>, const N: usize> From<[(K, bool); N]> for StatusMap {
    fn from(entries: [(K, bool); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Holds the touched and dirty overrides of a form.
///
/// The tracker does not own the values; operations that derive dirty status take the
/// current values and the snapshot as arguments.
#[derive(Debug, Clone, Default)]
pub struct StatusTracker {
    touched: StatusMap,
    dirty: StatusMap,
}

impl StatusTracker {
    pub fn new(touched: StatusMap, dirty: StatusMap) -> Self {
        Self { touched, dirty }
    }

    /// The touched overrides.
    pub fn touched(&self) -> &StatusMap {
        &self.touched
    }

    /// The dirty overrides.
    pub fn dirty(&self) -> &StatusMap {
        &self.dirty
    }

    /// Returns whether `path` is touched, or whether anything is touched for `None`.
    ///
    /// An explicit override for `path` wins; otherwise the path counts as touched when any
    /// path below it is.
    pub fn is_touched(&self, path: Option<&FieldPath>) -> bool {
        match path {
            None => self.touched.any(),
            Some(path) => self
                .touched
                .get(path)
                .explicit()
                .unwrap_or_else(|| self.touched.any_descendant(path)),
        }
    }

    /// Returns whether `path` is dirty, or whether the form is dirty for `None`.
    ///
    /// With a path, an explicit override wins; otherwise the value at `path` is compared
    /// with the snapshot. Without a path, a non-empty override map answers with the OR of
    /// its entries and an empty one falls back to comparing the whole trees.
    pub fn is_dirty(&self, path: Option<&FieldPath>, values: &Value, snapshot: &Value) -> bool {
        match path {
            None if !self.dirty.is_empty() => self.dirty.any(),
            None => values != snapshot,
            Some(path) => self
                .dirty
                .get(path)
                .explicit()
                .unwrap_or_else(|| get_path(path, values) != get_path(path, snapshot)),
        }
    }

    /// Sets the touched override for `path`.
    ///
    /// Returns false, and changes nothing, when `path` already reads as `value`.
    pub fn set_field_touched(&mut self, path: &FieldPath, value: bool) -> bool {
        if self.is_touched(Some(path)) == value {
            return false;
        }
        trace!(path = %path, value, "Field touched");
        self.touched.set(path, value);
        true
    }

    /// Sets the dirty override for `path`.
    ///
    /// Returns false, and changes nothing, when `path` already reads as `value`.
    pub fn set_field_dirty(
        &mut self,
        path: &FieldPath,
        value: bool,
        values: &Value,
        snapshot: &Value,
    ) -> bool {
        if self.is_dirty(Some(path), values, snapshot) == value {
            return false;
        }
        trace!(path = %path, value, "Field dirty");
        self.dirty.set(path, value);
        true
    }

    /// Records the dirty status of `path` after it was written with `value`.
    ///
    /// Overrides below `path` are dropped first: they described the old value.
    pub fn set_calculated_field_dirty(&mut self, path: &FieldPath, value: &Value, snapshot: &Value) {
        let dirty = get_path(path, snapshot) != Some(value);
        self.dirty.clear_descendants(path);
        self.dirty.set(path, dirty);
    }

    /// Drops the dirty override of `path` itself so it derives from data again.
    pub fn clear_field_dirty(&mut self, path: &FieldPath) {
        self.dirty.unset(path);
    }

    /// Replaces the dirty overrides.
    pub fn set_dirty(&mut self, dirty: StatusMap) {
        self.dirty = dirty;
    }

    /// Replaces the touched overrides.
    pub fn set_touched(&mut self, touched: StatusMap) {
        self.touched = touched;
    }

    /// Clears the dirty overrides. The caller re-baselines the snapshot.
    pub fn reset_dirty(&mut self) {
        self.dirty.clear();
    }

    pub fn reset_touched(&mut self) {
        self.touched.clear();
    }

    pub(crate) fn maps_mut(&mut self) -> (&mut StatusMap, &mut StatusMap) {
        (&mut self.touched, &mut self.dirty)
    }
}

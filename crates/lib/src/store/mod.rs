//! The values store: current values, the reactive copy, and the dirty baseline.
//!
//! [`ValuesStore`] holds three trees:
//!
//! - the backing values, always current, used by every read;
//! - the state values, the copy the reactive layer renders from, only refreshed when a
//!   write asks for it (`update_state`);
//! - the snapshot, the last committed/initial values used as the dirty baseline.
//!
//! The snapshot is replaced wholesale and never edited in place.

use std::{fmt, rc::Rc};

use tracing::{trace, warn};

use crate::tree::{FieldPath, Value, get_path, try_set_path};

/// Callback invoked with `(updated, previous)` after every values write.
pub type ValuesChangeHook = Rc<dyn Fn(&Value, &Value)>;

/// One-shot callback invoked with the change produced by a single write.
pub type ValuesSubscriber = Box<dyn FnOnce(&ValuesChange)>;

/// The before/after pair produced by one write to the store.
#[derive(Debug, Clone)]
pub struct ValuesChange {
    /// Values before the write
    pub previous: Value,
    /// Values after the write
    pub updated: Value,
}

impl ValuesChange {
    /// Returns true if the value at `path` differs between the two trees.
    pub fn changed_at(&self, path: &FieldPath) -> bool {
        get_path(path, &self.previous) != get_path(path, &self.updated)
    }
}

/// Input for [`ValuesStore::set_values`].
pub struct SetValues {
    /// New values, or a partial object when merging
    pub values: Value,
    /// Shallow-merge `values` over the previous values instead of replacing them
    pub merge_with_previous: bool,
    /// Also refresh the state values consumed by the reactive layer
    pub update_state: bool,
    /// One-shot callbacks invoked with the resulting change
    pub subscribers: Vec<ValuesSubscriber>,
}

impl SetValues {
    /// Replaces the values entirely.
    pub fn replace(values: impl Into<Value>) -> Self {
        Self {
            values: values.into(),
            merge_with_previous: false,
            update_state: true,
            subscribers: Vec::new(),
        }
    }

    /// Shallow-merges `values` over the previous values.
    pub fn merge(values: impl Into<Value>) -> Self {
        Self {
            merge_with_previous: true,
            ..Self::replace(values)
        }
    }

    /// Sets whether the state values are refreshed.
    pub fn update_state(mut self, update_state: bool) -> Self {
        self.update_state = update_state;
        self
    }

    /// Adds a one-shot subscriber.
    pub fn subscriber(mut self, subscriber: impl FnOnce(&ValuesChange) + 'static) -> Self {
        self.subscribers.push(Box::new(subscriber));
        self
    }
}

/// Holds the current values, the reactive copy and the snapshot of a form.
pub struct ValuesStore {
    values: Value,
    state: Value,
    snapshot: Value,
    on_values_change: Option<ValuesChangeHook>,
}

impl ValuesStore {
    /// Creates a store whose values, state and snapshot all start at `initial`.
    pub fn new(initial: impl Into<Value>) -> Self {
        let initial = initial.into();
        Self {
            values: initial.clone(),
            state: initial.clone(),
            snapshot: initial,
            on_values_change: None,
        }
    }

    /// Installs the hook invoked after every write.
    pub fn with_on_values_change(mut self, hook: Option<ValuesChangeHook>) -> Self {
        self.on_values_change = hook;
        self
    }

    /// Current values. Always up to date, whatever the form mode.
    pub fn values(&self) -> &Value {
        &self.values
    }

    /// The values last pushed to the reactive layer.
    pub fn state_values(&self) -> &Value {
        &self.state
    }

    /// The dirty baseline.
    pub fn values_snapshot(&self) -> &Value {
        &self.snapshot
    }

    /// Replaces the dirty baseline.
    pub fn set_values_snapshot(&mut self, snapshot: impl Into<Value>) {
        self.snapshot = snapshot.into();
    }

    /// Writes new values and reports the change.
    ///
    /// The hook and the one-shot subscribers are invoked, in that order, before this
    /// returns, even when the new values equal the old ones.
    pub fn set_values(&mut self, input: SetValues) -> ValuesChange {
        let SetValues {
            values,
            merge_with_previous,
            update_state,
            subscribers,
        } = input;

        let previous = self.values.clone();
        let updated = if merge_with_previous {
            previous.merged_with(&values)
        } else {
            values
        };

        self.values = updated.clone();
        if update_state {
            self.state = updated.clone();
        }
        trace!(merge_with_previous, update_state, "Values written");

        if let Some(hook) = &self.on_values_change {
            hook(&updated, &previous);
        }

        let change = ValuesChange { previous, updated };
        for subscriber in subscribers {
            subscriber(&change);
        }
        change
    }

    /// Writes `value` at `path`.
    ///
    /// Returns `None`, without touching anything or invoking any hook, when the value at
    /// `path` already equals `value` or when `path` is out of reach (see [`try_set_path`]).
    pub fn set_field_value(
        &mut self,
        path: &FieldPath,
        value: Value,
        update_state: bool,
    ) -> Option<ValuesChange> {
        if get_path(path, &self.values).is_some_and(|current| current == &value) {
            trace!(path = %path, "Field value unchanged");
            return None;
        }

        let Some(updated) = try_set_path(path, value, &self.values) else {
            warn!(path = %path, "List index out of reach, ignoring write");
            return None;
        };
        Some(self.set_values(SetValues::replace(updated).update_state(update_state)))
    }

    /// Replaces the values with the snapshot.
    pub fn reset_values(&mut self, update_state: bool) -> ValuesChange {
        let snapshot = self.snapshot.clone();
        self.set_values(SetValues::replace(snapshot).update_state(update_state))
    }
}

impl fmt::Debug for ValuesStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesStore")
            .field("values", &self.values)
            .field("state", &self.state)
            .field("snapshot", &self.snapshot)
            .field("on_values_change", &self.on_values_change.is_some())
            .finish()
    }
}

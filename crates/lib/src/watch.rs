//! Path watchers.
//!
//! [`WatchRegistry`] keeps, per path, the callbacks registered with
//! [`WatchRegistry::watch`], in registration order. After a commit the form asks the
//! registry to notify: every watched path whose value differs between the previous and the
//! updated tree has its callbacks invoked with a [`FieldChange`].
//!
//! The callback lists are copied before any callback runs, so a callback may unsubscribe
//! itself or others without affecting the pass in progress.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt,
    rc::{Rc, Weak},
};

use tracing::trace;

use crate::{
    list::IndexRemap,
    tree::{FieldPath, Value, get_path},
};

/// What a watcher receives.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// The watched path
    pub path: FieldPath,
    /// Value before the commit; `None` if the path did not resolve
    pub previous_value: Option<Value>,
    /// Value after the commit; `None` if the path does not resolve
    pub value: Option<Value>,
    /// Touched status after the commit
    pub touched: bool,
    /// Dirty status after the commit
    pub dirty: bool,
}

pub type WatchCallback = Rc<dyn Fn(&FieldChange)>;

#[derive(Default)]
struct Watchers {
    next_id: u64,
    by_path: BTreeMap<String, Vec<(u64, WatchCallback)>>,
}

/// Path-keyed watch callbacks.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct WatchRegistry {
    inner: Rc<RefCell<Watchers>>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for `path`. Dropping the returned [`Subscription`] does not
    /// unsubscribe; call [`Subscription::unsubscribe`].
    pub fn watch(&self, path: &FieldPath, callback: impl Fn(&FieldChange) + 'static) -> Subscription {
        let mut watchers = self.inner.borrow_mut();
        let id = watchers.next_id;
        watchers.next_id += 1;
        watchers
            .by_path
            .entry(path.as_str().to_string())
            .or_default()
            .push((id, Rc::new(callback)));
        trace!(path = %path, id, "Watcher registered");

        Subscription {
            registry: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Number of callbacks registered for exactly `path`.
    pub fn count(&self, path: &FieldPath) -> usize {
        self.inner
            .borrow()
            .by_path
            .get(path.as_str())
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().by_path.is_empty()
    }

    /// Invokes the callbacks of every watched path whose value changed.
    ///
    /// `status` supplies the touched and dirty status of a path after the commit.
    pub(crate) fn notify(
        &self,
        previous: &Value,
        updated: &Value,
        status: impl Fn(&FieldPath) -> (bool, bool),
    ) {
        self.notify_moved(previous, updated, |path| Some(path.clone()), status);
    }

    /// Like [`WatchRegistry::notify`], for a commit that moved paths: the previous value of
    /// a watched path is read at `source(path)` in the previous tree.
    pub(crate) fn notify_moved(
        &self,
        previous: &Value,
        updated: &Value,
        source: impl Fn(&FieldPath) -> Option<FieldPath>,
        status: impl Fn(&FieldPath) -> (bool, bool),
    ) {
        let pending: Vec<(FieldPath, Vec<WatchCallback>)> = self
            .inner
            .borrow()
            .by_path
            .iter()
            .map(|(key, callbacks)| {
                let callbacks = callbacks.iter().map(|(_, cb)| Rc::clone(cb)).collect();
                (FieldPath::parse(key), callbacks)
            })
            .collect();

        for (path, callbacks) in pending {
            let previous_value = source(&path).and_then(|from| get_path(&from, previous));
            let value = get_path(&path, updated);
            if previous_value == value {
                continue;
            }

            let (touched, dirty) = status(&path);
            let change = FieldChange {
                previous_value: previous_value.cloned(),
                value: value.cloned(),
                touched,
                dirty,
                path,
            };
            trace!(path = %change.path, callbacks = callbacks.len(), "Notifying watchers");
            for callback in callbacks {
                callback(&change);
            }
        }
    }

    /// Moves watchers of list items along with their items; watchers of a removed item are
    /// dropped.
    pub(crate) fn remap(&self, remap: &IndexRemap) {
        let mut watchers = self.inner.borrow_mut();
        remap.apply_to(&mut watchers.by_path);
    }
}

impl fmt::Debug for WatchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let watchers = self.inner.borrow();
        f.debug_map()
            .entries(watchers.by_path.iter().map(|(path, cbs)| (path, cbs.len())))
            .finish()
    }
}

/// Handle to one registered watch callback.
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<RefCell<Watchers>>,
    id: u64,
}

impl Subscription {
    /// Removes the callback. Calling this more than once, or after the form is gone, is a
    /// no-op.
    pub fn unsubscribe(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut watchers = registry.borrow_mut();
        watchers.by_path.retain(|_, callbacks| {
            callbacks.retain(|(id, _)| *id != self.id);
            !callbacks.is_empty()
        });
    }
}

//! List operators and the index remapping they imply.
//!
//! Editing a list moves its items to new indices. Everything keyed by a path into the list
//! (touched, dirty, errors, watchers, field keys) has to move with them, so that a flag
//! keeps describing the item it was set for rather than the slot it used to occupy.
//!
//! [`IndexRemap`] is the permutation one edit applies to item indices. It is computed
//! before anything is mutated and applied to whole maps at once, producing fresh maps: a
//! rename in place could clobber a key that has not moved out of the way yet.
//!
//! ```rust
//! use formstate::list::{IndexRemap, ListEdit};
//! use formstate::FieldPath;
//!
//! let remap = IndexRemap::new(FieldPath::parse("items"), ListEdit::Remove { at: 1 });
//! assert_eq!(remap.map_index(0), Some(0));
//! assert_eq!(remap.map_index(1), None);
//! assert_eq!(remap.map_index(2), Some(1));
//! ```

use std::{collections::BTreeMap, sync::Arc};

use tracing::{debug, warn};

use crate::tree::{FieldPath, Segment, Value};

/// A structural edit of a list, in terms of item indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEdit {
    /// A new item now sits at `at`; later items move up by one
    Insert { at: usize },
    /// The item at `at` is gone; later items move down by one
    Remove { at: usize },
    /// The item at `from` now sits at `to`; items in between shift toward `from`
    Reorder { from: usize, to: usize },
}

/// Maps item indices, and paths through them, from before an edit to after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRemap {
    list: FieldPath,
    edit: ListEdit,
}

impl IndexRemap {
    pub fn new(list: FieldPath, edit: ListEdit) -> Self {
        Self { list, edit }
    }

    /// The path of the edited list.
    pub fn list(&self) -> &FieldPath {
        &self.list
    }

    pub fn edit(&self) -> ListEdit {
        self.edit
    }

    /// Returns the index the item previously at `index` moved to, or `None` if it was
    /// removed.
    pub fn map_index(&self, index: usize) -> Option<usize> {
        match self.edit {
            ListEdit::Insert { at } if index >= at => Some(index + 1),
            ListEdit::Insert { .. } => Some(index),
            ListEdit::Remove { at } if index == at => None,
            ListEdit::Remove { at } if index > at => Some(index - 1),
            ListEdit::Remove { .. } => Some(index),
            ListEdit::Reorder { from, to } if index == from => Some(to),
            ListEdit::Reorder { from, to } if from < to && index > from && index <= to => {
                Some(index - 1)
            }
            ListEdit::Reorder { from, to } if from > to && index >= to && index < from => {
                Some(index + 1)
            }
            ListEdit::Reorder { .. } => Some(index),
        }
    }

    /// Returns the index the item now at `index` was at before the edit, or `None` for a
    /// freshly inserted item.
    pub fn source_index(&self, index: usize) -> Option<usize> {
        match self.edit {
            ListEdit::Insert { at } if index == at => None,
            ListEdit::Insert { at } if index > at => Some(index - 1),
            ListEdit::Insert { .. } => Some(index),
            ListEdit::Remove { at } if index >= at => Some(index + 1),
            ListEdit::Remove { .. } => Some(index),
            ListEdit::Reorder { from, to } => {
                IndexRemap::new(self.list.clone(), ListEdit::Reorder { from: to, to: from })
                    .map_index(index)
            }
        }
    }

    /// Maps a path from before the edit to after it.
    ///
    /// Paths that do not go through an item of the list are returned unchanged; paths into
    /// a removed item yield `None`.
    pub fn remap_path(&self, path: &FieldPath) -> Option<FieldPath> {
        self.rewrite(path, |index| self.map_index(index))
    }

    /// Maps a path from after the edit back to before it.
    ///
    /// Paths into a freshly inserted item yield `None`.
    pub fn source_path(&self, path: &FieldPath) -> Option<FieldPath> {
        self.rewrite(path, |index| self.source_index(index))
    }

    fn rewrite(&self, path: &FieldPath, map: impl Fn(usize) -> Option<usize>) -> Option<FieldPath> {
        match path.list_item_of(&self.list) {
            None => Some(path.clone()),
            Some(index) => {
                let moved = map(index)?;
                Some(path.with_segment(self.list.len(), Segment::Index(moved)))
            }
        }
    }

    /// Returns a new map with every key moved as [`IndexRemap::remap_path`] says, and keys
    /// into a removed item dropped.
    pub fn remap_keys<V: Clone>(&self, map: &BTreeMap<String, V>) -> BTreeMap<String, V> {
        map.iter()
            .filter_map(|(key, value)| {
                self.remap_path(&FieldPath::parse(key))
                    .map(|path| (path.as_str().to_string(), value.clone()))
            })
            .collect()
    }

    /// Replaces `map` with its remapped copy.
    pub fn apply_to<V: Clone>(&self, map: &mut BTreeMap<String, V>) {
        let remapped = self.remap_keys(map);
        *map = remapped;
    }
}

/// A list operation requested on the list at some path.
#[derive(Debug, Clone)]
pub enum ListOp {
    /// Inserts `item` at `at`, or appends when `at` is `None` or past the end
    Insert { item: Value, at: Option<usize> },
    /// Removes the item at `at`
    Remove { at: usize },
    /// Moves the item at `from` to `to`
    Reorder { from: usize, to: usize },
    /// Replaces the item at `at` in place
    Replace { at: usize, item: Value },
}

/// The outcome of applying a [`ListOp`].
#[derive(Debug, Clone)]
pub struct AppliedListOp {
    /// The edited list
    pub list: Value,
    /// How item indices moved; `None` when no item moved
    pub remap: Option<IndexRemap>,
}

impl ListOp {
    /// Applies this operation to `current`, the value found at `path`.
    ///
    /// Returns `None` when the operation does not apply: `current` is not a list, or an
    /// index is out of range. Nothing should be changed in that case.
    pub fn apply(self, path: &FieldPath, current: Option<&Value>) -> Option<AppliedListOp> {
        let Some(Value::List(items)) = current else {
            warn!(path = %path, "List operation on a value that is not a list, ignoring");
            return None;
        };
        let len = items.len();
        let mut items = Arc::clone(items);

        let edit = match self {
            ListOp::Insert { item, at } => {
                let at = at.map_or(len, |at| at.min(len));
                Arc::make_mut(&mut items).insert(at, item);
                Some(ListEdit::Insert { at })
            }
            ListOp::Remove { at } if at < len => {
                Arc::make_mut(&mut items).remove(at);
                Some(ListEdit::Remove { at })
            }
            ListOp::Reorder { from, to } if from < len && to < len => {
                let slots = Arc::make_mut(&mut items);
                let item = slots.remove(from);
                slots.insert(to, item);
                Some(ListEdit::Reorder { from, to })
            }
            ListOp::Replace { at, item } if at < len => {
                Arc::make_mut(&mut items)[at] = item;
                None
            }
            op => {
                warn!(path = %path, len, ?op, "List index out of range, ignoring");
                return None;
            }
        };

        debug!(path = %path, ?edit, "Applied list operation");
        Some(AppliedListOp {
            list: Value::List(items),
            remap: edit.map(|edit| IndexRemap::new(path.clone(), edit)),
        })
    }
}

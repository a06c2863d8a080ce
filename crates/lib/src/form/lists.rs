//! List operators on a form.
//!
//! Each operator edits the list at a path and, in the same commit, moves every
//! path-keyed entry that addresses an item of that list (touched, dirty, errors, watchers,
//! field keys) to the item's new index. The list's own dirty override is dropped so the
//! list derives its status from the baseline again.

use tracing::debug;

use super::Form;
use crate::{
    list::{IndexRemap, ListOp},
    store::SetValues,
    tree::{FieldPath, Value, get_path, set_path},
};

impl Form {
    /// Inserts `item` at `index` in the list at `path`, or appends it when `index` is
    /// `None` or past the end.
    pub fn insert_list_item(
        &mut self,
        path: impl Into<FieldPath>,
        item: impl Into<Value>,
        index: Option<usize>,
    ) {
        self.apply_list_op(path.into(), ListOp::Insert {
            item: item.into(),
            at: index,
        });
    }

    /// Removes the item at `index` from the list at `path`.
    pub fn remove_list_item(&mut self, path: impl Into<FieldPath>, index: usize) {
        self.apply_list_op(path.into(), ListOp::Remove { at: index });
    }

    /// Moves the item at `from` to `to` in the list at `path`.
    pub fn reorder_list_item(&mut self, path: impl Into<FieldPath>, from: usize, to: usize) {
        self.apply_list_op(path.into(), ListOp::Reorder { from, to });
    }

    /// Replaces the item at `index` in the list at `path`. No other entry moves.
    pub fn replace_list_item(
        &mut self,
        path: impl Into<FieldPath>,
        index: usize,
        item: impl Into<Value>,
    ) {
        self.apply_list_op(path.into(), ListOp::Replace {
            at: index,
            item: item.into(),
        });
    }

    fn apply_list_op(&mut self, path: FieldPath, op: ListOp) {
        let Some(applied) = op.apply(&path, get_path(&path, self.store.values())) else {
            return;
        };

        if let Some(remap) = &applied.remap {
            self.remap_entries(remap);
        }
        self.status.clear_field_dirty(&path);

        let updated = set_path(&path, applied.list, self.store.values());
        let change = self.store.set_values(SetValues::replace(updated));

        match &applied.remap {
            Some(remap) => self.watchers.notify_moved(
                &change.previous,
                &change.updated,
                |moved| remap.source_path(moved),
                |watched| self.field_status(watched),
            ),
            None => self.notify(&change),
        }
        self.propagation.commit(Some(&path), true);
    }

    fn remap_entries(&mut self, remap: &IndexRemap) {
        let (touched, dirty) = self.status.maps_mut();
        remap.apply_to(touched.entries_mut());
        remap.apply_to(dirty.entries_mut());
        remap.apply_to(self.errors.entries_mut());
        self.watchers.remap(remap);
        self.propagation.remap(remap);
        debug!(list = %remap.list(), edit = ?remap.edit(), "Re-indexed list entries");
    }
}

//! Controlled and uncontrolled propagation.
//!
//! Every commit goes through one pipeline; the mode only decides what the reactive layer is
//! told afterwards. Reads of the values are correct in both modes.
//!
//! - Controlled: every commit bumps [`Propagation::revision`], so the UI re-renders with
//!   the new values.
//! - Uncontrolled: commits are silent unless an update is forced. A forced field update
//!   bumps that field's key; `initialize` and `reset` bump the form key. Inputs keyed with
//!   [`Propagation::key`] remount and pick up the new default values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{list::IndexRemap, tree::FieldPath};

/// How value changes reach the reactive layer. Fixed for the lifetime of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every change is pushed to the reactive layer
    #[default]
    Controlled,
    /// Changes only reach the reactive layer through re-keying
    Uncontrolled,
}

impl Mode {
    pub fn is_controlled(self) -> bool {
        matches!(self, Mode::Controlled)
    }

    pub fn is_uncontrolled(self) -> bool {
        matches!(self, Mode::Uncontrolled)
    }
}

/// Counters the reactive layer observes.
#[derive(Debug, Clone, Default)]
pub struct Propagation {
    mode: Mode,
    revision: u64,
    form_key: u64,
    field_keys: BTreeMap<String, u64>,
}

impl Propagation {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Increments on every change pushed to the reactive layer.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Increments whenever the whole form must be re-keyed.
    pub fn form_key(&self) -> u64 {
        self.form_key
    }

    /// Increments whenever the input at `path` must be re-keyed.
    pub fn field_key(&self, path: &FieldPath) -> u64 {
        self.field_keys.get(path.as_str()).copied().unwrap_or(0)
    }

    /// Key for the input at `path`: `"{form_key}-{path}-{field_key}"`.
    pub fn key(&self, path: &FieldPath) -> String {
        format!("{}-{}-{}", self.form_key, path.as_str(), self.field_key(path))
    }

    /// Whether writes should refresh the state values read by the reactive layer.
    pub fn updates_state(&self) -> bool {
        self.mode.is_controlled()
    }

    /// Reports a committed change at `path` (the whole form for `None`).
    ///
    /// Returns true if the change was propagated.
    pub fn commit(&mut self, path: Option<&FieldPath>, force: bool) -> bool {
        match self.mode {
            Mode::Controlled => {
                self.revision += 1;
            }
            Mode::Uncontrolled if force => {
                match path {
                    Some(path) => self.bump_field(path),
                    None => self.form_key += 1,
                }
                self.revision += 1;
            }
            Mode::Uncontrolled => return false,
        }
        trace!(mode = ?self.mode, revision = self.revision, "Propagated change");
        true
    }

    /// Re-keys the whole form in uncontrolled mode; re-renders in controlled mode.
    pub fn rekey_form(&mut self) {
        if self.mode.is_uncontrolled() {
            self.form_key += 1;
        }
        self.revision += 1;
        trace!(form_key = self.form_key, "Form re-keyed");
    }

    /// Moves field keys of list items along with their items.
    pub(crate) fn remap(&mut self, remap: &IndexRemap) {
        remap.apply_to(&mut self.field_keys);
    }

    fn bump_field(&mut self, path: &FieldPath) {
        *self.field_keys.entry(path.as_str().to_string()).or_default() += 1;
    }
}

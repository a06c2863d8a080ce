//! Plain-data form configuration.
//!
//! [`FormSettings`] holds every option that is plain data, so it can be loaded from JSON
//! alongside the rest of an application's configuration. Callbacks, rules and initial
//! values go through [`FormBuilder`](super::FormBuilder).

use serde::{Deserialize, Serialize};

use crate::{Result, mode::Mode, tree::FieldPath};

/// When a field counts as touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchTrigger {
    /// On its first value change, or on focus
    #[default]
    Change,
    /// Only on focus
    Focus,
}

/// Which fields are validated on an input event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidateTrigger {
    /// No field
    #[default]
    Never,
    /// Every field
    Always,
    /// The listed paths; a component may be [`FORM_INDEX`](crate::tree::FORM_INDEX) to
    /// match any list index
    Paths(Vec<String>),
}

impl ValidateTrigger {
    /// Builds a path list trigger.
    pub fn paths<S: Into<String>>(paths: impl IntoIterator<Item = S>) -> Self {
        ValidateTrigger::Paths(paths.into_iter().map(Into::into).collect())
    }

    /// Returns true if an event on `path` should validate it.
    pub fn applies_to(&self, path: &FieldPath) -> bool {
        match self {
            ValidateTrigger::Never => false,
            ValidateTrigger::Always => true,
            ValidateTrigger::Paths(paths) => {
                paths.iter().any(|pattern| path.matches_pattern(pattern))
            }
        }
    }
}

impl From<bool> for ValidateTrigger {
    fn from(enabled: bool) -> Self {
        if enabled {
            ValidateTrigger::Always
        } else {
            ValidateTrigger::Never
        }
    }
}

/// Serializable form options.
///
/// # Example
///
/// ```rust
/// use formstate::{FormSettings, Mode};
///
/// let settings = FormSettings::from_json(r#"{ "mode": "uncontrolled", "name": "signup" }"#)?;
/// assert_eq!(settings.mode, Mode::Uncontrolled);
/// assert!(settings.clear_input_error_on_change);
/// # Ok::<(), formstate::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSettings {
    /// Propagation mode, fixed for the lifetime of the form.
    #[serde(default)]
    pub mode: Mode,

    /// Form name, prefixed to the `data_path` of input props.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub touch_trigger: TouchTrigger,

    /// Fields re-validated whenever their value changes.
    #[serde(default)]
    pub validate_input_on_change: ValidateTrigger,

    /// Fields re-validated when their input loses focus.
    #[serde(default)]
    pub validate_input_on_blur: ValidateTrigger,

    /// Clear a field's error when its value changes and it is not validated on change.
    #[serde(default = "default_clear_input_error_on_change")]
    pub clear_input_error_on_change: bool,
}

fn default_clear_input_error_on_change() -> bool {
    true
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            name: None,
            touch_trigger: TouchTrigger::default(),
            validate_input_on_change: ValidateTrigger::default(),
            validate_input_on_blur: ValidateTrigger::default(),
            clear_input_error_on_change: default_clear_input_error_on_change(),
        }
    }
}

impl FormSettings {
    /// Parses settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

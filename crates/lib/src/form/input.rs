//! Input props: what a field widget needs to render and report events.

use super::{Form, SetFieldValueOptions};
use crate::tree::{FieldPath, Value, get_path};

/// Kind of input a field is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    /// Anything carrying a value
    #[default]
    Input,
    /// A boolean input carrying `checked`
    Checkbox,
}

/// Options for [`Form::get_input_props`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputOptions {
    pub input_type: InputType,
    /// Include the field error
    pub with_error: bool,
    /// Include focus and blur handlers
    pub with_focus: bool,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            input_type: InputType::Input,
            with_error: true,
            with_focus: true,
        }
    }
}

impl InputOptions {
    pub fn checkbox() -> Self {
        Self {
            input_type: InputType::Checkbox,
            ..Self::default()
        }
    }
}

/// The value side of input props.
///
/// Controlled forms hand out `Value`/`Checked`; uncontrolled forms hand out the
/// `Default*` variants, read once when the input mounts.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Value(Value),
    DefaultValue(Value),
    Checked(bool),
    DefaultChecked(bool),
}

/// Props for one field input.
#[derive(Debug, Clone, PartialEq)]
pub struct InputProps {
    pub value: InputValue,
    /// The field error, when requested and present
    pub error: Option<Value>,
    /// `"{form name}-{path}"` for named forms
    pub data_path: Option<String>,
    /// Event handlers
    pub binding: FieldBinding,
}

/// Routes input events for one field back into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    path: FieldPath,
    with_focus: bool,
}

impl FieldBinding {
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Whether [`FieldBinding::on_focus`] and [`FieldBinding::on_blur`] do anything.
    pub fn has_focus_handlers(&self) -> bool {
        self.with_focus
    }

    /// Writes the new input value. Does not re-key the input in uncontrolled mode: the
    /// input already shows what was typed.
    pub fn on_change(&self, form: &mut Form, value: impl Into<Value>) {
        form.set_field_value_with(&self.path, value, SetFieldValueOptions {
            force_update: false,
        });
    }

    /// Marks the field touched.
    pub fn on_focus(&self, form: &mut Form) {
        if self.with_focus {
            form.set_field_touched(&self.path, true);
        }
    }

    /// Validates the field if the form validates it on blur.
    pub fn on_blur(&self, form: &mut Form) {
        if self.with_focus && form.settings.validate_input_on_blur.applies_to(&self.path) {
            form.validate_field(&self.path);
        }
    }
}

impl Form {
    /// Builds the props for the input bound to `path`.
    pub fn get_input_props(&self, path: impl Into<FieldPath>, options: InputOptions) -> InputProps {
        let path = path.into();
        let current = get_path(&path, self.store.values());
        let controlled = self.mode().is_controlled();

        let value = match options.input_type {
            InputType::Checkbox => {
                let checked = current.is_some_and(Value::as_bool_or_false);
                if controlled {
                    InputValue::Checked(checked)
                } else {
                    InputValue::DefaultChecked(checked)
                }
            }
            InputType::Input => {
                let value = current.cloned().unwrap_or_default();
                if controlled {
                    InputValue::Value(value)
                } else {
                    InputValue::DefaultValue(value)
                }
            }
        };

        InputProps {
            value,
            error: options
                .with_error
                .then(|| self.errors.get(&path).cloned())
                .flatten(),
            data_path: self
                .settings
                .name
                .as_ref()
                .map(|name| format!("{name}-{}", path.as_str())),
            binding: FieldBinding {
                path,
                with_focus: options.with_focus,
            },
        }
    }
}

//! The form instance.
//!
//! A [`Form`] owns one values store, one pair of status maps, one error map, one watch
//! registry and a propagation mode, and composes them into commits. A field write runs, in
//! order:
//!
//! 1. the value write, a no-op that stops the commit when the value is unchanged;
//! 2. dirty and touched updates;
//! 3. validation of the field, or clearing of its error;
//! 4. watcher notification;
//! 5. propagation to the reactive layer.
//!
//! Nothing in a commit returns an error. Misuse, such as a list operation on a path that
//! is not a list, is logged and ignored so that the maps never disagree with each other.

use std::{cell::Cell, fmt, rc::Rc};

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::{
    Result,
    mode::{Mode, Propagation},
    status::{StatusMap, StatusTracker},
    store::{SetValues, ValuesChange, ValuesChangeHook, ValuesStore},
    tree::{FieldPath, Value, get_path, value::NULL},
    validation::{ErrorMap, FieldValidationResult, FormValidationResult, Validation},
    watch::{FieldChange, Subscription, WatchRegistry},
};

mod input;
mod lists;
mod settings;
mod submit;

pub use input::{FieldBinding, InputOptions, InputProps, InputType, InputValue};
pub use settings::{FormSettings, TouchTrigger, ValidateTrigger};

/// Maps the values handed to submit handlers.
pub type TransformFn = Rc<dyn Fn(&Value) -> Value>;

/// Options for [`Form::set_field_value_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetFieldValueOptions {
    /// In uncontrolled mode, re-key the field so its input shows the new value
    pub force_update: bool,
}

impl Default for SetFieldValueOptions {
    fn default() -> Self {
        Self { force_update: true }
    }
}

/// Builder for [`Form`].
///
/// ```rust
/// use formstate::{Form, Mode, Rule};
/// use serde_json::json;
///
/// let form = Form::builder()
///     .mode(Mode::Uncontrolled)
///     .initial_values(json!({ "email": "" }))
///     .validate(Rule::fields([(
///         "email",
///         Rule::check(|value, _| (!value.as_text_or_empty().contains('@')).then_some("Invalid email")),
///     )]))
///     .validate_input_on_blur(true)
///     .build();
/// assert!(!form.is_valid(None));
/// ```
pub struct FormBuilder {
    settings: FormSettings,
    initial_values: Value,
    initial_errors: ErrorMap,
    initial_dirty: StatusMap,
    initial_touched: StatusMap,
    validation: Validation,
    on_values_change: Option<ValuesChangeHook>,
    transform_values: Option<TransformFn>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self {
            settings: FormSettings::default(),
            initial_values: Value::object(),
            initial_errors: ErrorMap::new(),
            initial_dirty: StatusMap::new(),
            initial_touched: StatusMap::new(),
            validation: Validation::None,
            on_values_change: None,
            transform_values: None,
        }
    }

    /// Replaces every plain-data option at once.
    pub fn settings(mut self, settings: FormSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.settings.mode = mode;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.settings.name = Some(name.into());
        self
    }

    pub fn touch_trigger(mut self, trigger: TouchTrigger) -> Self {
        self.settings.touch_trigger = trigger;
        self
    }

    /// Fields validated whenever their value changes. Accepts `bool` or a
    /// [`ValidateTrigger`].
    pub fn validate_input_on_change(mut self, trigger: impl Into<ValidateTrigger>) -> Self {
        self.settings.validate_input_on_change = trigger.into();
        self
    }

    /// Fields validated when their input loses focus. Accepts `bool` or a
    /// [`ValidateTrigger`].
    pub fn validate_input_on_blur(mut self, trigger: impl Into<ValidateTrigger>) -> Self {
        self.settings.validate_input_on_blur = trigger.into();
        self
    }

    pub fn clear_input_error_on_change(mut self, clear: bool) -> Self {
        self.settings.clear_input_error_on_change = clear;
        self
    }

    /// Initial values; also the first dirty baseline.
    pub fn initial_values(mut self, values: impl Into<Value>) -> Self {
        self.initial_values = values.into();
        self
    }

    pub fn initial_errors(mut self, errors: ErrorMap) -> Self {
        self.initial_errors = errors;
        self
    }

    pub fn initial_dirty(mut self, dirty: StatusMap) -> Self {
        self.initial_dirty = dirty;
        self
    }

    pub fn initial_touched(mut self, touched: StatusMap) -> Self {
        self.initial_touched = touched;
        self
    }

    /// Sets the validation: a [`Rule`](crate::Rule) tree or a [`Validation`].
    pub fn validate(mut self, validation: impl Into<Validation>) -> Self {
        self.validation = validation.into();
        self
    }

    /// Called with `(updated, previous)` after every values write.
    pub fn on_values_change(mut self, hook: impl Fn(&Value, &Value) + 'static) -> Self {
        self.on_values_change = Some(Rc::new(hook));
        self
    }

    /// Maps the values before they reach submit handlers.
    pub fn transform_values(mut self, transform: impl Fn(&Value) -> Value + 'static) -> Self {
        self.transform_values = Some(Rc::new(transform));
        self
    }

    pub fn build(self) -> Form {
        debug!(mode = ?self.settings.mode, name = ?self.settings.name, "Creating form");
        Form {
            propagation: Propagation::new(self.settings.mode),
            store: ValuesStore::new(self.initial_values)
                .with_on_values_change(self.on_values_change),
            status: StatusTracker::new(self.initial_touched, self.initial_dirty),
            errors: self.initial_errors,
            validation: self.validation,
            watchers: WatchRegistry::new(),
            transform_values: self.transform_values,
            initialized: false,
            submitting: Rc::new(Cell::new(false)),
            settings: self.settings,
        }
    }
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A form state engine instance.
pub struct Form {
    settings: FormSettings,
    store: ValuesStore,
    status: StatusTracker,
    errors: ErrorMap,
    validation: Validation,
    watchers: WatchRegistry,
    propagation: Propagation,
    transform_values: Option<TransformFn>,
    initialized: bool,
    submitting: Rc<Cell<bool>>,
}

impl Form {
    pub fn builder() -> FormBuilder {
        FormBuilder::new()
    }

    /// Creates a controlled form with `initial_values` and no validation.
    pub fn new(initial_values: impl Into<Value>) -> Self {
        FormBuilder::new().initial_values(initial_values).build()
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    pub fn mode(&self) -> Mode {
        self.settings.mode
    }

    // === Values ===

    /// The current values, in either mode.
    pub fn values(&self) -> &Value {
        self.store.values()
    }

    /// The values last pushed to the reactive layer. Lags behind [`Form::values`] in
    /// uncontrolled mode.
    pub fn state_values(&self) -> &Value {
        self.store.state_values()
    }

    /// The value at `path`, if it resolves.
    pub fn get_value(&self, path: impl Into<FieldPath>) -> Option<&Value> {
        get_path(&path.into(), self.store.values())
    }

    /// The current values deserialized into `T`.
    pub fn values_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(self.store.values().deserialize_into()?)
    }

    /// The current values passed through the transform, if any.
    pub fn transformed_values(&self) -> Value {
        match &self.transform_values {
            Some(transform) => transform(self.store.values()),
            None => self.store.values().clone(),
        }
    }

    /// The transformed values deserialized into `T`.
    pub fn transformed_values_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(self.transformed_values().deserialize_into()?)
    }

    /// Whether [`Form::initialize`] has been applied.
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// Sets values and baseline from data that arrived after creation.
    ///
    /// Explicit dirty flags are dropped, so the form is clean afterwards. Only the first call
    /// has an effect.
    pub fn initialize(&mut self, values: impl Into<Value>) {
        if self.initialized {
            debug!("Form already initialized, ignoring");
            return;
        }
        self.initialized = true;

        let values = values.into();
        self.store.set_values_snapshot(values.clone());
        self.status.reset_dirty();
        let change = self.store.set_values(SetValues::replace(values));
        self.notify(&change);
        self.propagation.rekey_form();
        debug!("Form initialized");
    }

    /// Shallow-merges `values` over the current values.
    pub fn set_values(&mut self, values: impl Into<Value>) {
        let update_state = self.propagation.updates_state();
        let change = self
            .store
            .set_values(SetValues::merge(values).update_state(update_state));

        if self.settings.clear_input_error_on_change {
            self.errors.clear();
        }
        self.notify(&change);
        if self.propagation.mode().is_uncontrolled() {
            self.propagation.rekey_form();
        } else {
            self.propagation.commit(None, false);
        }
    }

    /// Writes `value` at `path` and runs the rest of the commit.
    pub fn set_field_value(&mut self, path: impl Into<FieldPath>, value: impl Into<Value>) {
        self.set_field_value_with(path, value, SetFieldValueOptions::default());
    }

    /// [`Form::set_field_value`] with explicit options.
    pub fn set_field_value_with(
        &mut self,
        path: impl Into<FieldPath>,
        value: impl Into<Value>,
        options: SetFieldValueOptions,
    ) {
        self.commit_field_value(&path.into(), value.into(), options.force_update);
    }

    /// Writes the result of `update` applied to the current value at `path` (`Null` when
    /// it does not resolve).
    pub fn update_field_value(
        &mut self,
        path: impl Into<FieldPath>,
        update: impl FnOnce(&Value) -> Value,
    ) {
        let path = path.into();
        let value = update(get_path(&path, self.store.values()).unwrap_or(&NULL));
        self.commit_field_value(&path, value, true);
    }

    fn commit_field_value(&mut self, path: &FieldPath, value: Value, force_update: bool) {
        let update_state = self.propagation.updates_state();
        let Some(change) = self.store.set_field_value(path, value, update_state) else {
            return;
        };
        trace!(path = %path, "Field value committed");

        let snapshot = self.store.values_snapshot();
        let written = get_path(path, &change.updated).unwrap_or(&NULL);
        self.status.set_calculated_field_dirty(path, written, snapshot);
        if self.settings.touch_trigger == TouchTrigger::Change {
            self.status.set_field_touched(path, true);
        }

        if self.settings.validate_input_on_change.applies_to(path) {
            self.apply_field_validation(path);
        } else if self.settings.clear_input_error_on_change {
            self.errors.remove(path);
        }

        self.notify(&change);
        self.propagation.commit(Some(path), force_update);
    }

    /// The dirty baseline.
    pub fn get_initial_values(&self) -> &Value {
        self.store.values_snapshot()
    }

    /// Replaces the dirty baseline without touching the values.
    pub fn set_initial_values(&mut self, values: impl Into<Value>) {
        self.store.set_values_snapshot(values);
    }

    /// Restores the baseline values and clears errors, dirty and touched.
    pub fn reset(&mut self) {
        let change = self.store.reset_values(true);
        self.errors.clear();
        self.status.reset_dirty();
        self.store.set_values_snapshot(change.updated.clone());
        self.status.reset_touched();
        self.notify(&change);
        self.propagation.rekey_form();
        debug!("Form reset");
    }

    // === Errors ===

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// The error stored for exactly `path`.
    pub fn field_error(&self, path: impl Into<FieldPath>) -> Option<&Value> {
        self.errors.get(&path.into())
    }

    /// Replaces the error map.
    pub fn set_errors(&mut self, errors: ErrorMap) {
        self.errors = errors;
        self.propagation.commit(None, false);
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
        self.propagation.commit(None, false);
    }

    /// Stores `error` for `path`; `Null` or `false` clears it.
    pub fn set_field_error(&mut self, path: impl Into<FieldPath>, error: impl Into<Value>) {
        let path = path.into();
        self.errors.set(&path, error);
        self.propagation.commit(Some(&path), false);
    }

    pub fn clear_field_error(&mut self, path: impl Into<FieldPath>) {
        let path = path.into();
        if self.errors.remove(&path).is_some() {
            self.propagation.commit(Some(&path), false);
        }
    }

    // === Validation ===

    /// Validates every field and replaces the error map with the result.
    pub fn validate(&mut self) -> FormValidationResult {
        let result = self.validation.validate(self.store.values());
        self.errors = result.errors.clone();
        self.propagation.commit(None, false);
        result
    }

    /// Validates the field at `path` and stores or clears its error.
    pub fn validate_field(&mut self, path: impl Into<FieldPath>) -> FieldValidationResult {
        let path = path.into();
        let result = self.apply_field_validation(&path);
        self.propagation.commit(Some(&path), false);
        result
    }

    fn apply_field_validation(&mut self, path: &FieldPath) -> FieldValidationResult {
        let result = self.validation.validate_field(path, self.store.values());
        match &result.error {
            Some(error) => self.errors.set(path, error.clone()),
            None => {
                self.errors.remove(path);
            }
        }
        result
    }

    /// Whether `path`, or the whole form for `None`, passes validation. Leaves the error
    /// map untouched.
    pub fn is_valid(&self, path: Option<&FieldPath>) -> bool {
        match path {
            Some(path) => {
                !self
                    .validation
                    .validate_field(path, self.store.values())
                    .has_error
            }
            None => !self.validation.validate(self.store.values()).has_errors,
        }
    }

    // === Status ===

    /// Whether `path` is dirty, or the form for `None`.
    pub fn is_dirty(&self, path: Option<&FieldPath>) -> bool {
        self.status
            .is_dirty(path, self.store.values(), self.store.values_snapshot())
    }

    /// Whether `path` is touched, or any field for `None`.
    pub fn is_touched(&self, path: Option<&FieldPath>) -> bool {
        self.status.is_touched(path)
    }

    /// The explicit dirty overrides.
    pub fn get_dirty(&self) -> &StatusMap {
        self.status.dirty()
    }

    /// The explicit touched overrides.
    pub fn get_touched(&self) -> &StatusMap {
        self.status.touched()
    }

    /// Overrides the dirty status of `path`. No-op when it already reads as `value`.
    pub fn set_field_dirty(&mut self, path: impl Into<FieldPath>, value: bool, force_update: bool) {
        let path = path.into();
        if self.status.set_field_dirty(
            &path,
            value,
            self.store.values(),
            self.store.values_snapshot(),
        ) {
            self.propagation.commit(Some(&path), force_update);
        }
    }

    /// Overrides the touched status of `path`. No-op when it already reads as `value`.
    pub fn set_field_touched(&mut self, path: impl Into<FieldPath>, value: bool) {
        let path = path.into();
        if self.status.set_field_touched(&path, value) {
            self.propagation.commit(Some(&path), false);
        }
    }

    /// Replaces the dirty overrides.
    pub fn set_dirty(&mut self, dirty: StatusMap) {
        self.status.set_dirty(dirty);
        self.propagation.commit(None, false);
    }

    /// Replaces the touched overrides.
    pub fn set_touched(&mut self, touched: StatusMap) {
        self.status.set_touched(touched);
        self.propagation.commit(None, false);
    }

    /// Makes `values`, or the current values, the new baseline and clears the dirty
    /// overrides.
    pub fn reset_dirty(&mut self, values: Option<Value>) {
        let baseline = values.unwrap_or_else(|| self.store.values().clone());
        self.store.set_values_snapshot(baseline);
        self.status.reset_dirty();
        self.propagation.commit(None, false);
    }

    pub fn reset_touched(&mut self) {
        self.status.reset_touched();
        self.propagation.commit(None, false);
    }

    // === Watchers and keys ===

    /// Calls `callback` after every commit that changes the value at `path`.
    pub fn watch(
        &self,
        path: impl Into<FieldPath>,
        callback: impl Fn(&FieldChange) + 'static,
    ) -> Subscription {
        self.watchers.watch(&path.into(), callback)
    }

    /// Key for the input at `path`; changes whenever that input must remount.
    pub fn key(&self, path: impl Into<FieldPath>) -> String {
        self.propagation.key(&path.into())
    }

    /// Increments on every change pushed to the reactive layer.
    pub fn revision(&self) -> u64 {
        self.propagation.revision()
    }

    pub fn form_key(&self) -> u64 {
        self.propagation.form_key()
    }

    fn notify(&self, change: &ValuesChange) {
        self.watchers
            .notify(&change.previous, &change.updated, |path| self.field_status(path));
    }

    fn field_status(&self, path: &FieldPath) -> (bool, bool) {
        (self.is_touched(Some(path)), self.is_dirty(Some(path)))
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("settings", &self.settings)
            .field("store", &self.store)
            .field("status", &self.status)
            .field("errors", &self.errors)
            .field("validation", &self.validation)
            .field("watchers", &self.watchers)
            .field("propagation", &self.propagation)
            .field("initialized", &self.initialized)
            .field("submitting", &self.submitting.get())
            .finish()
    }
}

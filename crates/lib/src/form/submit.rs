//! Submit and reset flows.

use std::{cell::Cell, future::Future, rc::Rc};

use tracing::debug;

use super::Form;
use crate::{tree::Value, validation::ErrorMap};

/// Clears the submitting flag when dropped.
struct SubmittingGuard(Rc<Cell<bool>>);

impl SubmittingGuard {
    fn start(flag: &Rc<Cell<bool>>) -> Self {
        flag.set(true);
        Self(Rc::clone(flag))
    }
}

impl Drop for SubmittingGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Form {
    /// Validates the whole form, then calls `on_valid` with the transformed values or
    /// `on_invalid` with the errors and the raw values.
    pub fn submit<R>(
        &mut self,
        on_valid: impl FnOnce(Value) -> R,
        on_invalid: impl FnOnce(&ErrorMap, &Value) -> R,
    ) -> R {
        let result = self.validate();
        if result.has_errors {
            debug!(errors = result.errors.len(), "Submit rejected");
            on_invalid(&result.errors, self.values())
        } else {
            on_valid(self.transformed_values())
        }
    }

    /// Builds a submit event handler.
    ///
    /// ```rust
    /// use formstate::Form;
    /// use serde_json::json;
    ///
    /// let mut form = Form::new(json!({ "name": "Ada" }));
    /// let mut handle = Form::on_submit(
    ///     |values, _event: &()| println!("submitting {values}"),
    ///     |errors, _values, _event: &()| println!("{} errors", errors.len()),
    /// );
    /// handle(&mut form, ());
    /// ```
    pub fn on_submit<E>(
        mut on_valid: impl FnMut(Value, &E),
        mut on_invalid: impl FnMut(&ErrorMap, &Value, &E),
    ) -> impl FnMut(&mut Form, E) {
        move |form: &mut Form, event: E| {
            form.submit(
                |values| on_valid(values, &event),
                |errors, values| on_invalid(errors, values, &event),
            )
        }
    }

    /// Validates the whole form and, if valid, starts `on_valid` with the transformed
    /// values.
    ///
    /// [`Form::submitting`] is true from this call until the returned future completes or
    /// is dropped, whatever the handler's outcome. Invalid forms return their errors and
    /// never set the flag.
    pub fn submit_async<F, Fut>(
        &mut self,
        on_valid: F,
    ) -> std::result::Result<impl Future<Output = Fut::Output> + use<F, Fut>, ErrorMap>
    where
        F: FnOnce(Value) -> Fut,
        Fut: Future,
    {
        let result = self.validate();
        if result.has_errors {
            debug!(errors = result.errors.len(), "Submit rejected");
            return Err(result.errors);
        }

        let guard = SubmittingGuard::start(&self.submitting);
        let pending = on_valid(self.transformed_values());
        Ok(async move {
            let _guard = guard;
            pending.await
        })
    }

    /// Whether an async submit is in flight.
    pub fn submitting(&self) -> bool {
        self.submitting.get()
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting.set(submitting);
    }

    /// Handles a reset event.
    pub fn on_reset<E>(&mut self, _event: E) {
        self.reset();
    }
}

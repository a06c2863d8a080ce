//! Shared helpers for benchmarks

use formstate::{ErrorMap, Form, StatusMap, Value};
use serde_json::json;

/// Values shaped `{ items: [{ name, qty }, ...] }` with `len` items.
pub fn list_values(len: usize) -> Value {
    let items: Vec<serde_json::Value> = (0..len)
        .map(|i| json!({ "name": format!("item{i}"), "qty": i }))
        .collect();
    Value::from(json!({ "items": items }))
}

/// A form over [`list_values`] with a touched flag, dirty flag and error on every item,
/// so list edits have every map to re-key.
pub fn populated_form(len: usize) -> Form {
    let touched: StatusMap = (0..len)
        .map(|i| (format!("items.{i}.name"), true))
        .collect();
    let dirty: StatusMap = (0..len)
        .map(|i| (format!("items.{i}.qty"), i % 2 == 0))
        .collect();
    let errors: ErrorMap = (0..len)
        .map(|i| (format!("items.{i}.name"), Value::from("required")))
        .collect();

    Form::builder()
        .initial_values(list_values(len))
        .initial_touched(touched)
        .initial_dirty(dirty)
        .initial_errors(errors)
        .build()
}

use std::{cell::RefCell, rc::Rc};

use formstate::{FieldChange, FieldPath, Form, Rule, Value};
use serde_json::json;

/// Shorthand for parsing a path
pub fn p(path: &str) -> FieldPath {
    FieldPath::parse(path)
}

/// Rule failing with "required" for empty text
pub fn required() -> Rule {
    Rule::check(|value, _| value.as_text_or_empty().trim().is_empty().then_some("required"))
}

/// The form from the reference scenario: `{ a: { b: 1 }, list: [{ x: 1 }, { x: 2 }] }`
pub fn scenario_form() -> Form {
    Form::new(json!({ "a": { "b": 1 }, "list": [{ "x": 1 }, { "x": 2 }] }))
}

/// A list of `n` items shaped `{ name: "item{i}" }` under `items`
pub fn items_values(n: usize) -> Value {
    let items: Vec<serde_json::Value> = (0..n).map(|i| json!({ "name": format!("item{i}") })).collect();
    Value::from(json!({ "items": items }))
}

/// Watches `path` and records every change delivered
pub fn record_changes(form: &Form, path: &str) -> Rc<RefCell<Vec<FieldChange>>> {
    let seen: Rc<RefCell<Vec<FieldChange>>> = Rc::default();
    let sink = seen.clone();
    form.watch(path, move |change| sink.borrow_mut().push(change.clone()));
    seen
}

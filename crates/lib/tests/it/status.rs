//! Dirty and touched tracking through the form API

use formstate::{Form, StatusMap, TouchTrigger, Value};
use serde_json::json;

use crate::helpers::{p, scenario_form};

#[test]
fn test_dirty_lifecycle() {
    let mut form = Form::new(json!({}));
    form.initialize(json!({ "name": "Ada", "age": 36 }));
    assert!(!form.is_dirty(None));

    form.set_field_value("age", 37);
    assert!(form.is_dirty(Some(&p("age"))));
    assert!(form.is_dirty(None));
    assert!(!form.is_dirty(Some(&p("name"))));

    form.reset_dirty(None);
    assert!(!form.is_dirty(Some(&p("age"))));
    assert!(!form.is_dirty(None));
    // Values are untouched by the re-baseline
    assert_eq!(form.values()["age"], 37);
}

#[test]
fn test_initialize_drops_earlier_dirty_flags() {
    let mut form = Form::new(json!({ "a": 1 }));
    form.set_field_value("a", 2);
    form.set_field_dirty("b", true, false);
    assert!(form.is_dirty(None));

    form.initialize(json!({ "a": 3 }));

    assert!(!form.is_dirty(None));
    assert!(!form.is_dirty(Some(&p("a"))));
    assert!(!form.is_dirty(Some(&p("b"))));
}

#[test]
fn test_writing_back_original_value_is_clean() {
    let mut form = scenario_form();
    form.set_field_value("a.b", 2);
    form.set_field_value("a.b", 1);
    assert!(!form.is_dirty(Some(&p("a.b"))));
    assert!(!form.is_dirty(Some(&p("a"))));
}

#[test]
fn test_writing_parent_clears_child_overrides() {
    let mut form = scenario_form();
    form.set_field_value("a.b", 2);
    assert_eq!(form.get_dirty().get(&p("a.b")).explicit(), Some(true));

    form.set_field_value("a", json!({ "b": 1 }));
    assert!(form.get_dirty().get(&p("a.b")).explicit().is_none());
    assert!(!form.is_dirty(Some(&p("a"))));
    assert!(!form.is_dirty(Some(&p("a.b"))));
}

#[test]
fn test_reset_dirty_with_values() {
    let mut form = scenario_form();
    form.reset_dirty(Some(Value::from(json!({ "a": { "b": 9 } }))));

    assert_eq!(form.get_initial_values()["a"]["b"], 9);
    assert!(form.is_dirty(Some(&p("a.b"))));
}

#[test]
fn test_explicit_dirty_override() {
    let mut form = scenario_form();
    form.set_field_dirty("list", true, false);
    assert!(form.is_dirty(Some(&p("list"))));

    form.set_dirty(StatusMap::new());
    assert!(!form.is_dirty(Some(&p("list"))));
}

#[test]
fn test_touch_trigger() {
    let mut on_change = Form::new(json!({ "a": 1 }));
    on_change.set_field_value("a", 2);
    assert!(on_change.is_touched(Some(&p("a"))));

    let mut on_focus = Form::builder()
        .initial_values(json!({ "a": 1 }))
        .touch_trigger(TouchTrigger::Focus)
        .build();
    on_focus.set_field_value("a", 2);
    assert!(!on_focus.is_touched(Some(&p("a"))));
    assert!(!on_focus.is_touched(None));

    on_focus.set_field_touched("a", true);
    assert!(on_focus.is_touched(Some(&p("a"))));
    on_focus.reset_touched();
    assert!(on_focus.get_touched().is_empty());
}

#[test]
fn test_initial_status_maps() {
    let form = Form::builder()
        .initial_values(json!({ "a": { "b": 1 } }))
        .initial_touched(StatusMap::from([("a.b", true)]))
        .initial_dirty(StatusMap::from([("a", true)]))
        .build();

    assert!(form.is_touched(Some(&p("a"))));
    assert!(form.is_dirty(Some(&p("a"))));
    // The override on "a" says nothing about "a.b", which derives from data
    assert!(!form.is_dirty(Some(&p("a.b"))));
}

//! List operator integration tests
//!
//! Every operator must move touched, dirty, errors, watchers and field keys along with the
//! items they describe.

use formstate::{ErrorMap, Form, Mode, StatusMap, Value};
use serde_json::json;

use crate::helpers::{items_values, p, record_changes, scenario_form};

#[test]
fn test_remove_reindexes_every_map() {
    let mut form = Form::builder()
        .initial_values(items_values(5))
        .initial_touched(StatusMap::from([("items.2.name", true)]))
        .initial_dirty(StatusMap::from([("items.1.name", true)]))
        .initial_errors(ErrorMap::from([("items.4.name", "required"), ("items.1", "bad")]))
        .build();

    form.remove_list_item("items", 1);

    assert_eq!(form.get_touched().get(&p("items.1.name")).explicit(), Some(true));
    assert_eq!(form.field_error("items.3.name"), Some(&Value::from("required")));

    // Nothing about the removed item survives
    assert!(form.get_dirty().is_empty());
    assert!(form.field_error("items.1").is_none());
    assert!(form.field_error("items.4.name").is_none());
    assert_eq!(form.get_touched().len(), 1);
    assert_eq!(form.errors().len(), 1);

    assert_eq!(form.values()["items"].as_list().map(<[Value]>::len), Some(4));
    assert_eq!(form.values()["items"][1]["name"], "item2");
}

#[test]
fn test_reorder_flags_follow_items() {
    let mut form = Form::builder()
        .initial_values(json!({ "items": ["a", "b", "c"] }))
        .initial_dirty(StatusMap::from([
            ("items.0", true),
            ("items.1", false),
            ("items.2", true),
        ]))
        .build();

    form.reorder_list_item("items", 0, 2);

    assert_eq!(form.values()["items"], json!(["b", "c", "a"]));
    let flags: Vec<_> = (0..3)
        .map(|i| form.is_dirty(Some(&p(&format!("items.{i}")))))
        .collect();
    assert_eq!(flags, vec![false, true, true]);
}

#[test]
fn test_reorder_backward() {
    let mut form = Form::builder()
        .initial_values(json!({ "items": ["a", "b", "c", "d"] }))
        .initial_errors(ErrorMap::from([("items.3", "d"), ("items.1", "b")]))
        .build();

    form.reorder_list_item("items", 3, 1);

    assert_eq!(form.values()["items"], json!(["a", "d", "b", "c"]));
    assert_eq!(form.field_error("items.1"), Some(&Value::from("d")));
    assert_eq!(form.field_error("items.2"), Some(&Value::from("b")));
}

#[test]
fn test_scenario_insert_shifts_statuses() {
    let mut form = scenario_form();

    form.set_field_value("a.b", 2);
    assert!(form.is_dirty(Some(&p("a.b"))));
    assert!(form.is_dirty(Some(&p("a"))));
    assert!(!form.is_dirty(Some(&p("list"))));

    form.set_field_touched("list.1.x", true);
    form.set_field_error("list.1.x", "check me");

    form.insert_list_item("list", json!({ "x": 3 }), Some(1));

    assert_eq!(form.values()["list"], json!([{ "x": 1 }, { "x": 3 }, { "x": 2 }]));
    assert!(form.is_touched(Some(&p("list.2.x"))));
    assert!(!form.is_touched(Some(&p("list.1.x"))));
    assert_eq!(form.field_error("list.2.x"), Some(&Value::from("check me")));
    assert!(form.field_error("list.1.x").is_none());
}

#[test]
fn test_insert_appends_by_default() {
    let mut form = Form::new(json!({ "tags": ["a"] }));
    form.insert_list_item("tags", "b", None);
    form.insert_list_item("tags", "c", Some(99));
    assert_eq!(form.values()["tags"], json!(["a", "b", "c"]));
}

#[test]
fn test_out_of_range_is_a_noop() {
    let mut form = Form::builder()
        .initial_values(json!({ "items": ["a", "b"] }))
        .initial_errors(ErrorMap::from([("items.1", "bad")]))
        .build();
    let revision = form.revision();

    form.remove_list_item("items", 2);
    form.reorder_list_item("items", 0, 2);
    form.replace_list_item("items", 5, "z");

    assert_eq!(form.values()["items"], json!(["a", "b"]));
    assert_eq!(form.field_error("items.1"), Some(&Value::from("bad")));
    assert_eq!(form.revision(), revision);
}

#[test]
fn test_list_ops_on_non_list_are_noops() {
    let mut form = Form::new(json!({ "name": "x" }));
    form.insert_list_item("name", "y", None);
    form.remove_list_item("missing", 0);
    assert_eq!(form.values(), &Value::from(json!({ "name": "x" })));
}

#[test]
fn test_replace_keeps_other_entries() {
    let mut form = Form::builder()
        .initial_values(json!({ "items": ["a", "b"] }))
        .initial_errors(ErrorMap::from([("items.0", "bad")]))
        .build();

    form.replace_list_item("items", 1, "B");

    assert_eq!(form.values()["items"], json!(["a", "B"]));
    assert_eq!(form.field_error("items.0"), Some(&Value::from("bad")));
}

#[test]
fn test_list_dirty_override_is_dropped() {
    let mut form = Form::new(json!({ "items": ["a", "b"] }));
    form.set_field_dirty("items", true, false);

    form.reorder_list_item("items", 0, 1);
    assert!(form.is_dirty(Some(&p("items"))));

    form.reorder_list_item("items", 0, 1);
    // Back in the original order, derived from the baseline again
    assert!(!form.is_dirty(Some(&p("items"))));
}

#[test]
fn test_watchers_follow_items() {
    let mut form = Form::new(items_values(3));
    let second = record_changes(&form, "items.1.name");
    let list = record_changes(&form, "items");

    // "item1" moves to index 0; its watcher moves with it and its value did not change
    form.remove_list_item("items", 0);
    assert!(second.borrow().is_empty());
    assert_eq!(list.borrow().len(), 1);

    form.set_field_value("items.0.name", "renamed");
    let seen = second.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, p("items.0.name"));
    assert_eq!(seen[0].previous_value, Some(Value::from("item1")));
    assert_eq!(seen[0].value, Some(Value::from("renamed")));
}

#[test]
fn test_watchers_of_removed_item_are_dropped() {
    let mut form = Form::new(items_values(2));
    let removed = record_changes(&form, "items.0.name");

    form.remove_list_item("items", 0);
    form.set_field_value("items.0.name", "changed");

    assert!(removed.borrow().is_empty());
}

#[test]
fn test_field_keys_follow_items_in_uncontrolled_mode() {
    let mut form = Form::builder()
        .mode(Mode::Uncontrolled)
        .initial_values(json!({ "items": ["a", "b"] }))
        .build();

    form.set_field_value("items.1", "B");
    assert_eq!(form.key("items.1"), "0-items.1-1");

    form.insert_list_item("items", "new", Some(0));
    assert_eq!(form.key("items.2"), "0-items.2-1");
    assert_eq!(form.key("items.1"), "0-items.1-0");
    assert_eq!(form.key("items"), "0-items-1");

    // List edits always reach the reactive layer
    assert_eq!(form.state_values()["items"], json!(["new", "a", "B"]));
}

//! Watcher integration tests

use std::{cell::RefCell, rc::Rc};

use formstate::{Form, Value};
use serde_json::json;

use crate::helpers::{p, record_changes, scenario_form};

#[test]
fn test_unchanged_write_is_a_full_noop() {
    let mut form = scenario_form();
    let seen = record_changes(&form, "a.b");
    let revision = form.revision();

    form.set_field_value("a.b", 1);

    assert!(seen.borrow().is_empty());
    assert!(form.get_dirty().is_empty());
    assert!(form.get_touched().is_empty());
    assert_eq!(form.revision(), revision);
}

#[test]
fn test_watcher_sees_post_write_status() {
    let mut form = scenario_form();
    let seen = record_changes(&form, "a.b");

    form.set_field_value("a.b", 2);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].previous_value, Some(Value::Int(1)));
    assert_eq!(seen[0].value, Some(Value::Int(2)));
    assert!(seen[0].dirty);
    assert!(seen[0].touched);
}

#[test]
fn test_parent_watcher_fires_for_child_write() {
    let mut form = scenario_form();
    let parent = record_changes(&form, "a");
    let sibling = record_changes(&form, "list");

    form.set_field_value("a.b", 2);

    assert_eq!(parent.borrow().len(), 1);
    assert!(sibling.borrow().is_empty());
}

#[test]
fn test_watch_missing_path_becoming_defined() {
    let mut form = Form::new(json!({}));
    let seen = record_changes(&form, "profile.name");

    form.set_field_value("profile.name", "Ada");

    let seen = seen.borrow();
    assert_eq!(seen[0].previous_value, None);
    assert_eq!(seen[0].value, Some(Value::from("Ada")));
}

#[test]
fn test_callbacks_run_in_registration_order() {
    let mut form = scenario_form();
    let order: Rc<RefCell<Vec<u8>>> = Rc::default();
    for tag in 1..=3 {
        let order = order.clone();
        form.watch("a.b", move |_| order.borrow_mut().push(tag));
    }

    form.set_field_value("a.b", 5);
    assert_eq!(*order.borrow(), vec![1, 2, 3]);
}

#[test]
fn test_unsubscribe() {
    let mut form = scenario_form();
    let calls = Rc::new(RefCell::new(0));
    let counter = calls.clone();
    let subscription = form.watch("a.b", move |_| *counter.borrow_mut() += 1);

    form.set_field_value("a.b", 2);
    subscription.unsubscribe();
    subscription.unsubscribe();
    form.set_field_value("a.b", 3);

    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_set_values_and_reset_notify() {
    let mut form = scenario_form();
    let seen = record_changes(&form, "a.b");

    form.set_values(json!({ "a": { "b": 7 } }));
    form.reset();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].previous_value, Some(Value::Int(7)));
    assert_eq!(seen[1].value, Some(Value::Int(1)));
    assert!(!seen[1].dirty);
}

#[test]
fn test_on_values_change_hook() {
    let log: Rc<RefCell<Vec<(Value, Value)>>> = Rc::default();
    let sink = log.clone();
    let mut form = Form::builder()
        .initial_values(json!({ "a": 1 }))
        .on_values_change(move |updated, previous| {
            sink.borrow_mut().push((updated["a"].clone(), previous["a"].clone()));
        })
        .build();

    form.set_field_value("a", 2);
    form.set_field_value("a", 2);

    assert_eq!(*log.borrow(), vec![(Value::Int(2), Value::Int(1))]);
    assert!(form.is_dirty(Some(&p("a"))));
}

#[test]
fn test_nan_value_is_stable() {
    let mut form = Form::new(json!({ "a": 0, "b": 1 }));
    form.set_field_value("a", f64::NAN);
    form.reset_dirty(None);

    let calls = Rc::new(RefCell::new(0));
    let counter = calls.clone();
    form.watch("a", move |_| *counter.borrow_mut() += 1);

    form.set_field_value("a", f64::NAN);
    form.set_field_value("b", 2);

    assert_eq!(*calls.borrow(), 0);
    assert!(!form.is_dirty(Some(&p("a"))));
    assert!(form.is_dirty(Some(&p("b"))));
}

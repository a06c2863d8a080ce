//! Form integration tests: modes, lifecycle and input props

use formstate::{
    Form, FormSettings, InputOptions, InputValue, Mode, SetFieldValueOptions, Value,
};
use serde::Deserialize;
use serde_json::json;

use crate::helpers::{p, scenario_form};

#[test]
fn test_controlled_updates_state_on_every_write() {
    let mut form = scenario_form();
    let revision = form.revision();

    form.set_field_value("a.b", 2);

    assert_eq!(form.state_values()["a"]["b"], 2);
    assert_eq!(form.revision(), revision + 1);
}

#[test]
fn test_uncontrolled_reads_are_current_but_state_lags() {
    let mut form = Form::builder()
        .mode(Mode::Uncontrolled)
        .initial_values(json!({ "a": 1 }))
        .build();

    let props = form.get_input_props("a", InputOptions::default());
    props.binding.on_change(&mut form, 2);

    assert_eq!(form.values()["a"], 2);
    assert_eq!(form.get_value("a"), Some(&Value::Int(2)));
    assert_eq!(form.state_values()["a"], 1);
    // Typed input is not re-keyed
    assert_eq!(form.key("a"), "0-a-0");
    assert_eq!(form.revision(), 0);

    form.set_field_value("a", 3);
    assert_eq!(form.key("a"), "0-a-1");

    form.set_field_value_with("a", 4, SetFieldValueOptions { force_update: false });
    assert_eq!(form.key("a"), "0-a-1");
}

#[test]
fn test_uncontrolled_reset_rekeys_form() {
    let mut form = Form::builder()
        .mode(Mode::Uncontrolled)
        .initial_values(json!({ "a": 1 }))
        .build();

    form.set_field_value("a", 2);
    form.reset();

    assert_eq!(form.form_key(), 1);
    assert_eq!(form.key("a"), "1-a-1");
    assert_eq!(form.values()["a"], 1);
    assert_eq!(form.state_values()["a"], 1);
}

#[test]
fn test_initialize_applies_once() {
    let mut form = Form::builder()
        .mode(Mode::Uncontrolled)
        .initial_values(json!({}))
        .build();
    assert!(!form.initialized());

    form.initialize(json!({ "name": "Ada" }));
    form.initialize(json!({ "name": "Grace" }));

    assert!(form.initialized());
    assert_eq!(form.values()["name"], "Ada");
    assert_eq!(form.get_initial_values()["name"], "Ada");
    assert_eq!(form.state_values()["name"], "Ada");
    assert_eq!(form.form_key(), 1);
    assert!(!form.is_dirty(None));
}

#[test]
fn test_reset_clears_everything() {
    let mut form = scenario_form();
    form.set_field_value("a.b", 2);
    form.set_field_error("a.b", "bad");
    form.insert_list_item("list", json!({ "x": 9 }), None);

    form.reset();

    assert_eq!(form.values(), form.get_initial_values());
    assert!(form.errors().is_empty());
    assert!(form.get_dirty().is_empty());
    assert!(form.get_touched().is_empty());
    assert!(!form.is_dirty(None));
}

#[test]
fn test_on_reset_event() {
    let mut form = scenario_form();
    form.set_field_value("a.b", 2);
    form.on_reset(());
    assert_eq!(form.values()["a"]["b"], 1);
}

#[test]
fn test_set_initial_values_moves_baseline_only() {
    let mut form = scenario_form();
    form.set_initial_values(json!({ "a": { "b": 5 } }));

    assert_eq!(form.values()["a"]["b"], 1);
    assert!(form.is_dirty(Some(&p("a.b"))));
    assert!(form.is_dirty(Some(&p("list"))));
}

#[test]
fn test_update_field_value_from_current() {
    let mut form = Form::new(json!({ "count": 1 }));
    form.update_field_value("count", |current| Value::Int(current.as_int().unwrap_or(0) + 1));
    form.update_field_value("missing", |current| Value::Bool(current.is_null()));

    assert_eq!(form.values()["count"], 2);
    assert_eq!(form.values()["missing"], true);
}

#[test]
fn test_input_props() {
    let mut form = Form::builder()
        .name("signup")
        .initial_values(json!({ "email": "a@b.c", "terms": true }))
        .build();
    form.set_field_error("email", "taken");

    let props = form.get_input_props("email", InputOptions::default());
    assert_eq!(props.value, InputValue::Value(Value::from("a@b.c")));
    assert_eq!(props.error, Some(Value::from("taken")));
    assert_eq!(props.data_path.as_deref(), Some("signup-email"));

    let quiet = form.get_input_props(
        "email",
        InputOptions {
            with_error: false,
            with_focus: false,
            ..Default::default()
        },
    );
    assert_eq!(quiet.error, None);
    quiet.binding.on_focus(&mut form);
    assert!(!form.is_touched(Some(&p("email"))));

    let checkbox = form.get_input_props("terms", InputOptions::checkbox());
    assert_eq!(checkbox.value, InputValue::Checked(true));
    checkbox.binding.on_focus(&mut form);
    assert!(form.is_touched(Some(&p("terms"))));
}

#[test]
fn test_uncontrolled_input_props_use_defaults() {
    let form = Form::builder()
        .mode(Mode::Uncontrolled)
        .initial_values(json!({ "name": "Ada", "agree": false }))
        .build();

    let name = form.get_input_props("name", InputOptions::default());
    assert_eq!(name.value, InputValue::DefaultValue(Value::from("Ada")));
    assert_eq!(name.data_path, None);

    let agree = form.get_input_props("agree", InputOptions::checkbox());
    assert_eq!(agree.value, InputValue::DefaultChecked(false));

    let missing = form.get_input_props("nope", InputOptions::default());
    assert_eq!(missing.value, InputValue::DefaultValue(Value::Null));
}

#[test]
fn test_settings_drive_builder() {
    let settings = FormSettings::from_json(
        r#"{ "mode": "uncontrolled", "validate_input_on_change": "always" }"#,
    )
    .unwrap();
    let form = Form::builder().settings(settings).build();

    assert_eq!(form.mode(), Mode::Uncontrolled);
    assert!(form.settings().clear_input_error_on_change);
}

#[derive(Debug, Deserialize, PartialEq)]
struct Profile {
    name: String,
    age: i64,
}

#[test]
fn test_typed_and_transformed_values() {
    let form = Form::builder()
        .initial_values(json!({ "name": "Ada", "age": "36" }))
        .transform_values(|values| {
            let age = values["age"].as_text_or_empty().parse::<i64>().unwrap_or(0);
            values.merged_with(&Value::from(json!({ "age": age })))
        })
        .build();

    assert!(form.values_as::<Profile>().is_err());
    assert_eq!(
        form.transformed_values_as::<Profile>().unwrap(),
        Profile {
            name: "Ada".into(),
            age: 36
        }
    );
    assert_eq!(form.values()["age"], "36");
}

#[test]
fn test_unreachable_index_write_is_ignored() {
    let mut form = Form::new(json!({ "list": [] }));
    let revision = form.revision();

    form.set_field_value("list.18446744073709551615", 1);
    form.set_field_value("list.1000000000000", 1);
    form.set_field_value("fresh.1000000000000.name", "x");

    assert_eq!(form.values(), &Value::from(json!({ "list": [] })));
    assert!(form.get_touched().is_empty());
    assert!(!form.is_dirty(None));
    assert_eq!(form.revision(), revision);

    form.set_field_value("list.2", 1);
    assert_eq!(form.values()["list"], json!([null, null, 1]));
}

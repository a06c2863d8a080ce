//! Path resolver integration tests

use formstate::{
    FieldPath, Segment, Value, path,
    tree::{delete_path, get_path, set_path},
};
use serde_json::json;

use crate::helpers::p;

#[test]
fn test_parse_segments() {
    let path = p("employees.2.name");
    assert_eq!(
        path.segments(),
        &[
            Segment::Key("employees".into()),
            Segment::Index(2),
            Segment::Key("name".into())
        ]
    );
    assert_eq!(path.as_str(), "employees.2.name");
    assert_eq!(path.parent(), Some(p("employees.2")));
}

#[test]
fn test_macro_and_parse_agree() {
    let index = 2;
    assert_eq!(path!("employees", index, "name"), p("employees.2.name"));
    assert_eq!(FieldPath::root().push_key("a").push_index(0), p("a.0"));
}

#[test]
fn test_get_out_of_range_is_none() {
    let tree = Value::from(json!({ "list": [1, 2] }));
    assert_eq!(get_path(&p("list.1"), &tree), Some(&Value::Int(2)));
    assert_eq!(get_path(&p("list.2"), &tree), None);
    assert_eq!(get_path(&p("list.2.deeper"), &tree), None);
}

#[test]
fn test_set_infers_containers_from_next_segment() {
    let tree = set_path(&p("orders.0.lines.1.sku"), Value::from("X"), &Value::object());
    assert_eq!(
        tree,
        json!({ "orders": [{ "lines": [null, { "sku": "X" }] }] })
    );
}

#[test]
fn test_set_round_trip_and_sharing() {
    let tree = Value::from(json!({
        "a": { "b": 1, "c": { "d": true } },
        "list": [{ "x": 1 }, { "x": 2 }],
        "other": "kept"
    }));

    let updated = set_path(&p("a.b"), Value::Int(5), &tree);

    assert_eq!(get_path(&p("a.b"), &updated), Some(&Value::Int(5)));
    assert_eq!(get_path(&p("a.b"), &tree), Some(&Value::Int(1)));
    assert!(updated["a"]["c"].ptr_eq(&tree["a"]["c"]));
    assert!(updated["list"].ptr_eq(&tree["list"]));
    assert_eq!(updated["other"], "kept");
}

#[test]
fn test_delete_list_item_shifts() {
    let tree = Value::from(json!({ "list": ["a", "b", "c"] }));
    let updated = delete_path(&p("list.1"), &tree);
    assert_eq!(updated["list"], json!(["a", "c"]));
    assert_eq!(tree["list"], json!(["a", "b", "c"]));
}

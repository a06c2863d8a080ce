//! Path reads and persistent path writes on value trees.
//!
//! Reads never fail: a path that does not resolve yields `None`. Writes never mutate their
//! input. [`set_path`] and [`delete_path`] return a new tree in which only the containers
//! on the written path are copied; every sibling branch is the same `Arc` as in the input,
//! so equality checks on untouched branches stay cheap and valid.
//!
//! ```
//! use formstate::tree::{FieldPath, Value, get_path, set_path};
//! use serde_json::json;
//!
//! let tree = Value::from(json!({ "a": { "b": 1 }, "c": [1, 2] }));
//! let updated = set_path(&FieldPath::parse("a.b"), Value::Int(2), &tree);
//!
//! assert_eq!(get_path(&FieldPath::parse("a.b"), &updated), Some(&Value::Int(2)));
//! assert_eq!(get_path(&FieldPath::parse("a.b"), &tree), Some(&Value::Int(1)));
//! assert!(updated["c"].ptr_eq(&tree["c"]));
//! ```

use std::sync::Arc;

use tracing::warn;

use super::{FieldPath, Object, Segment, Value};

/// Resolves `path` in `tree`.
///
/// Index segments address list items; on an object they are looked up as keys (`"0"`).
/// Key segments never resolve inside a list. Out-of-range indices yield `None`.
pub fn get_path<'a>(path: &FieldPath, tree: &'a Value) -> Option<&'a Value> {
    let mut current = tree;
    for segment in path.segments() {
        current = child(current, segment)?;
    }
    Some(current)
}

fn child<'a>(node: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (node, segment) {
        (Value::Object(map), Segment::Key(key)) => map.get(key),
        (Value::Object(map), Segment::Index(index)) => map.get(&index.to_string()),
        (Value::List(items), Segment::Index(index)) => items.get(*index),
        _ => None,
    }
}

/// Largest number of `Null` slots a single write may pad a list with.
pub const MAX_INDEX_GAP: usize = 1 << 16;

/// Returns a new tree with `value` stored at `path`.
///
/// Missing intermediate containers are created: a list when the next segment is an index,
/// an object otherwise. A scalar in the way is replaced by the container the path needs.
/// Writing an index past the end of a list pads the gap with `Null`. Writing the root path
/// returns `value` itself.
///
/// An index more than [`MAX_INDEX_GAP`] past the end of its list is unreachable; the write
/// is dropped with a warning and the returned tree shares everything with the input.
pub fn set_path(path: &FieldPath, value: Value, tree: &Value) -> Value {
    try_set_path(path, value, tree).unwrap_or_else(|| {
        warn!(path = %path, "List index out of reach, ignoring write");
        tree.clone()
    })
}

/// Like [`set_path`], but returns `None` instead of the input tree when the path is
/// unreachable.
pub fn try_set_path(path: &FieldPath, value: Value, tree: &Value) -> Option<Value> {
    set_in(path.segments(), value, Some(tree))
}

fn set_in(segments: &[Segment], value: Value, node: Option<&Value>) -> Option<Value> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(value);
    };

    match (node, head) {
        (Some(Value::List(items)), Segment::Index(index)) => {
            if index.saturating_sub(items.len()) > MAX_INDEX_GAP {
                return None;
            }
            let updated = set_in(rest, value, items.get(*index))?;
            let mut items = Arc::clone(items);
            let slots = Arc::make_mut(&mut items);
            if *index >= slots.len() {
                slots.resize(index.checked_add(1)?, Value::Null);
            }
            slots[*index] = updated;
            Some(Value::List(items))
        }
        (Some(Value::Object(map)), segment) => {
            let key = segment.to_string();
            let updated = set_in(rest, value, map.get(&key))?;
            let mut map = Arc::clone(map);
            Arc::make_mut(&mut map).insert(key, updated);
            Some(Value::Object(map))
        }
        (_, Segment::Index(index)) => {
            if *index > MAX_INDEX_GAP {
                return None;
            }
            let mut slots = vec![Value::Null; *index];
            slots.push(set_in(rest, value, None)?);
            Some(Value::List(Arc::new(slots)))
        }
        (_, Segment::Key(key)) => {
            let mut map = Object::new();
            map.insert(key.clone(), set_in(rest, value, None)?);
            Some(Value::Object(Arc::new(map)))
        }
    }
}

/// Returns a new tree with the value at `path` removed.
///
/// Object entries are removed; list items are removed and later items shift down by one.
/// A path that does not resolve, and the root path, leave the tree unchanged (the returned
/// tree shares everything with the input).
pub fn delete_path(path: &FieldPath, tree: &Value) -> Value {
    if path.is_empty() {
        return tree.clone();
    }
    delete_in(path.segments(), tree).unwrap_or_else(|| tree.clone())
}

/// Returns `None` when nothing was removed.
fn delete_in(segments: &[Segment], node: &Value) -> Option<Value> {
    let (head, rest) = segments.split_first()?;

    if rest.is_empty() {
        return match (node, head) {
            (Value::List(items), Segment::Index(index)) if *index < items.len() => {
                let mut items = Arc::clone(items);
                Arc::make_mut(&mut items).remove(*index);
                Some(Value::List(items))
            }
            (Value::Object(map), segment) => {
                let key = segment.to_string();
                if !map.contains_key(&key) {
                    return None;
                }
                let mut map = Arc::clone(map);
                Arc::make_mut(&mut map).remove(&key);
                Some(Value::Object(map))
            }
            _ => None,
        };
    }

    let updated = delete_in(rest, child(node, head)?)?;
    match node {
        Value::List(items) => {
            let index = head.as_index()?;
            let mut items = Arc::clone(items);
            Arc::make_mut(&mut items)[index] = updated;
            Some(Value::List(items))
        }
        Value::Object(map) => {
            let mut map = Arc::clone(map);
            Arc::make_mut(&mut map).insert(head.to_string(), updated);
            Some(Value::Object(map))
        }
        _ => None,
    }
}

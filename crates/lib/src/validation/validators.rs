//! Ready-made leaf rules.
//!
//! Every constructor takes the error value reported on failure and returns a
//! [`Rule::Check`].
//!
//! ```rust
//! use formstate::validation::validators::{has_length, is_email, is_not_empty};
//! use formstate::{Rule, Value};
//!
//! let rules = Rule::fields([
//!     ("name", has_length(Some(2), None, "Name is too short")),
//!     ("email", is_email("Invalid email")),
//!     ("tags", is_not_empty("Pick at least one tag")),
//! ]);
//! ```

use regex::Regex;

use super::Rule;
use crate::tree::{FieldPath, Value, get_path, value::NULL};

/// Fails for `Null`, `false`, blank text, and empty lists or objects.
pub fn is_not_empty(error: impl Into<Value>) -> Rule {
    let error = error.into();
    Rule::check(move |value, _| {
        let empty = match value {
            Value::Null | Value::Bool(false) => true,
            Value::Text(text) => text.trim().is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => false,
        };
        empty.then(|| error.clone())
    })
}

/// Fails unless the value is text of the form `local@domain` with no whitespace.
pub fn is_email(error: impl Into<Value>) -> Rule {
    let error = error.into();
    Rule::check(move |value, _| {
        let text = value.as_text_or_empty();
        let valid = !text.chars().any(char::is_whitespace)
            && text
                .char_indices()
                .any(|(at, c)| c == '@' && at > 0 && at + 1 < text.len());
        (!valid).then(|| error.clone())
    })
}

/// Fails unless the value is text matching `pattern`.
pub fn matches(pattern: Regex, error: impl Into<Value>) -> Rule {
    let error = error.into();
    Rule::check(move |value, _| {
        let valid = value.as_text().is_some_and(|text| pattern.is_match(text));
        (!valid).then(|| error.clone())
    })
}

/// Fails unless the value is a number within `min..=max`; either bound may be open.
pub fn is_in_range(min: Option<f64>, max: Option<f64>, error: impl Into<Value>) -> Rule {
    let error = error.into();
    Rule::check(move |value, _| {
        let valid = value.as_f64().is_some_and(|number| {
            min.is_none_or(|min| number >= min) && max.is_none_or(|max| number <= max)
        });
        (!valid).then(|| error.clone())
    })
}

/// Fails unless the length of the text (in characters) or list is within `min..=max`.
pub fn has_length(min: Option<usize>, max: Option<usize>, error: impl Into<Value>) -> Rule {
    let error = error.into();
    Rule::check(move |value, _| {
        let length = match value {
            Value::Text(text) => Some(text.chars().count()),
            Value::List(items) => Some(items.len()),
            _ => None,
        };
        let valid = length.is_some_and(|length| {
            min.is_none_or(|min| length >= min) && max.is_none_or(|max| length <= max)
        });
        (!valid).then(|| error.clone())
    })
}

/// Fails unless the length of the text or list is exactly `length`.
pub fn has_exact_length(length: usize, error: impl Into<Value>) -> Rule {
    has_length(Some(length), Some(length), error)
}

/// Fails unless the value equals the value at `other` in the same form.
pub fn matches_field(other: impl Into<FieldPath>, error: impl Into<Value>) -> Rule {
    let other = other.into();
    let error = error.into();
    Rule::check(move |value, all| {
        let valid = get_path(&other, all).unwrap_or(&NULL) == value;
        (!valid).then(|| error.clone())
    })
}

/// Fails unless the value is text containing valid JSON.
pub fn is_json_string(error: impl Into<Value>) -> Rule {
    let error = error.into();
    Rule::check(move |value, _| {
        let valid = value
            .as_text()
            .is_some_and(|text| serde_json::from_str::<serde_json::Value>(text).is_ok());
        (!valid).then(|| error.clone())
    })
}

//! Rule trees and the walker that evaluates them.
//!
//! A rule tree mirrors the shape of the values it validates:
//!
//! - [`Rule::Check`] is a leaf, a function of the value at its path and the whole tree;
//! - [`Rule::Fields`] maps object keys to rules, and applies to every item when the value
//!   it meets is a list;
//! - [`Rule::Each`] applies its item rule to every item of a list, with an optional check of
//!   the list itself.
//!
//! Branch rules only descend into values of a matching shape. A `Fields` rule that meets a
//! scalar or a missing value contributes nothing; a `Check` is always called, with `Null`
//! standing in for a missing value.

use std::{collections::BTreeMap, fmt, rc::Rc};

use super::ErrorMap;
use crate::tree::{FieldPath, Segment, Value, value::NULL};

/// A leaf validator: `(value, all_values, path) -> error`.
pub type CheckFn = Rc<dyn Fn(&Value, &Value, &FieldPath) -> Option<Value>>;

/// A node of a rule tree.
#[derive(Clone)]
pub enum Rule {
    /// Validates the value at this node's path
    Check(CheckFn),
    /// Object rule: one rule per key
    Fields(BTreeMap<String, Rule>),
    /// List rule: `item` applies to every item, `list` to the list itself
    Each {
        item: Box<Rule>,
        list: Option<CheckFn>,
    },
}

impl Rule {
    /// Builds a leaf from `(value, all_values) -> Option<error>`.
    ///
    /// ```rust
    /// # use formstate::{Rule, Value};
    /// let rule = Rule::check(|value, _| (value.as_int().unwrap_or(0) < 18).then_some("Too young"));
    /// ```
    pub fn check<F, E>(check: F) -> Self
    where
        F: Fn(&Value, &Value) -> Option<E> + 'static,
        E: Into<Value>,
    {
        Rule::Check(Rc::new(move |value, all, _| check(value, all).map(Into::into)))
    }

    /// Builds a leaf that also receives the concrete path being validated.
    pub fn check_with_path<F, E>(check: F) -> Self
    where
        F: Fn(&Value, &Value, &FieldPath) -> Option<E> + 'static,
        E: Into<Value>,
    {
        Rule::Check(Rc::new(move |value, all, path| {
            check(value, all, path).map(Into::into)
        }))
    }

    /// Builds an object rule.
    pub fn fields<K: Into<String>>(fields: impl IntoIterator<Item = (K, Rule)>) -> Self {
        Rule::Fields(
            fields
                .into_iter()
                .map(|(key, rule)| (key.into(), rule))
                .collect(),
        )
    }

    /// Builds a list rule applying `item` to every item.
    pub fn each(item: Rule) -> Self {
        Rule::Each {
            item: Box::new(item),
            list: None,
        }
    }

    /// Builds a list rule that also checks the list as a whole.
    pub fn each_with_check<F, E>(item: Rule, check: F) -> Self
    where
        F: Fn(&Value, &Value) -> Option<E> + 'static,
        E: Into<Value>,
    {
        Rule::Each {
            item: Box::new(item),
            list: Some(Rc::new(move |value, all, _| check(value, all).map(Into::into))),
        }
    }

    /// Evaluates this rule against `value`, found at `path` in `all`, recording failures.
    pub(crate) fn walk(&self, value: &Value, all: &Value, path: &FieldPath, errors: &mut ErrorMap) {
        match self {
            Rule::Check(check) => {
                if let Some(error) = check(value, all, path) {
                    errors.set(path, error);
                }
            }
            Rule::Fields(fields) => match value {
                Value::List(items) => {
                    for (index, item) in items.iter().enumerate() {
                        self.walk(item, all, &path.clone().push_index(index), errors);
                    }
                }
                Value::Object(map) => {
                    for (key, rule) in fields {
                        let child = map.get(key).unwrap_or(&NULL);
                        rule.walk(child, all, &path.clone().push_key(key.as_str()), errors);
                    }
                }
                _ => {}
            },
            Rule::Each { item, list } => {
                if let Some(check) = list
                    && let Some(error) = check(value, all, path)
                {
                    errors.set(path, error);
                }
                if let Value::List(items) = value {
                    for (index, child) in items.iter().enumerate() {
                        item.walk(child, all, &path.clone().push_index(index), errors);
                    }
                }
            }
        }
    }

    /// Follows `segments` from this rule, alongside the values they address.
    ///
    /// Returns the rule governing the end of the path and the value found there, or `None`
    /// when no rule would ever be evaluated at that path by [`Rule::walk`] from the root.
    pub(crate) fn resolve<'r, 'v>(
        &'r self,
        value: &'v Value,
        segments: &[Segment],
    ) -> Option<(&'r Rule, &'v Value)> {
        let Some((head, rest)) = segments.split_first() else {
            return Some((self, value));
        };

        match (self, value, head) {
            (Rule::Fields(_), Value::List(items), Segment::Index(index)) => {
                self.resolve(items.get(*index)?, rest)
            }
            (Rule::Fields(fields), Value::Object(map), segment) => {
                let key = segment.to_string();
                let rule = fields.get(&key)?;
                rule.resolve(map.get(&key).unwrap_or(&NULL), rest)
            }
            (Rule::Each { item, .. }, Value::List(items), Segment::Index(index)) => {
                item.resolve(items.get(*index)?, rest)
            }
            _ => None,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Check(_) => write!(f, "Check"),
            Rule::Fields(fields) => f.debug_map().entries(fields.iter()).finish(),
            Rule::Each { item, list } => f
                .debug_struct("Each")
                .field("item", item)
                .field("list", &list.is_some())
                .finish(),
        }
    }
}

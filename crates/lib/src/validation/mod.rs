//! Validation: rule trees, whole-form resolvers, and the error map they produce.
//!
//! [`Validation::validate`] walks the whole value tree; [`Validation::validate_field`]
//! evaluates only what governs one path. Both produce errors keyed by the same path
//! strings, so a field-level result can overwrite a whole-form one and vice versa.

use std::{fmt, rc::Rc};

use tracing::trace;

use crate::tree::{FieldPath, Value};

mod errors;
mod rule;
#[cfg(feature = "validators")]
pub mod validators;

pub use errors::ErrorMap;
pub use rule::{CheckFn, Rule};

/// A whole-form validator producing an error map from the values.
pub type ResolverFn = Rc<dyn Fn(&Value) -> ErrorMap>;

/// Result of validating every field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValidationResult {
    pub has_errors: bool,
    pub errors: ErrorMap,
}

/// Result of validating one field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValidationResult {
    pub has_error: bool,
    pub error: Option<Value>,
}

/// How a form validates its values.
#[derive(Clone, Default)]
pub enum Validation {
    /// Nothing is ever invalid
    #[default]
    None,
    /// A rule tree mirroring the values
    Rules(Rule),
    /// A single function validating the whole form
    Resolver(ResolverFn),
}

impl Validation {
    /// Wraps a whole-form validator, such as an adapter for a schema library.
    pub fn resolver(resolver: impl Fn(&Value) -> ErrorMap + 'static) -> Self {
        Validation::Resolver(Rc::new(resolver))
    }

    /// Validates every field of `values`.
    pub fn validate(&self, values: &Value) -> FormValidationResult {
        let errors = match self {
            Validation::None => ErrorMap::new(),
            Validation::Rules(rule) => {
                let mut errors = ErrorMap::new();
                rule.walk(values, values, &FieldPath::root(), &mut errors);
                errors
            }
            Validation::Resolver(resolver) => resolver(values),
        };
        trace!(errors = errors.len(), "Validated form");

        FormValidationResult {
            has_errors: !errors.is_empty(),
            errors,
        }
    }

    /// Validates the field at `path`.
    ///
    /// Reports the error for `path` itself, or else the first error below it, exactly as
    /// [`Validation::validate`] would have keyed it.
    pub fn validate_field(&self, path: &FieldPath, values: &Value) -> FieldValidationResult {
        let errors = match self {
            Validation::None => ErrorMap::new(),
            Validation::Rules(rule) => {
                let mut errors = ErrorMap::new();
                if let Some((rule, value)) = rule.resolve(values, path.segments()) {
                    rule.walk(value, values, path, &mut errors);
                }
                errors
            }
            Validation::Resolver(resolver) => resolver(values),
        };

        let error = errors.find_at_or_below(path).map(|(_, error)| error.clone());
        trace!(path = %path, has_error = error.is_some(), "Validated field");

        FieldValidationResult {
            has_error: error.is_some(),
            error,
        }
    }
}

impl From<Rule> for Validation {
    fn from(rule: Rule) -> Self {
        Validation::Rules(rule)
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::None => write!(f, "None"),
            Validation::Rules(rule) => f.debug_tuple("Rules").field(rule).finish(),
            Validation::Resolver(_) => write!(f, "Resolver"),
        }
    }
}

//!
//! formstate: a reactive form state engine for nested, schema-less form values.
//! This library provides the state half of a form toolkit: the value tree, per-field
//! status, validation and list editing. Rendering and event binding live elsewhere and
//! talk to the engine through the [`Form`] API.
//!
//! ## Core Concepts
//!
//! * **Value tree (`tree::Value`)**: Nested objects and lists with scalar leaves. Containers are
//!   reference counted, so a write only copies the containers along the written path.
//! * **Paths (`tree::FieldPath`)**: Dot-separated addresses such as `"employees.2.name"`, parsed once
//!   into key and index segments.
//! * **Values store (`store::ValuesStore`)**: The current values plus the snapshot used as the
//!   dirty baseline.
//! * **Status (`status::StatusTracker`)**: Touched and dirty maps where an explicit entry overrides
//!   the value derived from data.
//! * **Validation (`validation`)**: Rule trees mirroring the value shape, or a resolver function,
//!   producing a path-keyed [`ErrorMap`].
//! * **List operators (`list`)**: Insert, remove, reorder and replace on arrays, with every
//!   side-channel key re-indexed to follow its item.
//! * **Watchers (`watch`)**: Per-path callbacks notified after a commit changed their value.
//! * **Modes (`mode`)**: Controlled forms push every change to the reactive layer; uncontrolled
//!   forms only bump re-key counters.
//!
//! ## Example
//!
//! ```
//! use formstate::{Form, Rule, path};
//! use serde_json::json;
//!
//! let mut form = Form::builder()
//!     .initial_values(json!({ "name": "", "tags": ["a", "b"] }))
//!     .validate(Rule::fields([(
//!         "name",
//!         Rule::check(|value, _| value.as_text_or_empty().is_empty().then_some("Required")),
//!     )]))
//!     .build();
//!
//! form.set_field_value("name", "Alice");
//! assert!(form.is_dirty(Some(&path!("name"))));
//!
//! form.remove_list_item("tags", 0);
//! assert_eq!(form.values()["tags"], json!(["b"]));
//! assert!(!form.validate().has_errors);
//! ```

pub mod form;
pub mod list;
pub mod mode;
pub mod status;
pub mod store;
pub mod tree;
pub mod validation;
pub mod watch;

pub use form::{
    FieldBinding, Form, FormBuilder, FormSettings, InputOptions, InputProps, InputType,
    InputValue, SetFieldValueOptions, TouchTrigger, ValidateTrigger,
};
pub use mode::Mode;
pub use status::StatusMap;
pub use tree::{FORM_INDEX, FieldPath, Segment, Value};
pub use validation::{ErrorMap, Rule, Validation};
pub use watch::{FieldChange, Subscription};

/// Result type used throughout the formstate library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the formstate library.
///
/// Commits (field writes, list operators, validation) never fail; errors only come from
/// the typed bridges between [`Value`] trees and Rust types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured value tree errors from the tree module
    #[error(transparent)]
    Tree(tree::TreeError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Tree(_) => "tree",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error is a value type mismatch.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Tree(tree_err) => tree_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error came from converting between a value tree and a Rust type.
    pub fn is_conversion_error(&self) -> bool {
        match self {
            Error::Serialize(_) => true,
            Error::Tree(tree_err) => tree_err.is_conversion_error(),
        }
    }
}

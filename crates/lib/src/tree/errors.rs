//! Error types for value tree operations.
//!
//! Path reads and writes never fail (a missing path reads as `None`), so these errors only
//! cover typed access: extracting a Rust scalar from a [`Value`](super::Value) or converting
//! a whole tree to and from a serde type.

use thiserror::Error;

/// Structured error types for value tree operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TreeError {
    /// Type mismatch when extracting a typed value
    #[error("Value type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Conversion between a value tree and a Rust type failed
    #[error("Value conversion failed: {reason}")]
    Conversion { reason: String },
}

impl TreeError {
    /// Check if this error is related to type mismatches
    pub fn is_type_error(&self) -> bool {
        matches!(self, TreeError::TypeMismatch { .. })
    }

    /// Check if this error came from a serde conversion
    pub fn is_conversion_error(&self) -> bool {
        matches!(self, TreeError::Conversion { .. })
    }
}

// Conversion from TreeError to the main Error type
impl From<TreeError> for crate::Error {
    fn from(err: TreeError) -> Self {
        crate::Error::Tree(err)
    }
}

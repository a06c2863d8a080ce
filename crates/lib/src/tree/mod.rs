//! Value trees and the paths that address them.
//!
//! This module is the path resolver of the engine: it parses dotted paths into segments
//! and performs reads and persistent writes on schema-less value trees.
//!
//! # Core Types
//!
//! - [`Value`] - A nested tree of objects, lists and scalars with shared containers
//! - [`FieldPath`] - A normalized path with its parsed [`Segment`]s
//! - [`get_path`], [`set_path`], [`delete_path`] - Reads and structurally shared writes

pub mod access;
pub mod errors;
pub mod path;
pub mod value;

pub use access::{MAX_INDEX_GAP, delete_path, get_path, set_path, try_set_path};
pub use errors::TreeError;
pub use path::{FORM_INDEX, FieldPath, Segment};
pub use value::{Object, Value};

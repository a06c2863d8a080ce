//! Field paths for addressing locations in a value tree.
//!
//! A path is a dot-separated string such as `"employees.2.name"`. Components made only of
//! ASCII digits address list items; every other component is an object key. Paths are
//! strings at the API boundary, but [`FieldPath`] parses them once and keeps the segment list
//! next to the normalized string, so tree access and list re-indexing work on segments
//! instead of re-splitting strings.
//!
//! # Usage
//!
//! ```rust
//! use formstate::tree::{FieldPath, Segment};
//! use formstate::path;
//!
//! // Parse from a string (automatically normalized)
//! let parsed = FieldPath::parse("employees..2.name.");
//! assert_eq!(parsed.as_str(), "employees.2.name");
//! assert_eq!(parsed.segments()[1], Segment::Index(2));
//!
//! // Build incrementally
//! let built = FieldPath::root().push_key("employees").push_index(2).push_key("name");
//! assert_eq!(built, parsed);
//!
//! // Or with the macro
//! assert_eq!(path!("employees", 2, "name"), parsed);
//! ```

use std::{fmt, str::FromStr};

/// Wildcard written in place of a list index in path patterns.
///
/// `"employees.FORM_INDEX.name"` matches `"employees.0.name"`, `"employees.7.name"` and so on.
pub const FORM_INDEX: &str = "FORM_INDEX";

/// Normalizes a path string by cleaning up dots and empty components.
///
/// - Empty string "" → empty string (refers to the whole tree)
/// - Leading dots ".user" → "user"
/// - Trailing dots "user." → "user"
/// - Consecutive dots "user..profile" → "user.profile"
/// - Pure dots "..." → empty string
///
/// # Examples
///
/// ```rust
/// # use formstate::tree::path::normalize_path;
/// assert_eq!(normalize_path(""), "");
/// assert_eq!(normalize_path(".user"), "user");
/// assert_eq!(normalize_path("user..profile"), "user.profile");
/// assert_eq!(normalize_path("..."), "");
/// ```
pub fn normalize_path(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    input
        .split('.')
        .filter(|component| !component.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// A single parsed component of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// Object key access
    Key(String),
    /// List index access
    Index(usize),
}

impl Segment {
    /// Parses one path component.
    ///
    /// Canonical decimal components (`"0"`, `"12"`) become indices; anything else,
    /// including `"007"` and digit strings too large for `usize`, is a key.
    pub fn parse(component: &str) -> Self {
        let canonical = component == "0" || !component.starts_with('0');
        if canonical && !component.is_empty() && component.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = component.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Key(component.to_string())
    }

    /// Returns the index if this is an index segment.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(i) => Some(*i),
            Segment::Key(_) => None,
        }
    }

    /// Returns the key if this is a key segment.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k),
            Segment::Index(_) => None,
        }
    }

    /// Returns true if this is an index segment.
    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => write!(f, "{k}"),
            Segment::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

impl From<&str> for Segment {
    fn from(component: &str) -> Self {
        Segment::parse(component)
    }
}

/// An owned, normalized path with its parsed segments.
///
/// The string form is what the engine uses as the key of every path-keyed map (errors,
/// dirty, touched, watchers), so two `FieldPath`s that compare equal always produce the
/// same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldPath {
    inner: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Creates the empty path, which addresses the whole tree.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a path string, normalizing away empty components.
    pub fn parse(input: &str) -> Self {
        let inner = normalize_path(input);
        let segments = if inner.is_empty() {
            Vec::new()
        } else {
            inner.split('.').map(Segment::parse).collect()
        };
        Self { inner, segments }
    }

    /// Creates a path from already parsed segments.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let inner = segments
            .iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>()
            .join(".");
        Self { inner, segments }
    }

    /// Appends one or more components given as a string (builder pattern).
    ///
    /// The input is normalized, so `push("a.b")` appends two segments and `push("")` is a
    /// no-op.
    pub fn push(mut self, path: impl AsRef<str>) -> Self {
        for component in path.as_ref().split('.').filter(|c| !c.is_empty()) {
            self.push_segment(Segment::parse(component));
        }
        self
    }

    /// Appends an object key segment (builder pattern).
    pub fn push_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if key.is_empty() {
            return self;
        }
        self.push_segment(Segment::Key(key));
        self
    }

    /// Appends a list index segment (builder pattern).
    pub fn push_index(mut self, index: usize) -> Self {
        self.push_segment(Segment::Index(index));
        self
    }

    /// Joins this path with another path.
    pub fn join(mut self, other: &FieldPath) -> Self {
        for segment in &other.segments {
            self.push_segment(segment.clone());
        }
        self
    }

    fn push_segment(&mut self, segment: Segment) {
        if !self.inner.is_empty() {
            self.inner.push('.');
        }
        self.inner.push_str(&segment.to_string());
        self.segments.push(segment);
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if this is the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the parent path, or `None` for the root.
    pub fn parent(&self) -> Option<FieldPath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self::from_segments(
            self.segments[..self.segments.len() - 1].to_vec(),
        ))
    }

    /// Returns the last segment, or `None` for the root.
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Returns true if `prefix`'s segments are a prefix of this path's segments.
    ///
    /// Every path starts with the root path and with itself.
    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Returns true if this path lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &FieldPath) -> bool {
        self.segments.len() > ancestor.segments.len() && self.starts_with(ancestor)
    }

    /// If this path addresses an item of the list at `list` (or something inside one),
    /// returns that item's index.
    ///
    /// ```rust
    /// # use formstate::tree::FieldPath;
    /// let list = FieldPath::parse("items");
    /// assert_eq!(FieldPath::parse("items.3.name").list_item_of(&list), Some(3));
    /// assert_eq!(FieldPath::parse("items.3").list_item_of(&list), Some(3));
    /// assert_eq!(FieldPath::parse("items").list_item_of(&list), None);
    /// assert_eq!(FieldPath::parse("other.3").list_item_of(&list), None);
    /// ```
    pub fn list_item_of(&self, list: &FieldPath) -> Option<usize> {
        if !self.is_descendant_of(list) {
            return None;
        }
        self.segments[list.len()].as_index()
    }

    /// Returns a copy of this path with the segment at `position` replaced.
    ///
    /// Positions past the end leave the path unchanged.
    pub fn with_segment(&self, position: usize, segment: Segment) -> FieldPath {
        let mut segments = self.segments.clone();
        if let Some(slot) = segments.get_mut(position) {
            *slot = segment;
        }
        Self::from_segments(segments)
    }

    /// Returns the path with every index replaced by [`FORM_INDEX`].
    ///
    /// Used to match concrete paths against per-field option lists written with the
    /// wildcard.
    pub fn form_index_pattern(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Index(_) => FORM_INDEX.to_string(),
                Segment::Key(k) => k.clone(),
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Returns true if this path matches `pattern`, where any component of the pattern may
    /// be [`FORM_INDEX`] to stand for an arbitrary list index.
    pub fn matches_pattern(&self, pattern: &str) -> bool {
        let pattern = normalize_path(pattern);
        pattern == self.inner || pattern == self.form_index_pattern()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.is_empty() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", self.inner)
        }
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl FromStr for FieldPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&String> for FieldPath {
    fn from(s: &String) -> Self {
        Self::parse(s)
    }
}

impl From<&FieldPath> for FieldPath {
    fn from(path: &FieldPath) -> Self {
        path.clone()
    }
}

/// Constructs a [`FieldPath`] from mixed components.
///
/// Every argument is converted with `to_string()` and normalized, so numbers become index
/// segments and dotted strings contribute several segments.
///
/// ```rust
/// # use formstate::path;
/// let index = 4;
/// let p = path!("orders", index, "lines.0");
/// assert_eq!(p.as_str(), "orders.4.lines.0");
/// assert!(path!().is_empty());
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::tree::FieldPath::root()
    };

    ($($component:expr),+ $(,)?) => {{
        let mut path = $crate::tree::FieldPath::root();
        $(
            path = path.push($component.to_string());
        )+
        path
    }};
}

//! # Document Paths
//!
//! Typed addressing over nested key-value documents, with get/set/copy
//! primitives shared by every document representation in the workspace.
//!
//! A [`DocPath`] is an ordered sequence of [`Segment`]s. The empty path
//! addresses the document root itself, so every path resolves under a
//! common root without inventing a placeholder key for it.
//!
//! ## Write semantics
//!
//! [`set_path`] creates missing intermediate objects. An intermediate
//! that exists but is a scalar is replaced by an empty object. Array
//! elements can be written only at an existing index or appended at
//! index `len`; a gap is never padded.

use std::fmt;

use crate::error::CoreError;

/// One step in a [`DocPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Member name inside an object.
    Key(String),
    /// Zero-based position inside an array.
    Index(usize),
}

impl Segment {
    /// Returns the member name if this is a [`Segment::Key`].
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k),
            Segment::Index(_) => None,
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// A typed path into a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPath(Vec<Segment>);

impl DocPath {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from any sequence of segment-convertible items.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Segment>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse dotted notation with optional bracketed indices,
    /// e.g. `body.items[2].name`. The empty string is the root.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPath`] for empty key segments,
    /// unterminated brackets, or non-numeric indices.
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidPath {
            path: text.to_string(),
            reason: reason.to_string(),
        };

        if text.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for part in text.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(pos) => (&part[..pos], &part[pos..]),
                None => (part, ""),
            };
            if key.is_empty() && rest.is_empty() {
                return Err(invalid("empty segment"));
            }
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }
            while !rest.is_empty() {
                let close = rest
                    .find(']')
                    .ok_or_else(|| invalid("unterminated '['"))?;
                let index = rest[1..close]
                    .parse::<usize>()
                    .map_err(|_| invalid("index must be a non-negative integer"))?;
                segments.push(Segment::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(invalid("unexpected text after ']'"));
                }
            }
        }
        Ok(Self(segments))
    }

    /// Returns the segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// The final segment, if any.
    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    /// The path without its final segment. The root's parent is `None`.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, parents)| Self(parents.to_vec()))
    }

    /// Returns a sibling path whose final key is rewritten by `rename`.
    ///
    /// Returns `None` for the root or when the final segment is an index.
    pub fn map_last_key(&self, rename: impl FnOnce(&str) -> String) -> Option<Self> {
        let (last, parents) = self.0.split_last()?;
        let key = last.as_key()?;
        let mut segments = parents.to_vec();
        segments.push(Segment::Key(rename(key)));
        Some(Self(segments))
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(k) if i == 0 => write!(f, "{k}")?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(n) => write!(f, "[{n}]")?,
            }
        }
        Ok(())
    }
}

/// A nested key-value value that [`DocPath`]s can address.
pub trait Document: Clone {
    /// A fresh empty object.
    fn empty_object() -> Self;

    /// True for objects and arrays.
    fn is_container(&self) -> bool;

    /// Borrow the direct child named by `segment`.
    fn child(&self, segment: &Segment) -> Option<&Self>;

    /// Mutably borrow the direct child named by `segment`.
    fn child_mut(&mut self, segment: &Segment) -> Option<&mut Self>;

    /// Write `value` as the direct child named by `segment`.
    ///
    /// Writing a key into a non-object first replaces `self` with an
    /// empty object. Returns `false` if an index is out of range or
    /// `self` is not an array.
    fn put_child(&mut self, segment: &Segment, value: Self) -> bool;
}

/// Look up the value at `path`.
pub fn get_path<'a, D: Document>(doc: &'a D, path: &DocPath) -> Option<&'a D> {
    path.segments()
        .iter()
        .try_fold(doc, |node, segment| node.child(segment))
}

/// Write `value` at `path`, creating intermediate objects.
///
/// Returns `false` when an array index along the way cannot be written.
pub fn set_path<D: Document>(doc: &mut D, path: &DocPath, value: D) -> bool {
    let Some((last, parents)) = path.segments().split_last() else {
        *doc = value;
        return true;
    };

    let mut node = doc;
    for segment in parents {
        let needs_container = node.child(segment).map_or(true, |c| !c.is_container());
        if needs_container && !node.put_child(segment, D::empty_object()) {
            return false;
        }
        node = match node.child_mut(segment) {
            Some(next) => next,
            None => return false,
        };
    }
    node.put_child(last, value)
}

/// Copy the value at `path` in `source` to the same path in `dest`.
///
/// An absent source value leaves `dest` untouched and returns `false`.
pub fn copy_path<D: Document>(source: &D, dest: &mut D, path: &DocPath) -> bool {
    match get_path(source, path) {
        Some(value) => set_path(dest, path, value.clone()),
        None => false,
    }
}

impl Document for serde_json::Value {
    fn empty_object() -> Self {
        serde_json::Value::Object(serde_json::Map::new())
    }

    fn is_container(&self) -> bool {
        self.is_object() || self.is_array()
    }

    fn child(&self, segment: &Segment) -> Option<&Self> {
        match (self, segment) {
            (serde_json::Value::Object(map), Segment::Key(k)) => map.get(k),
            (serde_json::Value::Array(items), Segment::Index(n)) => items.get(*n),
            _ => None,
        }
    }

    fn child_mut(&mut self, segment: &Segment) -> Option<&mut Self> {
        match (self, segment) {
            (serde_json::Value::Object(map), Segment::Key(k)) => map.get_mut(k),
            (serde_json::Value::Array(items), Segment::Index(n)) => items.get_mut(*n),
            _ => None,
        }
    }

    fn put_child(&mut self, segment: &Segment, value: Self) -> bool {
        match segment {
            Segment::Key(k) => {
                if !self.is_object() {
                    *self = Self::empty_object();
                }
                match self {
                    serde_json::Value::Object(map) => {
                        map.insert(k.clone(), value);
                        true
                    }
                    _ => false,
                }
            }
            Segment::Index(n) => match self {
                serde_json::Value::Array(items) if *n < items.len() => {
                    items[*n] = value;
                    true
                }
                serde_json::Value::Array(items) if *n == items.len() => {
                    items.push(value);
                    true
                }
                _ => false,
            },
        }
    }
}

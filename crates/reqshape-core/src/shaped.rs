//! # Shaped Values: Extraction Output
//!
//! `Shaped` is the JSON data model extended with native calendar values.
//! The main extraction pass works on `serde_json::Value` (that form is
//! what the validator sees); the date-cast pass converts it into `Shaped`
//! and swaps flagged strings for [`Shaped::Date`] / [`Shaped::DateTime`].
//!
//! ## Serialization
//!
//! Dates serialize as `YYYY-MM-DD` and date-times as RFC 3339, so a
//! shaped document always renders back to plain JSON. Object members keep
//! the order they were inserted in, which is declared property order.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Serialize, Serializer};
use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::path::{Document, Segment};

/// A normalized document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shaped {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number.
    Number(Number),
    /// JSON string.
    String(String),
    /// A calendar date produced from a `format: date` string.
    Date(NaiveDate),
    /// An instant produced from a `format: date-time` string.
    DateTime(DateTime<FixedOffset>),
    /// JSON array.
    Array(Vec<Shaped>),
    /// JSON object.
    Object(IndexMap<String, Shaped>),
}

impl Shaped {
    /// Member lookup on objects.
    pub fn get(&self, key: &str) -> Option<&Shaped> {
        match self {
            Shaped::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the string slice if this is a [`Shaped::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Shaped::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the date if this is a [`Shaped::Date`].
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Shaped::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the instant if this is a [`Shaped::DateTime`].
    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Shaped::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// True for [`Shaped::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Shaped::Null)
    }

    /// Render to plain JSON. Dates become strings.
    pub fn into_json(self) -> Value {
        match self {
            Shaped::Null => Value::Null,
            Shaped::Bool(b) => Value::Bool(b),
            Shaped::Number(n) => Value::Number(n),
            Shaped::String(s) => Value::String(s),
            Shaped::Date(d) => Value::String(format_date(&d)),
            Shaped::DateTime(dt) => Value::String(dt.to_rfc3339()),
            Shaped::Array(items) => Value::Array(items.into_iter().map(Shaped::into_json).collect()),
            Shaped::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect(),
            ),
        }
    }
}

fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

impl From<Value> for Shaped {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Shaped::Null,
            Value::Bool(b) => Shaped::Bool(b),
            Value::Number(n) => Shaped::Number(n),
            Value::String(s) => Shaped::String(s),
            Value::Array(items) => Shaped::Array(items.into_iter().map(Shaped::from).collect()),
            Value::Object(map) => Shaped::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Shaped::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Structural comparison against plain JSON. Date variants never equal
/// a JSON value, not even their own string rendering.
impl PartialEq<Value> for Shaped {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Shaped::Null, Value::Null) => true,
            (Shaped::Bool(a), Value::Bool(b)) => a == b,
            (Shaped::Number(a), Value::Number(b)) => a == b,
            (Shaped::String(a), Value::String(b)) => a == b,
            (Shaped::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
            }
            (Shaped::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| v == w))
            }
            _ => false,
        }
    }
}

impl Serialize for Shaped {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Shaped::Null => serializer.serialize_unit(),
            Shaped::Bool(b) => serializer.serialize_bool(*b),
            Shaped::Number(n) => n.serialize(serializer),
            Shaped::String(s) => serializer.serialize_str(s),
            Shaped::Date(d) => serializer.serialize_str(&format_date(d)),
            Shaped::DateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Shaped::Array(items) => serializer.collect_seq(items),
            Shaped::Object(map) => serializer.collect_map(map),
        }
    }
}

impl Document for Shaped {
    fn empty_object() -> Self {
        Shaped::Object(IndexMap::new())
    }

    fn is_container(&self) -> bool {
        matches!(self, Shaped::Object(_) | Shaped::Array(_))
    }

    fn child(&self, segment: &Segment) -> Option<&Self> {
        match (self, segment) {
            (Shaped::Object(map), Segment::Key(k)) => map.get(k),
            (Shaped::Array(items), Segment::Index(n)) => items.get(*n),
            _ => None,
        }
    }

    fn child_mut(&mut self, segment: &Segment) -> Option<&mut Self> {
        match (self, segment) {
            (Shaped::Object(map), Segment::Key(k)) => map.get_mut(k),
            (Shaped::Array(items), Segment::Index(n)) => items.get_mut(*n),
            _ => None,
        }
    }

    fn put_child(&mut self, segment: &Segment, value: Self) -> bool {
        match segment {
            Segment::Key(k) => {
                if !matches!(self, Shaped::Object(_)) {
                    *self = Self::empty_object();
                }
                match self {
                    Shaped::Object(map) => {
                        map.insert(k.clone(), value);
                        true
                    }
                    _ => false,
                }
            }
            Segment::Index(n) => match self {
                Shaped::Array(items) if *n < items.len() => {
                    items[*n] = value;
                    true
                }
                Shaped::Array(items) if *n == items.len() => {
                    items.push(value);
                    true
                }
                _ => false,
            },
        }
    }
}

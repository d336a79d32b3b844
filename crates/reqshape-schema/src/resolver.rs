//! # Shape Resolution
//!
//! Decides which [`SchemaShape`] a raw schema literal has. Rules, in
//! order:
//!
//! 1. A `properties` map makes the node an object, whatever its `type`.
//! 2. `allOf`, then `oneOf`, then `anyOf` make it a combinator.
//! 3. `type: array` makes it an array.
//! 4. A leaf type (`string`, `number`, `integer`, `boolean`, `null`,
//!    `object`) makes it a primitive.
//! 5. An `enum` list makes it an enum.
//! 6. Anything else is an object with no properties.
//!
//! When `type` is a list of names only the first is considered.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::node::{CombinatorKind, PrimitiveType};

/// Effective shape of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaShape {
    /// Nested object.
    Object,
    /// Array or tuple.
    Array,
    /// Typed leaf.
    Primitive,
    /// Untyped enum leaf.
    Enum,
    /// `allOf` / `oneOf` / `anyOf`.
    Combinator,
}

impl SchemaShape {
    /// Lowercase name, as it serializes.
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaShape::Object => "object",
            SchemaShape::Array => "array",
            SchemaShape::Primitive => "primitive",
            SchemaShape::Enum => "enum",
            SchemaShape::Combinator => "combinator",
        }
    }
}

/// Combinator keywords in the precedence a single node honors.
pub(crate) const COMBINATOR_PRECEDENCE: [CombinatorKind; 3] = [
    CombinatorKind::AllOf,
    CombinatorKind::OneOf,
    CombinatorKind::AnyOf,
];

/// The declared type name, taking the first entry of a type list.
///
/// # Errors
///
/// Returns [`SchemaError::Malformed`] if `type` is neither a string nor
/// a list of strings.
pub(crate) fn declared_type_name<'a>(
    literal: &'a Map<String, Value>,
    pointer: &str,
) -> Result<Option<&'a str>, SchemaError> {
    match literal.get("type") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(name)) => Ok(Some(name)),
        Some(Value::Array(names)) => match names.first() {
            None => Ok(None),
            Some(Value::String(name)) => Ok(Some(name)),
            Some(_) => Err(SchemaError::malformed(pointer, "'type' list must contain strings")),
        },
        Some(_) => Err(SchemaError::malformed(
            pointer,
            "'type' must be a string or a list of strings",
        )),
    }
}

/// Classify a schema literal.
///
/// # Errors
///
/// Returns [`SchemaError::Malformed`] for an unsupported `type` name or
/// a badly typed `type` keyword.
pub fn resolve_shape(literal: &Map<String, Value>, pointer: &str) -> Result<SchemaShape, SchemaError> {
    if has(literal, "properties") {
        return Ok(SchemaShape::Object);
    }
    if COMBINATOR_PRECEDENCE.iter().any(|k| has(literal, k.keyword())) {
        return Ok(SchemaShape::Combinator);
    }
    match declared_type_name(literal, pointer)? {
        Some("array") => return Ok(SchemaShape::Array),
        Some(name) if PrimitiveType::from_name(name).is_some() => return Ok(SchemaShape::Primitive),
        Some(name) => {
            return Err(SchemaError::malformed(pointer, format!("unsupported type '{name}'")));
        }
        None => {}
    }
    if matches!(literal.get("enum"), Some(Value::Array(_))) {
        return Ok(SchemaShape::Enum);
    }
    Ok(SchemaShape::Object)
}

fn has(literal: &Map<String, Value>, key: &str) -> bool {
    literal.get(key).is_some_and(|v| !v.is_null())
}

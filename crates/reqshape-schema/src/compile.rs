//! # Schema Compilation
//!
//! Turns a schema literal into an immutable [`SchemaNode`] tree. This
//! runs once per route; the result is `Send + Sync` and shared by every
//! concurrent extraction on that route.
//!
//! Compilation is the only place the literal is inspected. Contract
//! violations (a `properties` that is not an object, a non-boolean
//! flag, an unknown type name, ...) are reported here with a JSON
//! Pointer to the offending node.

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::node::{
    ArrayItems, CombinatorKind, CombinatorNode, DateFormat, LeafOptions, PrimitiveType, SchemaNode,
};
use crate::resolver::{declared_type_name, resolve_shape, SchemaShape, COMBINATOR_PRECEDENCE};

/// Keys accepted for the parse flag.
const PARSE_KEYS: [&str; 2] = ["##parse", "parse"];
/// Keys accepted for the snake-case alias flag.
const SNAKE_KEYS: [&str; 2] = ["##snake", "snake_alias"];

/// Order in which root-level combinators get their supplemental pass.
const ROOT_COMBINATOR_ORDER: [CombinatorKind; 3] = [
    CombinatorKind::OneOf,
    CombinatorKind::AnyOf,
    CombinatorKind::AllOf,
];

/// A compiled schema, ready for any number of extractions.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    root: SchemaNode,
    root_combinators: Vec<CombinatorNode>,
}

impl CompiledSchema {
    /// Compile a schema literal.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Malformed`] if the literal does not follow
    /// the reduced vocabulary.
    pub fn compile(literal: &Value) -> Result<Self, SchemaError> {
        let map = as_schema_object(literal, "")?;
        let root = compile_node(map, "")?;

        // The root keeps every combinator it carries, even alongside
        // `properties`, for the supplemental whole-document pass.
        let mut root_combinators = Vec::new();
        for kind in ROOT_COMBINATOR_ORDER {
            if let Some(node) = compile_combinator(map, kind, "")? {
                root_combinators.push(node);
            }
        }

        tracing::debug!(
            root_shape = ?root.shape(),
            root_combinators = root_combinators.len(),
            "compiled extraction schema"
        );

        Ok(Self {
            root,
            root_combinators,
        })
    }

    /// The root node.
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Combinators declared directly on the root, in supplemental-pass
    /// order (`oneOf`, `anyOf`, `allOf`).
    pub fn root_combinators(&self) -> &[CombinatorNode] {
        &self.root_combinators
    }

    /// Number of properties declared on the root object, if it is one.
    pub fn root_property_count(&self) -> usize {
        match &self.root {
            SchemaNode::Object { properties } => properties.len(),
            _ => 0,
        }
    }
}

fn as_schema_object<'a>(value: &'a Value, pointer: &str) -> Result<&'a Map<String, Value>, SchemaError> {
    value
        .as_object()
        .ok_or_else(|| SchemaError::malformed(pointer, "schema node must be an object"))
}

fn compile_node(map: &Map<String, Value>, pointer: &str) -> Result<SchemaNode, SchemaError> {
    match resolve_shape(map, pointer)? {
        SchemaShape::Object => compile_object(map, pointer),
        SchemaShape::Combinator => {
            let node = COMBINATOR_PRECEDENCE
                .iter()
                .find_map(|kind| compile_combinator(map, *kind, pointer).transpose())
                .transpose()?;
            Ok(node.map_or_else(SchemaNode::empty_object, SchemaNode::Combinator))
        }
        SchemaShape::Array => compile_array(map, pointer),
        SchemaShape::Primitive => {
            let name = declared_type_name(map, pointer)?.unwrap_or_default();
            let declared_type = PrimitiveType::from_name(name).ok_or_else(|| {
                SchemaError::malformed(pointer, format!("unsupported type '{name}'"))
            })?;
            Ok(SchemaNode::Primitive {
                declared_type,
                options: leaf_options(map, pointer)?,
            })
        }
        SchemaShape::Enum => {
            let values = match map.get("enum") {
                Some(Value::Array(values)) => values.clone(),
                _ => Vec::new(),
            };
            Ok(SchemaNode::Enum {
                values,
                options: leaf_options(map, pointer)?,
            })
        }
    }
}

fn compile_object(map: &Map<String, Value>, pointer: &str) -> Result<SchemaNode, SchemaError> {
    let properties = match map.get("properties") {
        None | Some(Value::Null) => return Ok(SchemaNode::empty_object()),
        Some(Value::Object(props)) => props,
        Some(_) => return Err(SchemaError::malformed(pointer, "'properties' must be an object")),
    };

    if !pointer.is_empty() {
        for kind in COMBINATOR_PRECEDENCE {
            if map.contains_key(kind.keyword()) {
                tracing::warn!(
                    pointer,
                    keyword = kind.keyword(),
                    "combinator on a node with properties is ignored by extraction"
                );
            }
        }
    }

    let mut compiled = Vec::with_capacity(properties.len());
    for (name, child) in properties {
        let child_pointer = format!("{pointer}/properties/{}", escape_pointer(name));
        let child_map = as_schema_object(child, &child_pointer)?;
        compiled.push((name.clone(), compile_node(child_map, &child_pointer)?));
    }
    Ok(SchemaNode::Object {
        properties: compiled,
    })
}

fn compile_array(map: &Map<String, Value>, pointer: &str) -> Result<SchemaNode, SchemaError> {
    let items_pointer = format!("{pointer}/items");
    let items = match map.get("items") {
        None | Some(Value::Null) => ArrayItems::Homogeneous(Box::new(SchemaNode::empty_object())),
        Some(Value::Array(entries)) => {
            let mut tuple = Vec::with_capacity(entries.len());
            for (i, entry) in entries.iter().enumerate() {
                let entry_pointer = format!("{items_pointer}/{i}");
                let entry_map = as_schema_object(entry, &entry_pointer)?;
                tuple.push(compile_node(entry_map, &entry_pointer)?);
            }
            ArrayItems::Tuple(tuple)
        }
        Some(Value::Object(entry)) => {
            ArrayItems::Homogeneous(Box::new(compile_node(entry, &items_pointer)?))
        }
        Some(_) => {
            return Err(SchemaError::malformed(
                pointer,
                "'items' must be a schema or a list of schemas",
            ))
        }
    };
    Ok(SchemaNode::Array {
        items,
        parse: flag(map, &PARSE_KEYS, pointer)?,
    })
}

fn compile_combinator(
    map: &Map<String, Value>,
    kind: CombinatorKind,
    pointer: &str,
) -> Result<Option<CombinatorNode>, SchemaError> {
    let keyword = kind.keyword();
    let entries = match map.get(keyword) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(SchemaError::malformed(pointer, format!("'{keyword}' must be a list of schemas")))
        }
    };

    let mut variants = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let entry_pointer = format!("{pointer}/{keyword}/{i}");
        let variant = compile_node(as_schema_object(entry, &entry_pointer)?, &entry_pointer)?;
        if !matches!(variant, SchemaNode::Object { .. }) {
            tracing::warn!(
                pointer = %entry_pointer,
                shape = ?variant.shape(),
                "non-object combinator variant is not extracted"
            );
        }
        variants.push(variant);
    }
    Ok(Some(CombinatorNode { kind, variants }))
}

fn leaf_options(map: &Map<String, Value>, pointer: &str) -> Result<LeafOptions, SchemaError> {
    let date_format = match map.get("format") {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => DateFormat::from_name(name),
        Some(_) => return Err(SchemaError::malformed(pointer, "'format' must be a string")),
    };
    Ok(LeafOptions {
        date_format,
        parse: flag(map, &PARSE_KEYS, pointer)?,
        snake_alias: flag(map, &SNAKE_KEYS, pointer)?,
        default: map.get("default").filter(|v| !v.is_null()).cloned(),
    })
}

fn flag(map: &Map<String, Value>, keys: &[&str], pointer: &str) -> Result<bool, SchemaError> {
    let mut set = false;
    for key in keys {
        match map.get(*key) {
            None => {}
            Some(Value::Bool(b)) => set |= *b,
            Some(_) => {
                return Err(SchemaError::malformed(pointer, format!("'{key}' must be a boolean")))
            }
        }
    }
    Ok(set)
}

/// RFC 6901 escaping for a pointer token.
fn escape_pointer(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

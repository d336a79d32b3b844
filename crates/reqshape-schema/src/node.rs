//! # Schema Nodes
//!
//! The compiled form of the reduced schema vocabulary. Each node is one
//! shape; classification happened once, in [`crate::compile`], so the
//! extractor only ever pattern-matches.

use serde_json::Value;

use crate::resolver::SchemaShape;

/// Declared leaf types. `Object` here means an object schema without
/// `properties`, which the extractor treats as an opaque leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `type: string`.
    String,
    /// `type: number`.
    Number,
    /// `type: integer`.
    Integer,
    /// `type: boolean`.
    Boolean,
    /// `type: null`.
    Null,
    /// `type: object` without `properties`.
    Object,
}

impl PrimitiveType {
    /// Map a JSON Schema type name to a leaf type. `array` is not a leaf.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    /// True for `number` and `integer`.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Integer)
    }
}

/// The two `format` values that trigger a deferred date cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `format: date` (`YYYY-MM-DD`).
    Date,
    /// `format: date-time` (RFC 3339).
    DateTime,
}

impl DateFormat {
    /// Recognize a `format` keyword value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "date" => Some(Self::Date),
            "date-time" => Some(Self::DateTime),
            _ => None,
        }
    }
}

/// Per-leaf extraction controls shared by primitive and enum leaves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeafOptions {
    /// `format: date | date-time`, if declared.
    pub date_format: Option<DateFormat>,
    /// The `##parse` flag.
    pub parse: bool,
    /// The `##snake` flag.
    pub snake_alias: bool,
    /// The non-null `default`, if declared.
    pub default: Option<Value>,
}

/// `items` of an array schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayItems {
    /// One schema applied to every element.
    Homogeneous(Box<SchemaNode>),
    /// Fixed-length, positionally typed elements.
    Tuple(Vec<SchemaNode>),
}

/// Which combinator keyword a node carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombinatorKind {
    /// `allOf`.
    AllOf,
    /// `oneOf`.
    OneOf,
    /// `anyOf`.
    AnyOf,
}

impl CombinatorKind {
    /// The JSON Schema keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::AllOf => "allOf",
            Self::OneOf => "oneOf",
            Self::AnyOf => "anyOf",
        }
    }
}

/// A combinator and its compiled variants.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinatorNode {
    /// The keyword.
    pub kind: CombinatorKind,
    /// Variants in declaration order.
    pub variants: Vec<SchemaNode>,
}

impl CombinatorNode {
    /// Variants the extractor visits: those shaped as objects.
    ///
    /// Every variant is merged into the same destination; which one the
    /// input actually matches is a validator concern.
    pub fn object_variants(&self) -> impl Iterator<Item = &SchemaNode> {
        self.variants
            .iter()
            .filter(|v| matches!(v, SchemaNode::Object { .. }))
    }
}

/// One compiled schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// A leaf with a declared type.
    Primitive {
        /// The declared type.
        declared_type: PrimitiveType,
        /// Extraction controls.
        options: LeafOptions,
    },
    /// An object with declared properties, in declaration order.
    /// An empty list means the node extracts nothing.
    Object {
        /// Property name and schema pairs.
        properties: Vec<(String, SchemaNode)>,
    },
    /// An array.
    Array {
        /// Element schema(s).
        items: ArrayItems,
        /// The `##parse` flag on the array itself.
        parse: bool,
    },
    /// `allOf` / `oneOf` / `anyOf`.
    Combinator(CombinatorNode),
    /// An untyped leaf restricted to listed values.
    Enum {
        /// The permitted values.
        values: Vec<Value>,
        /// Extraction controls.
        options: LeafOptions,
    },
}

impl SchemaNode {
    /// An object with no properties; extracts nothing.
    pub fn empty_object() -> Self {
        SchemaNode::Object {
            properties: Vec::new(),
        }
    }

    /// The shape this node was classified as.
    pub fn shape(&self) -> SchemaShape {
        match self {
            SchemaNode::Primitive { .. } => SchemaShape::Primitive,
            SchemaNode::Object { .. } => SchemaShape::Object,
            SchemaNode::Array { .. } => SchemaShape::Array,
            SchemaNode::Combinator(_) => SchemaShape::Combinator,
            SchemaNode::Enum { .. } => SchemaShape::Enum,
        }
    }

    /// The declared primitive type, for primitive leaves.
    pub fn declared_type(&self) -> Option<PrimitiveType> {
        match self {
            SchemaNode::Primitive { declared_type, .. } => Some(*declared_type),
            _ => None,
        }
    }
}

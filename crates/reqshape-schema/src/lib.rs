//! # reqshape-schema: Schema Model & Validation
//!
//! Compiles a schema literal once, at route registration, into two
//! read-only artifacts that are shared by every request on that route:
//!
//! - a [`CompiledSchema`], the tagged [`SchemaNode`] tree the extractor
//!   walks; and
//! - a [`RequestValidator`], the boolean JSON Schema check backed by the
//!   `jsonschema` crate.
//!
//! ## Reduced vocabulary
//!
//! Extraction understands `properties`, `items`, `type`, `format`,
//! `enum`, `default`, `allOf`/`oneOf`/`anyOf`, and two control flags
//! that are not part of JSON Schema:
//!
//! - `"##parse"` (alias `"parse"`): coerce string input to the declared
//!   numeric type, or defer a date cast for `format: date | date-time`.
//! - `"##snake"` (alias `"snake_alias"`): also expose the field under
//!   its snake_case name when only the camelCase form was supplied.
//!
//! All other keywords are ignored here and honored by the validator.
//!
//! ## Crate Policy
//!
//! - Depends on no other `reqshape-*` crate.
//! - A malformed literal is a compile-time error, never a per-request one.

pub mod compile;
pub mod error;
pub mod node;
pub mod resolver;
pub mod validator;

pub use compile::CompiledSchema;
pub use error::SchemaError;
pub use node::{
    ArrayItems, CombinatorKind, CombinatorNode, DateFormat, LeafOptions, PrimitiveType, SchemaNode,
};
pub use resolver::{resolve_shape, SchemaShape};
pub use validator::{RequestValidator, ValidationViolations, Violation};

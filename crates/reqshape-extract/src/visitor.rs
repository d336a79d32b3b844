//! # Extraction Visitor
//!
//! Recursive co-traversal of a compiled schema and the raw input. Reads
//! only from the input, writes only to the output, and records deferred
//! work in the call's [`Registries`].
//!
//! ## Per-shape behavior
//!
//! - **Combinator**: every object variant is visited at the same path
//!   and merged into the same output. When variants declare the same
//!   field, the last one visited decides its handling.
//! - **Object**: ensures a container exists at the path, then visits
//!   each declared property. Undeclared input fields are dropped.
//! - **Tuple**: copied verbatim; positional types are never coerced.
//! - **Homogeneous array**: elements are coerced when the array carries
//!   `##parse` and its item type is numeric; copied verbatim otherwise.
//! - **Primitive / enum leaf**: see [`ExtractionVisitor::visit_leaf`].

use reqshape_core::{
    coerce_numeric, copy_path, get_path, set_path, snake_case, DocPath, NumericKind,
};
use reqshape_schema::{
    ArrayItems, CombinatorNode, LeafOptions, PrimitiveType, SchemaNode,
};
use serde_json::Value;

use crate::registry::Registries;

/// Walks one schema over one input.
pub struct ExtractionVisitor<'a> {
    source: &'a Value,
    registries: &'a mut Registries,
}

impl<'a> ExtractionVisitor<'a> {
    /// A visitor reading `source` and recording into `registries`.
    pub fn new(source: &'a Value, registries: &'a mut Registries) -> Self {
        Self { source, registries }
    }

    /// Visit `node` at `path`, writing into `dest`.
    pub fn visit(&mut self, node: &SchemaNode, path: &DocPath, dest: &mut Value) {
        tracing::trace!(%path, shape = ?node.shape(), "visit");
        match node {
            SchemaNode::Combinator(combinator) => self.visit_combinator(combinator, path, dest),
            SchemaNode::Object { properties } => {
                if properties.is_empty() {
                    return;
                }
                if get_path(dest, path).map_or(true, Value::is_null) {
                    set_path(dest, path, Value::Object(serde_json::Map::new()));
                }
                for (name, child) in properties {
                    self.visit(child, &path.child(name.as_str()), dest);
                }
            }
            SchemaNode::Array { items, parse } => self.visit_array(items, *parse, path, dest),
            SchemaNode::Primitive {
                declared_type,
                options,
            } => self.visit_leaf(Some(*declared_type), options, path, dest),
            SchemaNode::Enum { options, .. } => self.visit_leaf(None, options, path, dest),
        }
    }

    /// Visit every object variant of `combinator` at `path`.
    pub fn visit_combinator(&mut self, combinator: &CombinatorNode, path: &DocPath, dest: &mut Value) {
        for variant in combinator.object_variants() {
            self.visit(variant, path, dest);
        }
    }

    fn visit_array(&mut self, items: &ArrayItems, parse: bool, path: &DocPath, dest: &mut Value) {
        let numeric = match items {
            ArrayItems::Tuple(_) => None,
            ArrayItems::Homogeneous(item) => item.declared_type().and_then(numeric_kind),
        };

        match (numeric, parse, get_path(self.source, path)) {
            (Some(kind), true, Some(Value::Array(elements))) => {
                let coerced = elements
                    .iter()
                    .map(|e| coerce_numeric(e, kind).unwrap_or_else(|| e.clone()))
                    .collect();
                set_path(dest, path, Value::Array(coerced));
            }
            _ => {
                copy_path(self.source, dest, path);
            }
        }
    }

    /// Handle a primitive or enum leaf. In order:
    ///
    /// 1. With `##snake`, register the snake_case form of the path.
    /// 2. A present value with `##parse` and a numeric type is coerced;
    ///    one with no numeric reading is copied as it is.
    /// 3. A present value with `##parse`, `type: string` and a date
    ///    format is copied and registered for the date-cast pass.
    /// 4. An absent (or `null`) value with a default gets the default.
    /// 5. Anything else is copied verbatim; absent stays absent.
    pub fn visit_leaf(
        &mut self,
        declared_type: Option<PrimitiveType>,
        options: &LeafOptions,
        path: &DocPath,
        dest: &mut Value,
    ) {
        if options.snake_alias {
            if let Some(snake_path) = path.map_last_key(snake_case) {
                self.registries.register_alias(snake_path);
            }
        }

        let origin = get_path(self.source, path).filter(|v| !v.is_null());
        let numeric = declared_type
            .and_then(numeric_kind)
            .filter(|_| options.parse);
        let date_format = options
            .date_format
            .filter(|_| options.parse && declared_type == Some(PrimitiveType::String));

        match (origin, numeric, date_format, &options.default) {
            (Some(value), Some(kind), _, _) => {
                let coerced = coerce_numeric(value, kind).unwrap_or_else(|| value.clone());
                set_path(dest, path, coerced);
            }
            (Some(_), None, Some(format), _) => {
                self.registries.register_date(path.clone(), format);
                copy_path(self.source, dest, path);
            }
            (None, _, _, Some(default)) => {
                set_path(dest, path, default.clone());
            }
            _ => {
                copy_path(self.source, dest, path);
            }
        }
    }
}

fn numeric_kind(ty: PrimitiveType) -> Option<NumericKind> {
    match ty {
        PrimitiveType::Number => Some(NumericKind::Float),
        PrimitiveType::Integer => Some(NumericKind::Integer),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqshape_schema::{CompiledSchema, DateFormat};
    use serde_json::json;

    fn run(schema: Value, input: Value) -> (Value, Registries) {
        let schema = CompiledSchema::compile(&schema).unwrap();
        let mut registries = Registries::default();
        let mut dest = Value::Null;
        ExtractionVisitor::new(&input, &mut registries).visit(
            schema.root(),
            &DocPath::root(),
            &mut dest,
        );
        (dest, registries)
    }

    #[test]
    fn test_object_drops_undeclared_fields() {
        let (out, _) = run(
            json!({"properties": {"a": {"type": "integer"}}}),
            json!({"a": 1, "b": 2}),
        );
        assert_eq!(out, json!({"a": 1}));
    }

    #[test]
    fn test_nested_object_container_created_when_input_lacks_it() {
        let (out, _) = run(
            json!({"properties": {"query": {"properties": {"q": {"type": "string"}}}}}),
            json!({}),
        );
        assert_eq!(out, json!({"query": {}}));
    }

    #[test]
    fn test_empty_object_schema_extracts_nothing() {
        let (out, _) = run(json!({"properties": {"meta": {}}}), json!({"meta": {"x": 1}}));
        assert_eq!(out, json!({}));
    }

    #[test]
    fn test_object_type_without_properties_copies_verbatim() {
        let (out, _) = run(
            json!({"properties": {"meta": {"type": "object"}}}),
            json!({"meta": {"x": 1}}),
        );
        assert_eq!(out, json!({"meta": {"x": 1}}));
    }

    #[test]
    fn test_leaf_numeric_coercion() {
        let (out, _) = run(
            json!({"properties": {
                "age": {"type": "integer", "##parse": true},
                "score": {"type": "number", "##parse": true},
                "raw": {"type": "integer"}
            }}),
            json!({"age": "42", "score": "9.5", "raw": "7"}),
        );
        assert_eq!(out, json!({"age": 42, "score": 9.5, "raw": "7"}));
    }

    #[test]
    fn test_leaf_non_numeric_passes_through() {
        let (out, _) = run(
            json!({"properties": {"age": {"type": "integer", "##parse": true}}}),
            json!({"age": "forty"}),
        );
        assert_eq!(out, json!({"age": "forty"}));
    }

    #[test]
    fn test_failed_coercion_is_not_replaced_by_default() {
        let schema = json!({"properties": {"limit": {"type": "integer", "##parse": true, "default": 20}}});
        let (once, _) = run(schema.clone(), json!({"limit": "abc"}));
        assert_eq!(once, json!({"limit": "abc"}));
        let (twice, _) = run(schema, once.clone());
        assert_eq!(twice, once);
    }

    #[test]
    fn test_default_fills_absent_and_null() {
        let schema = json!({"properties": {"n": {"type": "integer", "default": 0}}});
        assert_eq!(run(schema.clone(), json!({})).0, json!({"n": 0}));
        assert_eq!(run(schema.clone(), json!({"n": null})).0, json!({"n": 0}));
        assert_eq!(run(schema, json!({"n": 5})).0, json!({"n": 5}));
    }

    #[test]
    fn test_default_applies_to_parse_leaf_when_absent() {
        let (out, _) = run(
            json!({"properties": {"limit": {"type": "integer", "##parse": true, "default": 20}}}),
            json!({}),
        );
        assert_eq!(out, json!({"limit": 20}));
    }

    #[test]
    fn test_absent_without_default_stays_absent() {
        let (out, _) = run(
            json!({"properties": {"a": {"type": "string"}, "b": {"type": "integer", "##parse": true}}}),
            json!({}),
        );
        assert_eq!(out, json!({}));
    }

    #[test]
    fn test_date_leaf_registered_and_copied() {
        let (out, reg) = run(
            json!({"properties": {"d": {"type": "string", "format": "date", "##parse": true}}}),
            json!({"d": "2021-05-01"}),
        );
        assert_eq!(out, json!({"d": "2021-05-01"}));
        assert_eq!(reg.dates().len(), 1);
        assert_eq!(reg.dates()[0].path, DocPath::from_segments(["d"]));
        assert_eq!(reg.dates()[0].format, DateFormat::Date);
    }

    #[test]
    fn test_date_leaf_without_parse_not_registered() {
        let (_, reg) = run(
            json!({"properties": {"d": {"type": "string", "format": "date-time"}}}),
            json!({"d": "2021-05-01T00:00:00Z"}),
        );
        assert!(reg.dates().is_empty());
    }

    #[test]
    fn test_snake_alias_registered_even_when_absent() {
        let (out, reg) = run(
            json!({"properties": {"user": {"properties": {"firstName": {"type": "string", "##snake": true}}}}}),
            json!({}),
        );
        assert_eq!(out, json!({"user": {}}));
        assert!(reg
            .aliases()
            .contains(&DocPath::from_segments(["user", "first_name"])));
    }

    #[test]
    fn test_root_leaf_registers_no_alias() {
        let (out, reg) = run(json!({"type": "string", "##snake": true}), json!("x"));
        assert_eq!(out, json!("x"));
        assert!(reg.aliases().is_empty());
    }

    #[test]
    fn test_tuple_is_never_coerced() {
        let (out, _) = run(
            json!({"properties": {"t": {
                "type": "array", "##parse": true,
                "items": [{"type": "string", "##parse": true}, {"type": "number", "##parse": true}]
            }}}),
            json!({"t": ["7", "3"]}),
        );
        assert_eq!(out, json!({"t": ["7", "3"]}));
    }

    #[test]
    fn test_homogeneous_array_coercion_requires_parse_on_array() {
        let schema = |parse: bool| {
            json!({"properties": {"ids": {"type": "array", "##parse": parse, "items": {"type": "integer"}}}})
        };
        let input = json!({"ids": ["1", "2", "x"]});
        assert_eq!(run(schema(true), input.clone()).0, json!({"ids": [1, 2, "x"]}));
        assert_eq!(run(schema(false), input).0, json!({"ids": ["1", "2", "x"]}));
    }

    #[test]
    fn test_homogeneous_array_non_array_input_copied() {
        let (out, _) = run(
            json!({"properties": {"ids": {"type": "array", "##parse": true, "items": {"type": "number"}}}}),
            json!({"ids": "5"}),
        );
        assert_eq!(out, json!({"ids": "5"}));
    }

    #[test]
    fn test_nested_combinator_merges_object_variants() {
        let (out, _) = run(
            json!({"properties": {"pet": {"oneOf": [
                {"properties": {"bark": {"type": "boolean"}}},
                {"properties": {"lives": {"type": "integer", "##parse": true}}},
                {"type": "string"}
            ]}}}),
            json!({"pet": {"bark": true, "lives": "9", "other": 1}}),
        );
        assert_eq!(out, json!({"pet": {"bark": true, "lives": 9}}));
    }

    #[test]
    fn test_combinator_last_variant_wins_on_shared_field() {
        let (out, _) = run(
            json!({"anyOf": [
                {"properties": {"n": {"type": "integer", "##parse": true}}},
                {"properties": {"n": {"type": "string"}}}
            ]}),
            json!({"n": "12"}),
        );
        assert_eq!(out, json!({"n": "12"}));
    }

    #[test]
    fn test_enum_leaf_copied_and_defaulted() {
        let schema = json!({"properties": {"order": {"enum": ["asc", "desc"], "default": "asc"}}});
        assert_eq!(run(schema.clone(), json!({"order": "desc"})).0, json!({"order": "desc"}));
        assert_eq!(run(schema, json!({})).0, json!({"order": "asc"}));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = json!({"a": "1", "b": 2});
        let before = input.clone();
        let _ = run(
            json!({"properties": {"a": {"type": "integer", "##parse": true}}}),
            input.clone(),
        );
        assert_eq!(input, before);
    }
}

//! # Request Validation
//!
//! The boolean schema check that runs between the main extraction pass
//! and the post-passes. It sees the extracted-but-not-yet-date-cast
//! document, so `format: date` fields are still strings and coerced
//! numbers are already numbers.
//!
//! ## Client-fault errors
//!
//! A failed validation is the client's fault. Violations carry the
//! instance path, the schema path, and a message so the caller can
//! answer with a structured 400 instead of logging a system fault.
//!
//! ## Draft
//!
//! Schemas are compiled as Draft 7. The extraction control flags
//! (`##parse`, `##snake`) are unknown keywords to the validator and are
//! ignored by it.

use std::fmt;

use jsonschema::Validator;
use serde::Serialize;
use serde_json::Value;

use crate::error::SchemaError;

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A compiled validator for one route's schema.
///
/// `RequestValidator` is `Send + Sync`; build it once at registration
/// and share it across requests.
pub struct RequestValidator {
    validator: Validator,
}

impl fmt::Debug for RequestValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestValidator").finish_non_exhaustive()
    }
}

impl RequestValidator {
    /// Compile `literal` into a validator.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ValidatorBuild`] if the literal is not a
    /// valid JSON Schema.
    pub fn compile(literal: &Value) -> Result<Self, SchemaError> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft7);
        opts.should_validate_formats(true);
        let validator = opts.build(literal).map_err(|e| SchemaError::ValidatorBuild {
            reason: e.to_string(),
        })?;
        Ok(Self { validator })
    }

    /// Validate `instance`, collecting every violation.
    ///
    /// # Errors
    ///
    /// Returns the full [`ValidationViolations`] list if the instance
    /// does not conform.
    pub fn validate(&self, instance: &Value) -> Result<(), ValidationViolations> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(count = violations.len(), "request failed validation");
            Err(ValidationViolations { violations })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn age_validator() -> RequestValidator {
        RequestValidator::compile(&json!({
            "type": "object",
            "required": ["age"],
            "properties": {
                "age": {"type": "integer", "##parse": true, "minimum": 0}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_instance_passes() {
        let v = age_validator();
        v.validate(&json!({"age": 42})).unwrap();
    }

    #[test]
    fn test_control_flags_are_ignored_by_validator() {
        // "##parse" must not make the schema itself invalid.
        let v = age_validator();
        assert!(v.validate(&json!({"age": 0})).is_ok());
    }

    #[test]
    fn test_uncoerced_string_is_rejected() {
        let v = age_validator();
        let err = v.validate(&json!({"age": "42"})).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.violations()[0].instance_path, "/age");
    }

    #[test]
    fn test_null_rejected_for_integer() {
        let v = age_validator();
        assert!(v.validate(&json!({"age": null})).is_err());
    }

    #[test]
    fn test_nullable_integer_rejects_string() {
        let v = RequestValidator::compile(&json!({
            "properties": {"age": {"type": ["integer", "null"], "##parse": true}}
        }))
        .unwrap();
        assert!(v.validate(&json!({"age": null})).is_ok());
        let err = v.validate(&json!({"age": "abc"})).unwrap_err();
        assert_eq!(err.violations()[0].instance_path, "/age");
    }

    #[test]
    fn test_missing_required_reported_at_root() {
        let v = age_validator();
        let err = v.validate(&json!({})).unwrap_err();
        let messages: Vec<&str> = err.violations().iter().map(|v| v.message.as_str()).collect();
        assert!(
            messages.iter().any(|m| m.contains("age")),
            "Expected violation mentioning 'age', got: {messages:?}"
        );
        assert!(err.to_string().contains("(root)"));
    }

    #[test]
    fn test_invalid_schema_fails_to_build() {
        let err = RequestValidator::compile(&json!({"type": 12})).unwrap_err();
        assert!(matches!(err, SchemaError::ValidatorBuild { .. }));
    }

    #[test]
    fn test_date_format_is_asserted() {
        let v = RequestValidator::compile(&json!({
            "properties": {"since": {"type": "string", "format": "date"}}
        }))
        .unwrap();
        v.validate(&json!({"since": "2024-01-02"})).unwrap();
        let err = v.validate(&json!({"since": "yesterday"})).unwrap_err();
        assert_eq!(err.violations()[0].instance_path, "/since");
    }

    #[test]
    fn test_violation_display_format() {
        let v = Violation {
            instance_path: "/query/limit".to_string(),
            schema_path: "/properties/query/properties/limit/type".to_string(),
            message: r#"null is not of type "integer""#.to_string(),
        };
        let display = v.to_string();
        assert!(display.contains("/query/limit"));
        assert!(display.contains("is not of type"));
    }

    #[test]
    fn test_violations_serialize_as_list() {
        let v = age_validator();
        let err = v.validate(&json!({"age": "x"})).unwrap_err();
        let out = serde_json::to_value(&err).unwrap();
        assert!(out.is_array());
        assert_eq!(out[0]["instance_path"], "/age");
    }
}

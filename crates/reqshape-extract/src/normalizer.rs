//! # Request Normalizer
//!
//! The per-route pipeline. Built once when a route is registered, then
//! shared by every request to that route:
//!
//! 1. extract the declared fields, coercing numbers and filling defaults;
//! 2. validate the extracted JSON against the route schema;
//! 3. cast flagged date strings, then backfill snake_case names.
//!
//! Extraction runs before validation so that `"42"` sent for an integer
//! field reaches the validator as `42`. Date casting runs after it, since
//! the validator only understands JSON and checks `format: date` on
//! strings.

use std::sync::Arc;

use reqshape_core::Shaped;
use reqshape_schema::{CompiledSchema, RequestValidator};
use serde_json::Value;

use crate::config::NormalizerConfig;
use crate::error::NormalizeError;
use crate::request::RequestParts;
use crate::session::Extractor;

/// Compiled extraction and validation for one route schema.
#[derive(Debug, Clone)]
pub struct RequestNormalizer {
    extractor: Extractor,
    validator: Option<Arc<RequestValidator>>,
    config: NormalizerConfig,
}

impl RequestNormalizer {
    /// Compile `schema` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Schema`] if the literal violates the
    /// schema vocabulary or cannot be compiled into a validator.
    pub fn compile(schema: &Value) -> Result<Self, NormalizeError> {
        Self::with_config(schema, NormalizerConfig::default())
    }

    /// Compile `schema` with an explicit configuration. When validation is
    /// disabled no validator is built.
    ///
    /// # Errors
    ///
    /// See [`compile`](Self::compile).
    pub fn with_config(schema: &Value, config: NormalizerConfig) -> Result<Self, NormalizeError> {
        let compiled = CompiledSchema::compile(schema)?;
        let validator = if config.validate {
            Some(Arc::new(RequestValidator::compile(schema)?))
        } else {
            None
        };
        tracing::info!(
            root_shape = ?compiled.root().shape(),
            root_properties = compiled.root_property_count(),
            validate = config.validate,
            "compiled route schema"
        );
        Ok(Self {
            extractor: Extractor::new(compiled),
            validator,
            config,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// The extraction handle, for callers that want the stages separately.
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Run the full pipeline over a raw request document.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::BadRequest`] if the extracted document
    /// fails validation. No other per-request failure exists.
    pub fn normalize(&self, input: &Value) -> Result<Shaped, NormalizeError> {
        let stage = self.extractor.extract_stage(input);

        if let Some(validator) = &self.validator {
            if let Err(violations) = validator.validate(stage.document()) {
                tracing::debug!(violations = violations.len(), "request rejected by schema");
                return Err(violations.into());
            }
        }

        Ok(stage.finish_with(&self.config))
    }

    /// Assemble the request document from its parts, then normalize it.
    ///
    /// # Errors
    ///
    /// See [`normalize`](Self::normalize).
    pub fn normalize_request(&self, parts: &RequestParts) -> Result<Shaped, NormalizeError> {
        self.normalize(&parts.to_document())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_route() -> Value {
        json!({
            "type": "object",
            "properties": {
                "age": {"type": "integer", "##parse": true, "minimum": 0},
                "born": {"type": "string", "format": "date", "##parse": true}
            },
            "required": ["age"]
        })
    }

    #[test]
    fn test_coerced_value_passes_validation() {
        let normalizer = RequestNormalizer::compile(&user_route()).unwrap();
        let out = normalizer
            .normalize(&json!({"age": "30", "born": "1990-01-02"}))
            .unwrap();
        assert_eq!(out.get("age"), Some(&Shaped::from(json!(30))));
        assert!(out.get("born").and_then(Shaped::as_date).is_some());
    }

    #[test]
    fn test_missing_required_is_bad_request() {
        let normalizer = RequestNormalizer::compile(&user_route()).unwrap();
        let err = normalizer.normalize(&json!({"born": "1990-01-02"})).unwrap_err();
        assert!(err.is_client_fault());
        assert_eq!(err.status_code(), 400);
        assert!(!err.violations().unwrap().is_empty());
    }

    #[test]
    fn test_unparsable_number_is_bad_request() {
        let normalizer = RequestNormalizer::compile(&user_route()).unwrap();
        let err = normalizer.normalize(&json!({"age": "abc"})).unwrap_err();
        assert!(err.is_client_fault());
    }

    #[test]
    fn test_validation_disabled() {
        let config = NormalizerConfig::default().without_validation();
        let normalizer = RequestNormalizer::with_config(&user_route(), config).unwrap();
        let out = normalizer.normalize(&json!({"age": "abc"})).unwrap();
        assert_eq!(out, json!({"age": "abc"}));
    }

    #[test]
    fn test_malformed_schema_is_not_client_fault() {
        let err = RequestNormalizer::compile(&json!({"properties": []})).unwrap_err();
        assert!(!err.is_client_fault());
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_normalize_request_parts() {
        let normalizer = RequestNormalizer::compile(&json!({
            "type": "object",
            "properties": {
                "params": {"type": "object", "properties": {"id": {"type": "integer", "##parse": true}}},
                "query": {"type": "object", "properties": {"page": {"type": "integer", "##parse": true, "default": 1}}}
            }
        }))
        .unwrap();
        let parts = RequestParts::new()
            .with_param("id", "42")
            .with_header("Authorization", "secret");
        let out = normalizer.normalize_request(&parts).unwrap();
        assert_eq!(out, json!({"params": {"id": 42}, "query": {"page": 1}}));
    }
}

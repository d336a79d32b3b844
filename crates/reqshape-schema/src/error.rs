//! # Schema Errors
//!
//! Failures that can only happen while compiling a schema literal.
//! They surface once, when a route is registered.

use thiserror::Error;

/// Error compiling a schema literal.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The literal violates the reduced vocabulary contract.
    #[error("malformed schema at '{pointer}': {reason}")]
    Malformed {
        /// JSON Pointer to the offending node within the literal.
        pointer: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The validator could not be built from the literal.
    #[error("validator build error: {reason}")]
    ValidatorBuild {
        /// Reason reported by the validator backend.
        reason: String,
    },
}

impl SchemaError {
    pub(crate) fn malformed(pointer: &str, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            pointer: if pointer.is_empty() { "/".to_string() } else { pointer.to_string() },
            reason: reason.into(),
        }
    }
}

//! # Normalization Errors
//!
//! Two failure classes, kept apart so callers can route them:
//!
//! - [`NormalizeError::BadRequest`]: the request data does not satisfy
//!   the route schema. Client fault; answer with 400.
//! - [`NormalizeError::Schema`]: the route schema itself is broken.
//!   Raised while compiling, never while serving a request.

use reqshape_schema::{SchemaError, ValidationViolations};
use thiserror::Error;

/// Failure of a [`RequestNormalizer`](crate::RequestNormalizer).
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// The extracted document failed schema validation.
    #[error("bad request: {} schema violation(s)\n{violations}", .violations.len())]
    BadRequest {
        /// Every violation found.
        violations: ValidationViolations,
    },

    /// The route schema could not be compiled.
    #[error("invalid route schema: {0}")]
    Schema(#[from] SchemaError),
}

impl NormalizeError {
    /// True if the request, not the server, is at fault.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::BadRequest { .. })
    }

    /// The HTTP status this error maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest { .. } => 400,
            Self::Schema(_) => 500,
        }
    }

    /// The violations behind a bad request, if that is what this is.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            Self::BadRequest { violations } => Some(violations),
            Self::Schema(_) => None,
        }
    }
}

impl From<ValidationViolations> for NormalizeError {
    fn from(violations: ValidationViolations) -> Self {
        Self::BadRequest { violations }
    }
}

//! # Error Types
//!
//! Errors raised by the core primitives. Data-shape problems in request
//! payloads are never errors at this layer; only malformed addressing
//! input supplied by a programmer is.

use thiserror::Error;

/// Top-level error type for `reqshape-core`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A textual path could not be parsed into a [`crate::DocPath`].
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath {
        /// The rejected input.
        path: String,
        /// Why it was rejected.
        reason: String,
    },
}

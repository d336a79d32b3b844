//! # reqshape-core: Foundational Types for Request Normalization
//!
//! This crate holds the primitives every other reqshape crate builds on.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Typed document paths.** A [`DocPath`] is a sequence of
//!    [`Segment`]s over the real document. There is no string-joined
//!    dotted addressing, so a payload key that itself contains a `.`
//!    can never collide with a nested path, and no synthetic root key
//!    is needed to make every path resolvable.
//!
//! 2. **One addressing implementation for two value types.** The
//!    [`Document`] trait gives `serde_json::Value` (the intermediate form
//!    handed to the validator) and [`Shaped`] (the final form carrying
//!    native dates) the same get/set/copy primitives.
//!
//! 3. **Coercion never fails.** [`coerce_numeric`] reports a
//!    non-numeric input as `None` instead of an error; the caller keeps
//!    the original value and the validator rejects it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `reqshape-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod case;
pub mod coerce;
pub mod error;
pub mod path;
pub mod shaped;

// Re-export primary types for ergonomic imports.
pub use case::{camel_case, snake_case};
pub use coerce::{coerce_numeric, NumericKind};
pub use error::CoreError;
pub use path::{copy_path, get_path, set_path, DocPath, Document, Segment};
pub use shaped::Shaped;

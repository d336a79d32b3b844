//! # reqshape-extract: Request Extraction
//!
//! Produces a schema-shaped document from raw request data. One call
//! runs in three stages:
//!
//! 1. **Main pass** ([`visitor`]): walk the compiled schema alongside
//!    the input, building a new document that contains only declared
//!    fields. Numeric strings are coerced, defaults are filled, and two
//!    kinds of follow-up work are recorded in per-call [`Registries`].
//! 2. **Validation** ([`RequestNormalizer`] only): the intermediate JSON
//!    is checked against the route's schema.
//! 3. **Post-passes**: [`DateCastPostProcessor`] turns flagged date
//!    strings into native dates, then [`CaseReconciler`] backfills
//!    snake_case names from their camelCase siblings.
//!
//! ## Concurrency
//!
//! A [`CompiledSchema`](reqshape_schema::CompiledSchema) is read-only
//! and shared. All mutable state of a call (the output document and the
//! registries) is created inside that call and threaded through it, so
//! concurrent extractions against the same schema never interfere.
//!
//! ## Soft failure
//!
//! Nothing here fails because of the data. Unparsable numbers and
//! unparsable dates are passed through as they arrived; rejecting them
//! is the validator's job.

pub mod case_reconcile;
pub mod config;
pub mod date_cast;
pub mod error;
pub mod normalizer;
pub mod registry;
pub mod request;
pub mod session;
pub mod visitor;

pub use case_reconcile::CaseReconciler;
pub use config::NormalizerConfig;
pub use date_cast::DateCastPostProcessor;
pub use error::NormalizeError;
pub use normalizer::RequestNormalizer;
pub use registry::{DateCast, Registries};
pub use request::RequestParts;
pub use session::{Extraction, ExtractionSession, Extractor};
pub use visitor::ExtractionVisitor;

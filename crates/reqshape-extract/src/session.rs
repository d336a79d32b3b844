//! # Extraction Sessions
//!
//! [`Extractor`] is the per-route handle: it owns the compiled schema
//! and can be cloned into any number of request handlers. Each call
//! opens an [`ExtractionSession`], which owns that call's registries
//! and output, and hands back an [`Extraction`].
//!
//! An [`Extraction`] is the intermediate stage: the JSON produced by the
//! main pass, before date casting and case backfill. The validator runs
//! against it; [`Extraction::finish`] applies the post-passes.

use std::sync::Arc;

use reqshape_core::{DocPath, Shaped};
use reqshape_schema::CompiledSchema;
use serde_json::Value;

use crate::case_reconcile::CaseReconciler;
use crate::config::NormalizerConfig;
use crate::date_cast::DateCastPostProcessor;
use crate::registry::Registries;
use crate::visitor::ExtractionVisitor;

/// The result of the main pass, awaiting post-processing.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    document: Value,
    registries: Registries,
}

impl Extraction {
    /// The extracted JSON, as the validator sees it.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Work recorded for the post-passes.
    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    /// Run date casting, then case backfill.
    pub fn finish(self) -> Shaped {
        self.finish_with(&NormalizerConfig::default())
    }

    /// Run the post-passes enabled in `config`, in order.
    pub fn finish_with(self, config: &NormalizerConfig) -> Shaped {
        let casts: &[_] = if config.cast_dates { self.registries.dates() } else { &[] };
        let shaped = DateCastPostProcessor::cast(self.document, casts);
        if config.backfill_snake_case {
            CaseReconciler::reconcile(shaped, self.registries.aliases())
        } else {
            shaped
        }
    }
}

/// State of a single extraction call.
pub struct ExtractionSession<'s> {
    schema: &'s CompiledSchema,
    registries: Registries,
    output: Value,
}

impl<'s> ExtractionSession<'s> {
    /// Open a session with empty registries and no output yet.
    pub fn new(schema: &'s CompiledSchema) -> Self {
        Self {
            schema,
            registries: Registries::default(),
            output: Value::Null,
        }
    }

    /// Run the main pass over `input` and close the session.
    ///
    /// The whole schema is visited at the root. If the root literal also
    /// carries `oneOf` / `anyOf` / `allOf`, each is visited again at the
    /// root, so a top-level combinator contributes its fields even when
    /// the root is an object with its own `properties`.
    pub fn run(mut self, input: &Value) -> Extraction {
        let root = DocPath::root();
        {
            let mut visitor = ExtractionVisitor::new(input, &mut self.registries);
            visitor.visit(self.schema.root(), &root, &mut self.output);
            for combinator in self.schema.root_combinators() {
                visitor.visit_combinator(combinator, &root, &mut self.output);
            }
        }

        tracing::debug!(
            date_casts = self.registries.dates().len(),
            case_aliases = self.registries.aliases().len(),
            "extraction main pass complete"
        );

        Extraction {
            document: self.output,
            registries: self.registries,
        }
    }
}

/// Reusable, thread-safe extraction handle for one schema.
#[derive(Debug, Clone)]
pub struct Extractor {
    schema: Arc<CompiledSchema>,
}

impl Extractor {
    /// Wrap a compiled schema.
    pub fn new(schema: CompiledSchema) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }

    /// The schema this extractor applies.
    pub fn schema(&self) -> &CompiledSchema {
        &self.schema
    }

    /// Main pass only.
    pub fn extract_stage(&self, input: &Value) -> Extraction {
        ExtractionSession::new(&self.schema).run(input)
    }

    /// Full extraction: main pass, date casting, case backfill.
    pub fn extract(&self, input: &Value) -> Shaped {
        self.extract_stage(input).finish()
    }
}

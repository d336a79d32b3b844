//! # Case Reconciliation Post-Pass
//!
//! For each registered snake_case path, copies the value of its
//! camelCase sibling when the snake_case slot is empty.
//!
//! The direction is fixed: camelCase to snake_case only. An existing
//! snake_case value (including `null`) is never overwritten, and a
//! snake_case-only payload is never mirrored into camelCase.

use std::collections::BTreeSet;

use reqshape_core::{camel_case, get_path, set_path, DocPath, Shaped};

/// The case-backfill pass.
pub struct CaseReconciler;

impl CaseReconciler {
    /// Backfill every path in `aliases` within `document`.
    pub fn reconcile(mut document: Shaped, aliases: &BTreeSet<DocPath>) -> Shaped {
        for snake_path in aliases {
            let Some(camel_path) = snake_path.map_last_key(camel_case) else {
                continue;
            };
            if get_path(&document, snake_path).is_some() {
                continue;
            }
            if let Some(value) = get_path(&document, &camel_path).cloned() {
                tracing::trace!(from = %camel_path, to = %snake_path, "backfilled snake_case field");
                set_path(&mut document, snake_path, value);
            }
        }
        document
    }
}

//! Deferred-work registries for one extraction call.

use std::collections::BTreeSet;

use reqshape_core::DocPath;
use reqshape_schema::DateFormat;

/// A field whose string value should become a native date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateCast {
    /// Where the value lives in the output document.
    pub path: DocPath,
    /// Which grammar to parse it with.
    pub format: DateFormat,
}

/// Follow-up work recorded during the main pass.
///
/// Created empty at the start of every call and consumed at its end;
/// never stored on anything that outlives the call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registries {
    dates: Vec<DateCast>,
    aliases: BTreeSet<DocPath>,
}

impl Registries {
    /// Record a deferred date cast. Repeat registrations of the same
    /// path and format are collapsed.
    pub fn register_date(&mut self, path: DocPath, format: DateFormat) {
        let cast = DateCast { path, format };
        if !self.dates.contains(&cast) {
            self.dates.push(cast);
        }
    }

    /// Record a snake_case path to backfill from its camelCase sibling.
    pub fn register_alias(&mut self, snake_path: DocPath) {
        self.aliases.insert(snake_path);
    }

    /// Pending date casts, in registration order.
    pub fn dates(&self) -> &[DateCast] {
        &self.dates
    }

    /// Pending snake_case backfills.
    pub fn aliases(&self) -> &BTreeSet<DocPath> {
        &self.aliases
    }

    /// True if no follow-up work was recorded.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() && self.aliases.is_empty()
    }
}

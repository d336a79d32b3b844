//! Normalizer configuration.
//!
//! Every stage after the main pass can be switched off. Defaults enable
//! everything. Override via environment variables or explicit
//! construction.

use serde::{Deserialize, Serialize};

/// Which stages a [`RequestNormalizer`](crate::RequestNormalizer) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Check the intermediate document against the route schema.
    pub validate: bool,
    /// Convert flagged date strings into native dates.
    pub cast_dates: bool,
    /// Fill snake_case names from their camelCase siblings.
    pub backfill_snake_case: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            validate: true,
            cast_dates: true,
            backfill_snake_case: true,
        }
    }
}

impl NormalizerConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables (each defaults to enabled; `0`, `false`, `no` or `off`
    /// disables, case-insensitively):
    /// - `REQSHAPE_VALIDATE`
    /// - `REQSHAPE_CAST_DATES`
    /// - `REQSHAPE_SNAKE_BACKFILL`
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a caller-supplied lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            validate: env_flag(&lookup, "REQSHAPE_VALIDATE", defaults.validate),
            cast_dates: env_flag(&lookup, "REQSHAPE_CAST_DATES", defaults.cast_dates),
            backfill_snake_case: env_flag(
                &lookup,
                "REQSHAPE_SNAKE_BACKFILL",
                defaults.backfill_snake_case,
            ),
        }
    }

    /// Disable validation, keeping the other stages as they are.
    pub fn without_validation(self) -> Self {
        Self {
            validate: false,
            ..self
        }
    }
}

fn env_flag(lookup: &impl Fn(&str) -> Option<String>, var: &str, default: bool) -> bool {
    match lookup(var) {
        Some(raw) => {
            let raw = raw.trim().to_ascii_lowercase();
            !matches!(raw.as_str(), "0" | "false" | "no" | "off")
        }
        None => default,
    }
}

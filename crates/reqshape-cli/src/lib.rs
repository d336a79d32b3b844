//! # reqshape-cli: Request Normalization from the Command Line
//!
//! Runs the same pipeline a route handler runs, over JSON files, so a
//! schema can be tried out or checked in CI before it is deployed.
//!
//! ## Subcommands
//!
//! - `extract`: normalize a request document against a schema
//! - `check`: compile a schema and report its root shape
//!
//! ## Crate Policy
//!
//! - Dispatch lives in `main.rs`; handlers return an exit code.
//! - Exit codes: 0 success, 1 validation failure, 2 operational error.
//! - Handlers write their report to a caller-supplied writer.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

pub mod check;
pub mod extract;

/// Read and parse a JSON file.
pub fn read_json_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse JSON in {}", path.display()))
}

/// Read JSON from `path`, or from stdin when no path is given.
pub fn read_json_input(path: Option<&Path>) -> Result<Value> {
    match path {
        Some(path) => read_json_file(path),
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
            serde_json::from_str(&content).context("failed to parse JSON from stdin")
        }
    }
}

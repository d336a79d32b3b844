//! # Extract Subcommand
//!
//! Normalizes one request document against a route schema and prints
//! the result, exactly as a route handler would see it.
//!
//! Stages follow [`NormalizerConfig::from_env`]; `--no-validate` turns
//! validation off regardless of the environment.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use reqshape_core::{get_path, DocPath};
use reqshape_extract::{NormalizeError, NormalizerConfig, RequestNormalizer};

/// Arguments for the `reqshape extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Route schema (JSON).
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Request document (JSON). Read from stdin when omitted.
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Skip schema validation of the extracted document.
    #[arg(long)]
    pub no_validate: bool,

    /// Pretty-print the output.
    #[arg(long)]
    pub pretty: bool,

    /// Print only the value at this path (e.g. `query.ids[0]`).
    #[arg(long, value_name = "PATH")]
    pub pick: Option<String>,
}

/// Execute the extract subcommand.
///
/// Returns exit code: 0 on success, 1 if the document fails validation.
pub fn run_extract(args: &ExtractArgs, out: &mut impl Write) -> Result<u8> {
    let pick = args
        .pick
        .as_deref()
        .map(DocPath::parse)
        .transpose()
        .context("invalid --pick path")?;

    let mut config = NormalizerConfig::from_env();
    if args.no_validate {
        config = config.without_validation();
    }

    let schema = crate::read_json_file(&args.schema)?;
    let normalizer = RequestNormalizer::with_config(&schema, config)
        .with_context(|| format!("failed to compile {}", args.schema.display()))?;
    let input = crate::read_json_input(args.input.as_deref())?;

    let shaped = match normalizer.normalize(&input) {
        Ok(shaped) => shaped,
        Err(NormalizeError::BadRequest { violations }) => {
            writeln!(out, "FAIL: {} schema violation(s)", violations.len())?;
            for violation in violations.violations() {
                writeln!(out, "{violation}")?;
            }
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };

    let selected = match &pick {
        Some(path) => get_path(&shaped, path)
            .with_context(|| format!("path '{path}' is not present in the output"))?,
        None => &shaped,
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(selected)
    } else {
        serde_json::to_string(selected)
    }
    .context("failed to serialize output")?;
    writeln!(out, "{rendered}")?;

    tracing::info!(schema = %args.schema.display(), "extraction complete");
    Ok(0)
}

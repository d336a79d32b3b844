//! # Check Subcommand
//!
//! Compiles a route schema the way route registration does: once for
//! extraction and once for validation. A schema that passes here will
//! not fail at startup.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use reqshape_schema::{CompiledSchema, RequestValidator, SchemaError, SchemaShape};

/// Arguments for the `reqshape check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Route schema (JSON) to check.
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Print the report as a JSON object instead of a status line.
    #[arg(long)]
    pub json: bool,
}

/// What a compiled schema looks like from the root.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub schema: String,
    pub root_shape: SchemaShape,
    pub root_properties: usize,
    pub root_combinators: usize,
}

impl CheckReport {
    fn new(args: &CheckArgs, compiled: &CompiledSchema) -> Self {
        Self {
            schema: args.schema.display().to_string(),
            root_shape: compiled.root().shape(),
            root_properties: compiled.root_property_count(),
            root_combinators: compiled.root_combinators().len(),
        }
    }
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 if the schema compiles, 1 if it does not.
pub fn run_check(args: &CheckArgs, out: &mut impl Write) -> Result<u8> {
    let literal = crate::read_json_file(&args.schema)?;

    match compile_both(&literal) {
        Ok(compiled) => {
            let report = CheckReport::new(args, &compiled);
            if args.json {
                writeln!(out, "{}", serde_json::to_string(&report)?)?;
            } else {
                writeln!(
                    out,
                    "OK: {} (root {}, {} properties, {} root combinators)",
                    report.schema,
                    report.root_shape.as_str(),
                    report.root_properties,
                    report.root_combinators,
                )?;
            }
            Ok(0)
        }
        Err(e) => {
            writeln!(out, "FAIL: {}: {e}", args.schema.display())?;
            Ok(1)
        }
    }
}

fn compile_both(literal: &serde_json::Value) -> Result<CompiledSchema, SchemaError> {
    let compiled = CompiledSchema::compile(literal)?;
    RequestValidator::compile(literal)?;
    Ok(compiled)
}

/*
 * check.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Check command implementation
 */

//! Parse a document generically and verify that it renders back unchanged.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use texstep_document::SectionRegistry;

/// Arguments for the check command
#[derive(Debug)]
pub struct CheckArgs {
    pub input: PathBuf,
    pub side_file: Option<PathBuf>,
}

/// Execute the check command
pub fn execute(args: CheckArgs) -> Result<()> {
    let (text, document) = super::load(&args.input, &SectionRegistry::generic())?;

    let side_file = args
        .side_file
        .unwrap_or_else(|| args.input.with_extension("wrong"));
    document
        .verify_round_trip(&text, &side_file)
        .with_context(|| format!("{} does not round-trip", args.input.display()))?;

    info!(
        slides = document.slides().len(),
        steps = document.step_count(),
        "Round trip verified"
    );
    println!(
        "{}: {} slides, round trip OK",
        args.input.display(),
        document.slides().len()
    );
    Ok(())
}

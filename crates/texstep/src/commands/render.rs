/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render command implementation
 */

//! Render command implementation.
//!
//! Parses the input, verifies the round trip, then writes the steps picked
//! by `--slide`/`--start`/`--stop` to the output file. Typesetting the
//! output is left to the caller.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use texstep_document::{SectionRegistry, Selection};

/// Arguments for the render command
#[derive(Debug)]
pub struct RenderArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub slide: Option<String>,
    pub start: Option<i64>,
    pub stop: Option<i64>,
}

/// Execute the render command
pub fn execute(args: RenderArgs) -> Result<()> {
    let selection = Selection::from_args(args.slide.as_deref(), args.start, args.stop)
        .context("Invalid step selection")?;
    debug!(?selection, "Parsed selection");

    let (text, mut document) = super::load(&args.input, &SectionRegistry::generic())?;
    document
        .verify_round_trip(&text, &args.input.with_extension("wrong"))
        .with_context(|| format!("{} does not round-trip", args.input.display()))?;

    document.animate().context("Animation failed")?;
    let (restricted, summary) = document
        .select(&selection)
        .context("Failed to select steps")?;

    std::fs::write(&args.output, restricted.render())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(output = %args.output.display(), steps = summary.len(), "Rendered");

    println!("{summary}");
    Ok(())
}

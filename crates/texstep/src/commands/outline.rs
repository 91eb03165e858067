/*
 * outline.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Print the slides of a document.

use std::path::PathBuf;

use anyhow::{Context, Result};

use texstep_document::{SectionKind, SectionRegistry, standard_header};

#[derive(Debug)]
pub struct OutlineArgs {
    pub input: PathBuf,
    pub standard_header: bool,
}

pub fn execute(args: OutlineArgs) -> Result<()> {
    let registry = if args.standard_header {
        let header = standard_header().context("Failed to compile the standard header")?;
        SectionRegistry::new().with_fallback(SectionKind::constant().with_header(header))
    } else {
        SectionRegistry::generic()
    };
    let (_, document) = super::load(&args.input, &registry)?;

    for (i, slide) in document.slides().iter().enumerate() {
        println!("{}. {} ({} steps)", i + 1, slide.name(), slide.steps().len());
        for line in slide.header().outline().lines() {
            println!("   {line}");
        }
    }
    Ok(())
}

//! Command implementations for the texstep CLI
//!
//! Each command module handles the CLI interface and delegates to
//! texstep-document for the actual work.

use std::path::Path;

use anyhow::{Context, Result};
use texstep_document::{Document, SectionRegistry};

pub mod check;
pub mod outline;
pub mod render;
pub mod signature;

/// Read `input` and parse it with `registry`.
fn load(input: &Path, registry: &SectionRegistry) -> Result<(String, Document)> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let document = Document::parse(&text, registry)
        .with_context(|| format!("Failed to parse {}", input.display()))?;
    Ok((text, document))
}

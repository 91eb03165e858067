/*
 * signature.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Print the placeholder template derived from an annotated command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use texstep_document::CommandSignature;

#[derive(Debug)]
pub struct SignatureArgs {
    pub name: String,
    pub dir: PathBuf,
}

pub fn execute(args: SignatureArgs) -> Result<()> {
    let name = args.name.trim_start_matches('\\');
    let signature = CommandSignature::discover_in_dir(name, &args.dir)
        .with_context(|| format!("No signature for \\{name} under {}", args.dir.display()))?;
    // Make sure the template compiles before printing it.
    let builder = signature.builder()?;

    println!("{}", signature.template());
    for placeholder in builder.spec().names() {
        match signature.options().iter().find(|(option, _)| option == placeholder) {
            Some((_, default)) => println!("  {placeholder} = {default}"),
            None => println!("  {placeholder}"),
        }
    }
    Ok(())
}

/*
 * signature.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Deriving patterns from annotated command definitions.
//!
//! A definition is annotated by a comment naming its arguments:
//!
//! ```text
//! % [color][anchor]{hash}{name}
//! \NewDocumentCommand{\Branch}{O{Blue4} O{base} m m}{...}
//! ```
//!
//! which yields the template `\Branch[<color>][<anchor>]{<hash>}{<name>}`,
//! with `color` and `anchor` defaulting to `Blue4` and `base`. Commands
//! defined with `\newcommand{\Name}[n]` take positional arguments only.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use texstep_core::{PatternBuilder, PatternOptions};
use walkdir::WalkDir;

use crate::error::{DocumentError, Result};

static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]").unwrap());
static BRACED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^}]*)\}").unwrap());
static OPTIONAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"O\{([^}]*)\}").unwrap());

/// Argument names and defaults of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSignature {
    name: String,
    /// Optional arguments with their defaults, in order.
    options: Vec<(String, String)>,
    positionals: Vec<String>,
}

impl CommandSignature {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// Placeholder template matching a call of the command.
    pub fn template(&self) -> String {
        let mut template = format!("\\{}", self.name);
        for (option, _) in &self.options {
            template.push_str(&format!("[<{option}>]"));
        }
        for positional in &self.positionals {
            template.push_str(&format!("{{<{positional}>}}"));
        }
        template
    }

    /// Compile the template, optional arguments carrying their defaults.
    pub fn builder(&self) -> Result<PatternBuilder> {
        let options = self
            .options
            .iter()
            .fold(PatternOptions::new(), |options, (name, default)| {
                options.default_value(name.as_str(), default.as_str())
            })
            .positionals(self.positionals.iter().map(String::as_str));
        Ok(PatternBuilder::compile_with(&self.template(), options)?)
    }

    /// Look for the annotated definition of `name` in one source text.
    ///
    /// Returns `Ok(None)` when the source does not define it.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::SignatureMismatch`] when the annotation and
    /// the declared arguments disagree.
    pub fn find_in_source(name: &str, source: &str) -> Result<Option<Self>> {
        let command = regex::escape(name);

        let document_command = Regex::new(&format!(
            r"%[ \t]*((?:\[[^\]\n]*\][ \t]*)*)((?:\{{[^}}\n]*\}}[ \t]*)*)\s*\\NewDocumentCommand\{{\\{command}\}}\s*\{{\s*((?:O\{{[^}}]*\}}\s*)*)((?:m\s*)*)\}}"
        ))
        .map_err(|e| mismatch(name, format!("invalid command name: {e}")))?;
        if let Some(found) = document_command.captures(source) {
            let group = |i| found.get(i).map_or("", |m| m.as_str());
            let declared = group(4).matches('m').count();
            let defaults = captured(&OPTIONAL, group(3));
            return Self::assemble(name, group(1), group(2), declared, defaults).map(Some);
        }

        let new_command = Regex::new(&format!(
            r"%[ \t]*((?:\{{[^}}\n]*\}}[ \t]*)*)\s*\\newcommand\{{\\{command}\}}\[(\d+)\]"
        ))
        .map_err(|e| mismatch(name, format!("invalid command name: {e}")))?;
        if let Some(found) = new_command.captures(source) {
            let group = |i| found.get(i).map_or("", |m| m.as_str());
            let declared = group(2)
                .parse::<usize>()
                .map_err(|e| mismatch(name, format!("argument count: {e}")))?;
            return Self::assemble(name, "", group(1), declared, Vec::new()).map(Some);
        }

        Ok(None)
    }

    /// Find `name` in the first source that defines it.
    pub fn discover<'a>(name: &str, sources: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        for source in sources {
            if let Some(signature) = Self::find_in_source(name, source)? {
                return Ok(signature);
            }
        }
        Err(DocumentError::SignatureNotFound {
            name: name.to_string(),
        })
    }

    /// Find `name` in the `*.tex` files under `root`, in path order.
    pub fn discover_in_dir(name: &str, root: &Path) -> Result<Self> {
        let mut files: Vec<_> = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "tex"))
            .collect();
        files.sort();

        for path in files {
            let source = std::fs::read_to_string(&path)?;
            if let Some(signature) = Self::find_in_source(name, &source)? {
                tracing::debug!(command = name, path = %path.display(), "Found command signature");
                return Ok(signature);
            }
        }
        Err(DocumentError::SignatureNotFound {
            name: name.to_string(),
        })
    }

    fn assemble(
        name: &str,
        option_names: &str,
        positional_names: &str,
        declared: usize,
        defaults: Vec<String>,
    ) -> Result<Self> {
        let option_names = captured(&BRACKETED, option_names);
        let positionals = captured(&BRACED, positional_names);

        if positionals.len() != declared {
            return Err(mismatch(
                name,
                format!(
                    "{} positional names for {declared} mandatory arguments",
                    positionals.len()
                ),
            ));
        }
        if option_names.len() != defaults.len() {
            return Err(mismatch(
                name,
                format!(
                    "{} optional names for {} optional arguments",
                    option_names.len(),
                    defaults.len()
                ),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            options: option_names.into_iter().zip(defaults).collect(),
            positionals,
        })
    }
}

fn captured(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

fn mismatch(name: &str, message: String) -> DocumentError {
    DocumentError::SignatureMismatch {
        name: name.to_string(),
        message,
    }
}

/*
 * pattern.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Placeholder template compiler.
//!
//! A template is literal text with embedded `<name>` placeholders:
//!
//! ```text
//! \Command[<anchor>]{<loc>}{<text>}
//! ```
//!
//! Compiling it yields a [`PatternSpec`]: the ordered placeholder list, an
//! anchored matcher capturing each placeholder lazily up to the next literal
//! boundary, and a [`Reconstruction`] used to fill values back in.
//!
//! `<<` stands for a single literal `<`.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;

use crate::builder::SharedBuilder;
use crate::error::{ModifierError, Result};

/// Per-placeholder configuration given to the compiler.
#[derive(Debug, Clone, Default)]
pub struct PatternOptions {
    defaults: HashMap<String, String>,
    nested: HashMap<String, SharedBuilder>,
    positionals: Option<Vec<String>>,
}

impl PatternOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give a placeholder a default value used by `build`.
    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Parse a placeholder's captured text with another builder.
    pub fn nested(mut self, name: impl Into<String>, builder: SharedBuilder) -> Self {
        self.nested.insert(name.into(), builder);
        self
    }

    /// Explicitly list the positional placeholders. All others are named.
    pub fn positionals<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.positionals = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

/// One named field of a pattern.
#[derive(Debug, Clone)]
pub struct Placeholder {
    name: String,
    default: Option<String>,
    nested: Option<SharedBuilder>,
    positional: bool,
}

impl Placeholder {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn nested(&self) -> Option<&SharedBuilder> {
        self.nested.as_ref()
    }

    /// Whether `build` fills this placeholder from positional arguments.
    pub fn is_positional(&self) -> bool {
        self.positional
    }
}

/// Literal skeleton of a template with one slot per placeholder.
///
/// Slots are structural, so filled values are never reinterpreted as
/// template syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    /// `placeholders.len() + 1` literal spans surrounding the slots.
    literals: Vec<String>,
    /// Slot labels: `None` for positional slots.
    labels: Vec<Option<String>>,
}

impl Reconstruction {
    pub fn literals(&self) -> &[String] {
        &self.literals
    }

    /// Interleave the literal spans with `values`, one per slot.
    pub fn fill<S: AsRef<str>>(&self, values: &[S]) -> String {
        debug_assert_eq!(values.len() + 1, self.literals.len());
        let mut out = self.literals[0].clone();
        for (value, literal) in values.iter().zip(&self.literals[1..]) {
            out.push_str(value.as_ref());
            out.push_str(literal);
        }
        out
    }

    /// Printable form: braces in literals doubled, `{}` for positional slots
    /// and `{name}` for named ones.
    pub fn format_string(&self) -> String {
        let escape = |s: &str| s.replace('{', "{{").replace('}', "}}");
        let mut out = escape(&self.literals[0]);
        for (label, literal) in self.labels.iter().zip(&self.literals[1..]) {
            match label {
                Some(name) => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
                None => out.push_str("{}"),
            }
            out.push_str(&escape(literal));
        }
        out
    }
}

/// A compiled template.
#[derive(Debug, Clone)]
pub struct PatternSpec {
    template: String,
    placeholders: Vec<Placeholder>,
    matcher: Regex,
    reconstruction: Reconstruction,
}

impl PatternSpec {
    /// Compile a template with no defaults or nested builders.
    pub fn compile(template: &str) -> Result<Self> {
        Self::compile_with(template, PatternOptions::default())
    }

    /// Compile a template with per-placeholder options.
    ///
    /// # Errors
    ///
    /// Returns [`ModifierError::Pattern`] for an empty template, an
    /// unclosed or invalid placeholder, a duplicated placeholder, or options
    /// naming a placeholder the template does not contain.
    pub fn compile_with(template: &str, options: PatternOptions) -> Result<Self> {
        if template.is_empty() {
            return Err(ModifierError::pattern(template, "empty template"));
        }
        let (literals, names) = split_template(template)?;

        let PatternOptions {
            mut defaults,
            mut nested,
            positionals,
        } = options;
        for name in defaults.keys().chain(nested.keys()) {
            if !names.contains(name) {
                return Err(ModifierError::pattern(
                    template,
                    format!("option given for `{name}` which is not a placeholder"),
                ));
            }
        }
        if let Some(positionals) = &positionals {
            if let Some(name) = positionals.iter().find(|n| !names.contains(*n)) {
                return Err(ModifierError::pattern(
                    template,
                    format!("positional `{name}` is not a placeholder"),
                ));
            }
        }

        let placeholders: Vec<Placeholder> = names
            .into_iter()
            .map(|name| {
                let default = defaults.remove(&name);
                let nested = nested.remove(&name);
                let positional = match &positionals {
                    Some(list) => list.contains(&name),
                    None => default.is_none() && nested.is_none(),
                };
                Placeholder {
                    name,
                    default,
                    nested,
                    positional,
                }
            })
            .collect();

        for (i, literal) in literals.iter().enumerate().skip(1) {
            if literal.is_empty() && i < placeholders.len() {
                tracing::warn!(
                    template,
                    first = placeholders[i - 1].name.as_str(),
                    second = placeholders[i].name.as_str(),
                    "Adjacent placeholders with no literal boundary"
                );
            }
        }

        let mut source = String::from(r"(?s)\A");
        source.push_str(&regex::escape(&literals[0]));
        for literal in &literals[1..] {
            source.push_str("(.*?)");
            source.push_str(&regex::escape(literal));
        }
        source.push_str(r"\z");
        let matcher = Regex::new(&source)
            .map_err(|e| ModifierError::pattern(template, format!("invalid matcher: {e}")))?;

        let labels = placeholders
            .iter()
            .map(|p| (!p.positional).then(|| p.name.clone()))
            .collect();
        let reconstruction = Reconstruction { literals, labels };

        tracing::debug!(
            template,
            placeholders = placeholders.len(),
            "Compiled pattern"
        );

        Ok(Self {
            template: template.to_string(),
            placeholders,
            matcher,
            reconstruction,
        })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Placeholder names in template order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.placeholders.iter().map(|p| p.name.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.placeholders.iter().position(|p| p.name == name)
    }

    pub fn placeholder(&self, name: &str) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.name == name)
    }

    /// The anchored matcher; capture group `i + 1` is placeholder `i`.
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    pub fn reconstruction(&self) -> &Reconstruction {
        &self.reconstruction
    }
}

impl fmt::Display for PatternSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// Split a template into `n + 1` literal spans and `n` placeholder names.
fn split_template(template: &str) -> Result<(Vec<String>, Vec<String>)> {
    let mut literals = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut rest = template;

    while let Some(open) = rest.find('<') {
        current.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        if let Some(escaped) = after.strip_prefix('<') {
            current.push('<');
            rest = escaped;
            continue;
        }

        let Some(close) = after.find('>') else {
            return Err(ModifierError::pattern(
                template,
                format!(
                    "placeholder at byte {} is never closed",
                    template.len() - rest.len() + open
                ),
            ));
        };
        let name = &after[..close];
        if !is_identifier(name) {
            return Err(ModifierError::pattern(
                template,
                format!("`<{name}>` is not a valid placeholder name"),
            ));
        }
        if names.iter().any(|n| n == name) {
            return Err(ModifierError::pattern(
                template,
                format!("placeholder `<{name}>` appears more than once"),
            ));
        }
        names.push(name.to_string());
        literals.push(std::mem::take(&mut current));
        rest = &after[close + 1..];
    }
    current.push_str(rest);
    literals.push(current);

    Ok((literals, names))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(spec: &PatternSpec) -> Vec<&str> {
        spec.names().collect()
    }

    #[test]
    fn test_placeholders_in_template_order() {
        let spec = PatternSpec::compile(r"\Command[<anchor>]{<loc>}{<text>}").unwrap();
        assert_eq!(names(&spec), vec!["anchor", "loc", "text"]);
        assert_eq!(
            spec.reconstruction().literals(),
            [r"\Command[", "]{", "}{", "}"]
        );
    }

    #[test]
    fn test_literals_are_matched_verbatim() {
        let spec = PatternSpec::compile(r"\Diff[<mod>]{<x>.*}").unwrap();
        let caps = spec.matcher().captures(r"\Diff[+]{a.*}").unwrap();
        assert_eq!(&caps[1], "+");
        assert_eq!(&caps[2], "a");
        // `.*` is literal, not a wildcard.
        assert!(!spec.matcher().is_match(r"\Diff[+]{abc}"));
    }

    #[test]
    fn test_captures_are_lazy_and_anchored() {
        let spec = PatternSpec::compile("<mod>/{<text>}").unwrap();
        let caps = spec.matcher().captures("+/{a/{b}}").unwrap();
        assert_eq!(&caps[1], "+");
        assert_eq!(&caps[2], "a/{b}");
        assert!(!spec.matcher().is_match("+/{a} trailing"));
    }

    #[test]
    fn test_captures_span_lines() {
        let spec = PatternSpec::compile("{<body>}").unwrap();
        let caps = spec.matcher().captures("{line1\nline2}").unwrap();
        assert_eq!(&caps[1], "line1\nline2");
    }

    #[test]
    fn test_unclosed_placeholder() {
        let err = PatternSpec::compile(r"\Cmd{<name}").unwrap_err();
        assert!(matches!(err, ModifierError::Pattern { .. }), "{err}");
        assert!(err.to_string().contains("never closed"));
    }

    #[test]
    fn test_invalid_placeholder_name() {
        assert!(PatternSpec::compile("a <> b").is_err());
        assert!(PatternSpec::compile("a < b > c").is_err());
        assert!(PatternSpec::compile("<1st>").is_err());
    }

    #[test]
    fn test_empty_template() {
        let err = PatternSpec::compile("").unwrap_err();
        assert!(matches!(err, ModifierError::Pattern { .. }), "{err}");
        assert!(PatternSpec::compile_with("", PatternOptions::new()).is_err());
    }

    #[test]
    fn test_duplicate_placeholder() {
        let err = PatternSpec::compile("<a>-<a>").unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_option_for_unknown_placeholder() {
        let options = PatternOptions::new().default_value("color", "Blue4");
        let err = PatternSpec::compile_with(r"\Branch{<name>}", options).unwrap_err();
        assert!(err.to_string().contains("`color`"), "{err}");

        let options = PatternOptions::new().positionals(["nope"]);
        assert!(PatternSpec::compile_with(r"\Branch{<name>}", options).is_err());
    }

    #[test]
    fn test_escaped_angle_bracket() {
        let spec = PatternSpec::compile(r"\draw[<<->] (<from>) -- (<to>);").unwrap();
        assert_eq!(names(&spec), vec!["from", "to"]);
        let caps = spec.matcher().captures(r"\draw[<->] (a) -- (b);").unwrap();
        assert_eq!(&caps[1], "a");
        assert_eq!(&caps[2], "b");
    }

    #[test]
    fn test_positionals_default_to_fields_without_options() {
        let options = PatternOptions::new().default_value("anchor", "center");
        let spec =
            PatternSpec::compile_with(r"\Command[<anchor>]{<loc>}{<text>}", options).unwrap();
        let positional: Vec<bool> = spec.placeholders().iter().map(|p| p.is_positional()).collect();
        assert_eq!(positional, vec![false, true, true]);
        assert_eq!(spec.placeholder("anchor").unwrap().default_value(), Some("center"));
    }

    #[test]
    fn test_explicit_positionals() {
        let options = PatternOptions::new().positionals(Vec::<String>::new());
        let spec = PatternSpec::compile_with("<a>,<b>", options).unwrap();
        assert!(spec.placeholders().iter().all(|p| !p.is_positional()));
    }

    #[test]
    fn test_format_string_escapes_braces() {
        let options = PatternOptions::new().default_value("anchor", "center");
        let spec =
            PatternSpec::compile_with(r"\Command[<anchor>]{<loc>}{<text>}", options).unwrap();
        assert_eq!(
            spec.reconstruction().format_string(),
            r"\Command[{anchor}]{{{}}}{{{}}}"
        );
    }

    #[test]
    fn test_fill_is_structural() {
        let spec = PatternSpec::compile("<mod>/{<text>}").unwrap();
        assert_eq!(spec.reconstruction().fill(&["+", "{name}"]), "+/{{name}}");
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let a = PatternSpec::compile("<a>[<b>]").unwrap();
        let b = PatternSpec::compile("<a>[<b>]").unwrap();
        assert_eq!(a.matcher().as_str(), b.matcher().as_str());
        assert_eq!(a.reconstruction(), b.reconstruction());
    }
}

/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Markers and separators used to segment a document.

use regex::Regex;

use crate::error::{DocumentError, Result};

/// How slides and steps are delimited in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConfig {
    /// Marker opening a slide, followed by the slide name on the same line.
    pub start_marker: String,
    /// Marker closing a slide.
    pub end_marker: String,
    /// Name of the command opening a step, without backslash.
    pub step_command: String,
    /// Joins the steps of one slide when rendering.
    pub step_separator: String,
    /// Text placed between a slide and a slide split from it.
    pub slide_gap: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            start_marker: "% SLIDE".to_string(),
            end_marker: "% ENDSLIDE".to_string(),
            step_command: "Step".to_string(),
            step_separator: "\n".to_string(),
            slide_gap: "\n\n".to_string(),
        }
    }
}

impl DocumentConfig {
    pub fn with_markers(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_marker = start.into();
        self.end_marker = end.into();
        self
    }

    pub fn with_step_command(mut self, command: impl Into<String>) -> Self {
        self.step_command = command.into();
        self
    }

    pub fn with_step_separator(mut self, separator: impl Into<String>) -> Self {
        self.step_separator = separator.into();
        self
    }

    pub fn with_slide_gap(mut self, gap: impl Into<String>) -> Self {
        self.slide_gap = gap.into();
        self
    }

    /// Matcher for the opening of a step: `\Step`, optional `[...]`, then `{`.
    pub(crate) fn step_matcher(&self) -> Result<Regex> {
        let source = format!(r"\\{}(\[.*?\])?\{{", regex::escape(&self.step_command));
        Regex::new(&source).map_err(|e| DocumentError::InvalidConfig {
            message: format!("step command {:?}: {e}", self.step_command),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DocumentConfig::default();
        assert_eq!(config.start_marker, "% SLIDE");
        assert_eq!(config.end_marker, "% ENDSLIDE");
        assert_eq!(config.step_separator, "\n");
    }

    #[test]
    fn test_step_matcher() {
        let matcher = DocumentConfig::default().step_matcher().unwrap();
        assert_eq!(matcher.find(r"head \Step[fragile]{body}").unwrap().as_str(), r"\Step[fragile]{");
        assert_eq!(matcher.find(r"\Step{body}").unwrap().as_str(), r"\Step{");
        assert!(matcher.find(r"\Stepper{x}").is_none());

        let custom = DocumentConfig::default()
            .with_step_command("Frame*")
            .step_matcher()
            .unwrap();
        assert!(custom.is_match(r"\Frame*{x}"));
    }
}

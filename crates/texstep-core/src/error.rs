/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for pattern compilation, parsing and construction.

use thiserror::Error;

/// Longest input prefix quoted in a [`ModifierError::ParseMismatch`].
pub const EXCERPT_LIMIT: usize = 80;

/// Errors that can occur while compiling patterns or building nodes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModifierError {
    /// Malformed template, detected when the pattern is compiled.
    #[error("Malformed pattern {template:?}: {message}")]
    Pattern { template: String, message: String },

    /// Input text does not satisfy a compiled pattern.
    #[error("Pattern {pattern:?} does not match input {excerpt:?}")]
    ParseMismatch { pattern: String, excerpt: String },

    /// Values given to a builder cannot survive a parse/render round trip.
    #[error("Cannot construct from {template:?}: {message}")]
    Construction { template: String, message: String },

    /// A field name the pattern does not declare.
    #[error("No field `{field}` in pattern {template:?}")]
    UnknownField { field: String, template: String },
}

impl ModifierError {
    pub(crate) fn pattern(template: &str, message: impl Into<String>) -> Self {
        Self::Pattern {
            template: template.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn mismatch(pattern: &str, input: &str) -> Self {
        Self::ParseMismatch {
            pattern: pattern.to_string(),
            excerpt: excerpt(input),
        }
    }

    pub(crate) fn construction(template: &str, message: impl Into<String>) -> Self {
        Self::Construction {
            template: template.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn unknown_field(template: &str, field: &str) -> Self {
        Self::UnknownField {
            field: field.to_string(),
            template: template.to_string(),
        }
    }
}

/// Bounded prefix of `input`, cut on a character boundary.
pub(crate) fn excerpt(input: &str) -> String {
    match input.char_indices().nth(EXCERPT_LIMIT) {
        Some((cut, _)) => format!("{}…", &input[..cut]),
        None => input.to_string(),
    }
}

/// Result type for modifier operations.
pub type Result<T> = std::result::Result<T, ModifierError>;

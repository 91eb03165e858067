/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for document segmentation, animation and selection.

use std::path::PathBuf;

use texstep_core::ModifierError;
use thiserror::Error;

/// Errors that can occur while working on a whole document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A pattern failed to compile, parse or build.
    #[error(transparent)]
    Modifier(#[from] ModifierError),

    /// A slide name with no registered section kind.
    #[error("No section kind registered for slide {tag:?}")]
    UnregisteredTag { tag: String },

    /// The same slide name registered twice.
    #[error("Section kind for {tag:?} is already registered")]
    DuplicateTag { tag: String },

    /// Markers or command names that cannot be used for segmentation.
    #[error("Invalid document configuration: {message}")]
    InvalidConfig { message: String },

    /// A slide chunk lacking its end marker or its name line.
    #[error("Slide {index} is malformed: {message}")]
    MalformedSlide { index: usize, message: String },

    /// A slide body without a step command.
    #[error("Slide {slide:?} has no `\\{command}` command")]
    MissingStep { slide: String, command: String },

    /// Rendering the unedited document did not reproduce the input.
    #[error(
        "Rendering without modifications differs from the input at byte {offset}; \
         diff {} against the input to investigate",
        .side_file.display()
    )]
    RoundTrip { side_file: PathBuf, offset: usize },

    /// No slide name contains the requested text.
    #[error("No slide name contains {name:?}")]
    SlideNotFound { name: String },

    /// A step index outside `1..=count`.
    #[error("Step {index} is out of range (1 to {count})")]
    StepOutOfRange { index: usize, count: usize },

    /// A selection index that is neither a step number nor `-1`.
    #[error("Invalid step index {value}: steps count from 1, and -1 means the last step")]
    InvalidStepIndex { value: i64 },

    /// No annotated definition of the command was found.
    #[error(
        "Could not find an annotated `\\NewDocumentCommand{{\\{name}}}` \
         or `\\newcommand{{\\{name}}}`"
    )]
    SignatureNotFound { name: String },

    /// The annotation and the declared arguments disagree.
    #[error("Signature of `\\{name}` is inconsistent: {message}")]
    SignatureMismatch { name: String, message: String },

    /// I/O error (reading sources, writing the side file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = DocumentError::StepOutOfRange { index: 7, count: 4 };
        assert_eq!(err.to_string(), "Step 7 is out of range (1 to 4)");

        let err = DocumentError::InvalidStepIndex { value: -5 };
        assert!(err.to_string().starts_with("Invalid step index -5"));

        let err = DocumentError::RoundTrip {
            side_file: PathBuf::from("wrong_render"),
            offset: 12,
        };
        assert!(err.to_string().contains("byte 12"));
        assert!(err.to_string().contains("wrong_render"));

        let err = DocumentError::SignatureNotFound {
            name: "Branch".to_string(),
        };
        assert_eq!(
            err.to_string(),
            r"Could not find an annotated `\NewDocumentCommand{\Branch}` or `\newcommand{\Branch}`"
        );
    }

    #[test]
    fn test_modifier_errors_convert() {
        let err: DocumentError = texstep_core::PatternSpec::compile("<a")
            .map(|_| ())
            .unwrap_err()
            .into();
        assert!(matches!(err, DocumentError::Modifier(ModifierError::Pattern { .. })));
    }
}

/*
 * builder.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The construction capability shared by every node kind.
//!
//! A [`Builder`] produces nodes two ways: from existing text ([`Builder::parse`])
//! or from explicit values ([`Builder::build`]). Builders are immutable once
//! configured and are shared behind [`SharedBuilder`] so that a compiled
//! pattern can be nested inside other patterns and sequences.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::node::Node;

/// Trait implemented by every node factory.
///
/// # Thread Safety
///
/// Builders must be `Send + Sync` so statically known patterns can be
/// compiled once at startup and reused from anywhere.
pub trait Builder: fmt::Debug + Send + Sync {
    /// Construct a node from existing text.
    ///
    /// # Errors
    ///
    /// Returns [`ModifierError::ParseMismatch`](crate::ModifierError::ParseMismatch)
    /// if the text does not have the expected shape.
    fn parse(&self, text: &str) -> Result<Node>;

    /// Construct a node from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`ModifierError::Construction`](crate::ModifierError::Construction)
    /// if the values cannot produce text that parses back to the same values.
    fn build(&self, args: &Args) -> Result<Node>;

    /// Whether `node` has the shape this builder produces.
    fn accepts(&self, node: &Node) -> bool;
}

/// A builder shared between patterns, sequences and registries.
pub type SharedBuilder = Arc<dyn Builder>;

/// Constructor arguments: positional values plus named values.
///
/// ```ignore
/// let args = Args::from(["+", "hello"]);
/// let args = Args::new().arg("+").with("text", "hello");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    positional: Vec<String>,
    named: Vec<(String, String)>,
}

impl Args {
    /// Empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional value.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add a named value. A later value for the same name wins.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn named(&self) -> &[(String, String)] {
        &self.named
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

impl From<&str> for Args {
    fn from(value: &str) -> Self {
        Args::new().arg(value)
    }
}

impl From<String> for Args {
    fn from(value: String) -> Self {
        Args::new().arg(value)
    }
}

impl<const N: usize> From<[&str; N]> for Args {
    fn from(values: [&str; N]) -> Self {
        values.into_iter().fold(Args::new(), Args::arg)
    }
}

/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Registration table mapping slide names to section kinds.
//!
//! Every slide name found in a document must resolve to a [`SectionKind`]:
//! the builders used for its header and its steps, and an optional
//! animation hook. The table is populated once, before parsing.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use texstep_core::{ConstantBuilder, SharedBuilder};

use crate::document::Document;
use crate::error::{DocumentError, Result};

/// Hook run once per slide by [`Document::animate`].
///
/// Receives the whole document and the index of the slide being animated,
/// so it can replace the slide's steps or split it into new slides.
pub type AnimateHook = Arc<dyn Fn(&mut Document, usize) -> Result<()> + Send + Sync>;

/// Builders and behaviour attached to one slide name.
#[derive(Clone)]
pub struct SectionKind {
    step: SharedBuilder,
    header: SharedBuilder,
    animate: Option<AnimateHook>,
}

impl SectionKind {
    /// A kind whose header is kept as constant text.
    pub fn new(step: SharedBuilder) -> Self {
        Self {
            step,
            header: ConstantBuilder::shared(),
            animate: None,
        }
    }

    /// Every step and header kept as constant text, with no animation.
    pub fn constant() -> Self {
        Self::new(ConstantBuilder::shared())
    }

    pub fn with_header(mut self, header: SharedBuilder) -> Self {
        self.header = header;
        self
    }

    pub fn with_animation<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Document, usize) -> Result<()> + Send + Sync + 'static,
    {
        self.animate = Some(Arc::new(hook));
        self
    }

    pub fn step_builder(&self) -> &SharedBuilder {
        &self.step
    }

    pub fn header_builder(&self) -> &SharedBuilder {
        &self.header
    }

    pub fn animation(&self) -> Option<&AnimateHook> {
        self.animate.as_ref()
    }
}

impl fmt::Debug for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionKind")
            .field("step", &self.step)
            .field("header", &self.header)
            .field("animate", &self.animate.is_some())
            .finish()
    }
}

/// Slide names mapped to their section kinds.
#[derive(Debug, Clone, Default)]
pub struct SectionRegistry {
    kinds: HashMap<String, Arc<SectionKind>>,
    fallback: Option<Arc<SectionKind>>,
}

impl SectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry resolving every name to constant steps and headers.
    pub fn generic() -> Self {
        Self::new().with_fallback(SectionKind::constant())
    }

    /// Register the kind used for slides named `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::DuplicateTag`] if `tag` is already taken.
    pub fn register(&mut self, tag: impl Into<String>, kind: SectionKind) -> Result<&mut Self> {
        let tag = tag.into();
        if self.kinds.contains_key(&tag) {
            return Err(DocumentError::DuplicateTag { tag });
        }
        tracing::debug!(tag = %tag, "Registered section kind");
        self.kinds.insert(tag, Arc::new(kind));
        Ok(self)
    }

    /// Kind used for names that were never registered.
    pub fn with_fallback(mut self, kind: SectionKind) -> Self {
        self.fallback = Some(Arc::new(kind));
        self
    }

    /// Resolve a slide name.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnregisteredTag`] if `tag` is unknown and no
    /// fallback is configured.
    pub fn lookup(&self, tag: &str) -> Result<&Arc<SectionKind>> {
        if let Some(kind) = self.kinds.get(tag) {
            return Ok(kind);
        }
        match &self.fallback {
            // A registry with nothing registered is generic on purpose.
            Some(kind) if self.kinds.is_empty() => Ok(kind),
            Some(kind) => {
                tracing::warn!(tag, "No section kind registered, using fallback");
                Ok(kind)
            }
            None => Err(DocumentError::UnregisteredTag {
                tag: tag.to_string(),
            }),
        }
    }

    /// Registered names, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.kinds.contains_key(tag)
    }
}

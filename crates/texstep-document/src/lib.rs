/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Slide documents built on the texstep engine.
//!
//! A document is carved into named slides. Each slide name resolves through
//! a [`SectionRegistry`] to the builders that parse its header and its step,
//! and to an optional animation hook that turns the parsed stub step into
//! a series of rendered steps.
//!
//! # Example
//!
//! ```
//! use texstep_document::{Document, SectionKind, SectionRegistry};
//!
//! let mut registry = SectionRegistry::new();
//! registry
//!     .register(
//!         "Title",
//!         SectionKind::constant().with_animation(|doc, index| {
//!             if let Some(slide) = doc.slide_mut(index) {
//!                 let stub = slide.pop_step().unwrap_or_else(|| texstep_core::Node::constant(""));
//!                 slide.add_step(&stub);
//!                 slide.add_step(&stub);
//!             }
//!             Ok(())
//!         }),
//!     )
//!     .unwrap();
//!
//! let text = "% SLIDE Title\n\\Step{Hello}\n% ENDSLIDE\n";
//! let mut doc = Document::parse(text, &registry).unwrap();
//! assert_eq!(doc.render(), text);
//!
//! doc.animate().unwrap();
//! assert_eq!(doc.step_count(), 2);
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod header;
pub mod registry;
pub mod selection;
pub mod signature;

pub use config::DocumentConfig;
pub use document::{Document, Slide, Split};
pub use error::{DocumentError, Result};
pub use header::{HEADER_TEMPLATE, standard_header};
pub use registry::{AnimateHook, SectionKind, SectionRegistry};
pub use selection::{Selection, StepStop, StepSummary};
pub use signature::CommandSignature;

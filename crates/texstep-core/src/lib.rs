/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Round-trip parse/edit/render engine for structured markup fragments.
//!
//! Text is parsed into a tree of nodes, edited in place, and rendered back.
//! An unedited tree always renders to exactly the text it was parsed from.
//!
//! - Pattern templates: literal text with `<name>` placeholders, compiled
//!   into a [`PatternSpec`]
//! - Capture nodes: one named field per placeholder, see [`PatternBuilder`]
//! - Sequences: homogeneous elements joined by a separator, see
//!   [`SequenceBuilder`]
//! - A render pipeline shared by every node: visibility, prolog and epilog,
//!   opacity and layer brackets
//!
//! # Example
//!
//! ```
//! use texstep_core::{Builder, PatternBuilder, SequenceBuilder};
//!
//! let line = PatternBuilder::compile("<mod>/{<text>}").unwrap().shared();
//! let hunk = SequenceBuilder::new(line, ",\n").unwrap().with_tail();
//!
//! let mut node = hunk.parse("+/{a},\n-/{b},\n").unwrap();
//! let lines = node.as_sequence_mut().unwrap();
//! lines.get_mut(0).unwrap().set("mod", "0").unwrap();
//! lines.append_parsed("+/{c}").unwrap();
//!
//! assert_eq!(node.render(), "0/{a},\n-/{b},\n+/{c},\n");
//! ```

pub mod builder;
pub mod capture;
pub mod constant;
pub mod error;
pub mod node;
mod outline;
pub mod pattern;
#[doc(hidden)]
pub mod record;
pub mod render;
pub mod sequence;

pub use builder::{Args, Builder, SharedBuilder};
pub use capture::{CaptureNode, PatternBuilder};
pub use constant::{ConstantBuilder, ConstantNode};
pub use error::{ModifierError, Result};
pub use node::{FieldValue, Node, NodeId, NodeKind};
pub use pattern::{PatternOptions, PatternSpec, Placeholder, Reconstruction};
pub use render::{RenderState, TikzStyle, WrapStyle};
pub use sequence::{SequenceBuilder, SequenceNode};

#[doc(hidden)]
pub use paste;

/*
 * node.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The node tree produced by builders.
//!
//! Every [`Node`] carries an identifier, a [`RenderState`] and one of three
//! kinds of content:
//!
//! - [`ConstantNode`]: immutable raw text
//! - [`CaptureNode`]: named fields from a single pattern match
//! - [`SequenceNode`]: homogeneous elements joined by a separator
//!
//! Ownership is strictly tree-shaped. [`Node::copy`] is a structural clone:
//! owned children are cloned recursively, compiled patterns and builders are
//! immutable and shared.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::capture::CaptureNode;
use crate::constant::ConstantNode;
use crate::error::{ModifierError, Result};
use crate::render::{RenderState, TikzStyle, WrapStyle};
use crate::sequence::SequenceNode;

/// Identity of a node, preserved by [`Node::copy`].
///
/// A handle taken on a stub tree therefore addresses the corresponding node
/// in every copy of that stub. Ids stay unique within one prolog or epilog:
/// a node added next to an entry with the same id gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        NodeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The content of a node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Constant(ConstantNode),
    Capture(CaptureNode),
    Sequence(SequenceNode),
}

/// A parsed structural unit supporting render and copy.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    pub(crate) state: RenderState,
    kind: NodeKind,
}

impl Node {
    pub(crate) fn from_kind(kind: NodeKind) -> Self {
        Self {
            id: NodeId::fresh(),
            state: RenderState::default(),
            kind,
        }
    }

    /// A constant node wrapping `text`.
    pub fn constant(text: impl Into<String>) -> Self {
        Self::from_kind(NodeKind::Constant(ConstantNode::new(text.into())))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn renew_id(&mut self) {
        self.id = NodeId::fresh();
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_constant(&self) -> Option<&ConstantNode> {
        match &self.kind {
            NodeKind::Constant(constant) => Some(constant),
            _ => None,
        }
    }

    pub fn as_capture(&self) -> Option<&CaptureNode> {
        match &self.kind {
            NodeKind::Capture(capture) => Some(capture),
            _ => None,
        }
    }

    pub fn as_capture_mut(&mut self) -> Option<&mut CaptureNode> {
        match &mut self.kind {
            NodeKind::Capture(capture) => Some(capture),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceNode> {
        match &self.kind {
            NodeKind::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut SequenceNode> {
        match &mut self.kind {
            NodeKind::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    /// Structurally independent copy of this tree.
    pub fn copy(&self) -> Node {
        self.clone()
    }

    /// Render through the pipeline with the default TikZ wrapping.
    pub fn render(&self) -> String {
        self.render_with(&TikzStyle)
    }

    /// Render the node's own content, without its render state.
    pub(crate) fn render_core(&self, style: &dyn WrapStyle) -> String {
        match &self.kind {
            NodeKind::Constant(constant) => constant.raw().to_string(),
            NodeKind::Capture(capture) => capture.render_core(style),
            NodeKind::Sequence(sequence) => sequence.render_core(style),
        }
    }

    /// Current value of a capture field.
    ///
    /// # Errors
    ///
    /// Returns [`ModifierError::UnknownField`] if this is not a capture node
    /// or its pattern has no such field.
    pub fn field(&self, name: &str) -> Result<&FieldValue> {
        match &self.kind {
            NodeKind::Capture(capture) => capture.field(name),
            _ => Err(ModifierError::unknown_field(self.describe(), name)),
        }
    }

    /// Text of a plain-string capture field, if there is one.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.as_capture().and_then(|capture| capture.text(name))
    }

    /// Replace the value of a capture field.
    ///
    /// # Errors
    ///
    /// Returns [`ModifierError::UnknownField`] if this is not a capture node
    /// or its pattern has no such field.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<&mut Self> {
        match &mut self.kind {
            NodeKind::Capture(capture) => capture.set(name, value)?,
            _ => return Err(ModifierError::unknown_field(self.describe(), name)),
        }
        Ok(self)
    }

    /// Short description used in error messages.
    pub(crate) fn describe(&self) -> &str {
        match &self.kind {
            NodeKind::Constant(_) => "<constant>",
            NodeKind::Capture(capture) => capture.spec().template(),
            NodeKind::Sequence(_) => "<sequence>",
        }
    }
}

/// The value held by one capture field.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Node(Box<Node>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.as_str()),
            FieldValue::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            FieldValue::Node(node) => Some(node.as_ref()),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            FieldValue::Node(node) => Some(node.as_mut()),
            FieldValue::Text(_) => None,
        }
    }

    /// Render with the default TikZ wrapping.
    pub fn render(&self) -> String {
        self.render_with(&TikzStyle)
    }

    pub fn render_with(&self, style: &dyn WrapStyle) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Node(node) => node.render_with(style),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<Node> for FieldValue {
    fn from(value: Node) -> Self {
        FieldValue::Node(Box::new(value))
    }
}

impl PartialEq<&str> for FieldValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_distinct() {
        let a = Node::constant("a");
        let b = Node::constant("a");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_copy_keeps_identity() {
        let a = Node::constant("a");
        assert_eq!(a.copy().id(), a.id());
    }

    #[test]
    fn test_field_on_constant_is_unknown() {
        let mut node = Node::constant("raw");
        assert!(matches!(
            node.field("x"),
            Err(ModifierError::UnknownField { .. })
        ));
        assert!(node.set("x", "y").is_err());
        assert_eq!(node.text("x"), None);
    }

    #[test]
    fn test_field_value_conversions() {
        assert_eq!(FieldValue::from("a"), "a");
        let nested = FieldValue::from(Node::constant("inner"));
        assert!(nested.as_text().is_none());
        assert_eq!(nested.render(), "inner");
    }
}

/*
 * sequence.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Homogeneous sequences joined by a literal separator.
//!
//! ```text
//! [head] SEP element SEP element ... SEP [tail]
//! ```
//!
//! Head and tail are constant nodes and exist only when the builder was
//! configured for them. Elements are parsed with a shared element builder.

use std::sync::Arc;

use crate::builder::{Args, Builder, SharedBuilder};
use crate::error::{ModifierError, Result};
use crate::node::{Node, NodeKind};
use crate::render::{TikzStyle, WrapStyle};

/// An ordered list of nodes produced by one element builder.
#[derive(Debug, Clone)]
pub struct SequenceNode {
    element: SharedBuilder,
    separator: Arc<str>,
    head: Option<Box<Node>>,
    tail: Option<Box<Node>>,
    elements: Vec<Node>,
}

impl SequenceNode {
    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn element_builder(&self) -> &SharedBuilder {
        &self.element
    }

    pub fn head(&self) -> Option<&Node> {
        self.head.as_deref()
    }

    pub fn head_mut(&mut self) -> Option<&mut Node> {
        self.head.as_deref_mut()
    }

    pub fn tail(&self) -> Option<&Node> {
        self.tail.as_deref()
    }

    pub fn tail_mut(&mut self) -> Option<&mut Node> {
        self.tail.as_deref_mut()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.elements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.elements.get_mut(index)
    }

    pub fn elements(&self) -> &[Node] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.elements.iter_mut()
    }

    /// Append an already built node. Returns the stored node.
    ///
    /// # Errors
    ///
    /// Returns [`ModifierError::Construction`] if the element builder could
    /// not have produced `node`, or if the sequence would no longer split
    /// back into the same elements once `node` is in place.
    pub fn append(&mut self, node: Node) -> Result<&mut Node> {
        let index = self.elements.len();
        self.insert(index, node)
    }

    /// Build an element from `args` and append it.
    pub fn append_new(&mut self, args: impl Into<Args>) -> Result<&mut Node> {
        let node = self.element.build(&args.into())?;
        self.append(node)
    }

    /// Parse an element from `text` and append it.
    pub fn append_parsed(&mut self, text: &str) -> Result<&mut Node> {
        let node = self.element.parse(text)?;
        self.append(node)
    }

    /// Insert `node` before position `index`.
    pub fn insert(&mut self, index: usize, node: Node) -> Result<&mut Node> {
        if index > self.elements.len() {
            return Err(ModifierError::construction(
                &self.describe(),
                format!(
                    "cannot insert at {index} in a sequence of {}",
                    self.elements.len()
                ),
            ));
        }
        self.check_element(index, &node)?;
        self.elements.insert(index, node);
        Ok(&mut self.elements[index])
    }

    pub fn remove(&mut self, index: usize) -> Option<Node> {
        (index < self.elements.len()).then(|| self.elements.remove(index))
    }

    pub fn retain(&mut self, keep: impl FnMut(&Node) -> bool) {
        self.elements.retain(keep);
    }

    /// Remove every element. Head and tail stay.
    pub fn clear(&mut self) -> &mut Self {
        self.elements.clear();
        self
    }

    /// `node` must come from the element builder, and the sequence with
    /// `node` inserted at `index` must split back into the same chunks.
    fn check_element(&self, index: usize, node: &Node) -> Result<()> {
        if !self.element.accepts(node) {
            return Err(ModifierError::construction(
                &self.describe(),
                format!("element builder cannot produce a {} node", node.describe()),
            ));
        }
        let mut chunks = self.core_chunks();
        let offset = usize::from(self.head.is_some());
        chunks.insert(offset + index, node.render_core(&TikzStyle));
        let edges = self.head.is_some() || self.tail.is_some();
        if !splits_back(&self.separator, &chunks, edges) {
            return Err(ModifierError::construction(
                &self.describe(),
                format!("element {index} would not split back on the separator"),
            ));
        }
        Ok(())
    }

    /// Core text of head, elements and tail, in render order.
    fn core_chunks(&self) -> Vec<String> {
        self.head
            .iter()
            .map(|node| &**node)
            .chain(&self.elements)
            .chain(self.tail.iter().map(|node| &**node))
            .map(|node| node.render_core(&TikzStyle))
            .collect()
    }

    fn describe(&self) -> String {
        describe(&self.separator)
    }

    pub(crate) fn render_core(&self, style: &dyn WrapStyle) -> String {
        let head = self.head.iter().map(|node| node.render_with(style));
        let elements = self.elements.iter().map(|node| node.render_with(style));
        let tail = self.tail.iter().map(|node| node.render_with(style));
        head.chain(elements)
            .chain(tail)
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

/// Builds sequences of elements from one element builder.
#[derive(Debug, Clone)]
pub struct SequenceBuilder {
    element: SharedBuilder,
    separator: Arc<str>,
    head: bool,
    tail: bool,
}

impl SequenceBuilder {
    /// A sequence without head or tail.
    ///
    /// # Errors
    ///
    /// Returns [`ModifierError::Pattern`] for an empty separator.
    pub fn new(element: SharedBuilder, separator: impl Into<String>) -> Result<Self> {
        let separator: String = separator.into();
        if separator.is_empty() {
            return Err(ModifierError::pattern(
                &describe(""),
                "separator must not be empty",
            ));
        }
        Ok(Self {
            element,
            separator: separator.into(),
            head: false,
            tail: false,
        })
    }

    /// Treat the first chunk as a constant head.
    pub fn with_head(mut self) -> Self {
        self.head = true;
        self
    }

    /// Treat the last chunk as a constant tail.
    pub fn with_tail(mut self) -> Self {
        self.tail = true;
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn shared(self) -> SharedBuilder {
        Arc::new(self)
    }

    /// A sequence with no elements and empty head and tail where configured.
    pub fn empty(&self) -> Node {
        let constant = |enabled: bool| enabled.then(|| Box::new(Node::constant("")));
        self.assemble(constant(self.head), constant(self.tail), Vec::new())
    }

    fn assemble(
        &self,
        head: Option<Box<Node>>,
        tail: Option<Box<Node>>,
        elements: Vec<Node>,
    ) -> Node {
        Node::from_kind(NodeKind::Sequence(SequenceNode {
            element: Arc::clone(&self.element),
            separator: Arc::clone(&self.separator),
            head,
            tail,
            elements,
        }))
    }
}

impl Builder for SequenceBuilder {
    fn parse(&self, text: &str) -> Result<Node> {
        let edges = usize::from(self.head) + usize::from(self.tail);
        if edges == 0 && text.is_empty() {
            return Ok(self.assemble(None, None, Vec::new()));
        }

        let mut chunks: Vec<&str> = text.split(&*self.separator).collect();
        if chunks.len() < edges {
            return Err(ModifierError::mismatch(&describe(&self.separator), text));
        }

        let tail = if self.tail { chunks.pop() } else { None };
        let mut chunks = chunks.into_iter();
        let head = if self.head { chunks.next() } else { None };

        let elements = chunks
            .map(|chunk| self.element.parse(chunk))
            .collect::<Result<Vec<_>>>()?;

        tracing::trace!(
            separator = &*self.separator,
            elements = elements.len(),
            "Parsed sequence"
        );

        Ok(self.assemble(
            head.map(|text| Box::new(Node::constant(text))),
            tail.map(|text| Box::new(Node::constant(text))),
            elements,
        ))
    }

    /// Each positional value is parsed as one element. Named `head` and
    /// `tail` values set the constant edges, when configured.
    fn build(&self, args: &Args) -> Result<Node> {
        let mut head = self.head.then(String::new);
        let mut tail = self.tail.then(String::new);
        for (name, value) in args.named() {
            let slot = match name.as_str() {
                "head" => head.as_mut(),
                "tail" => tail.as_mut(),
                _ => None,
            };
            let Some(slot) = slot else {
                return Err(ModifierError::construction(
                    &describe(&self.separator),
                    format!("no edge `{name}` in this sequence"),
                ));
            };
            slot.clone_from(value);
        }

        let edges: Vec<String> = head.iter().chain(&tail).cloned().collect();
        if !edges.is_empty() && !splits_back(&self.separator, &edges, true) {
            return Err(ModifierError::construction(
                &describe(&self.separator),
                "head and tail would not split back on the separator",
            ));
        }

        let edge = |text: Option<String>| text.map(|text| Box::new(Node::constant(text)));
        let mut node = self.assemble(edge(head), edge(tail), Vec::new());
        if let Some(sequence) = node.as_sequence_mut() {
            for value in args.positional() {
                sequence.append_parsed(value)?;
            }
        }
        Ok(node)
    }

    /// Same separator and edges, and every element acceptable to this
    /// builder's element builder.
    fn accepts(&self, node: &Node) -> bool {
        node.as_sequence().is_some_and(|sequence| {
            *sequence.separator == *self.separator
                && sequence.head.is_some() == self.head
                && sequence.tail.is_some() == self.tail
                && sequence.elements.iter().all(|e| self.element.accepts(e))
        })
    }
}

/// Whether joining `chunks` and splitting again gives `chunks` back.
///
/// Without head or tail, a lone empty chunk reads back as no chunk at all.
fn splits_back(separator: &str, chunks: &[String], edges: bool) -> bool {
    if !edges && chunks.len() == 1 && chunks[0].is_empty() {
        return false;
    }
    chunks
        .join(separator)
        .split(separator)
        .eq(chunks.iter().map(String::as_str))
}

fn describe(separator: &str) -> String {
    format!("<sequence separated by {separator:?}>")
}

/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The render pipeline applied to every node.
//!
//! A node's effective render is, from the outside in:
//!
//! 1. nothing at all if the node is hidden;
//! 2. its prolog entries, joined by the prolog separator;
//! 3. an opening layer bracket if a layer is set;
//! 4. an opening opacity bracket if opacity is below 1;
//! 5. the node's own content;
//! 6. the matching closing brackets, innermost first;
//! 7. its epilog entries, joined by the epilog separator.
//!
//! The bracket text itself comes from a [`WrapStyle`]. [`TikzStyle`] is the
//! default and wraps content in PGF layers and TikZ transparency groups.

use crate::node::{Node, NodeId};

/// Formatting of the layer and opacity brackets.
pub trait WrapStyle {
    fn open_layer(&self, layer: &str) -> String;
    fn close_layer(&self, layer: &str) -> String;
    fn open_opacity(&self, opacity: f64) -> String;
    fn close_opacity(&self, opacity: f64) -> String;
}

/// PGF layers and TikZ transparency groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct TikzStyle;

impl WrapStyle for TikzStyle {
    fn open_layer(&self, layer: &str) -> String {
        format!("\\begin{{pgfonlayer}}{{{layer}}}")
    }

    fn close_layer(&self, _layer: &str) -> String {
        "\\end{pgfonlayer}".to_string()
    }

    fn open_opacity(&self, opacity: f64) -> String {
        format!("\\begin{{scope}}[transparency group, opacity={opacity}]\n")
    }

    fn close_opacity(&self, _opacity: f64) -> String {
        "\\end{scope}\n".to_string()
    }
}

/// Presentation state attached to every node.
#[derive(Debug, Clone)]
pub struct RenderState {
    visible: bool,
    prolog: Vec<Node>,
    prolog_separator: String,
    epilog: Vec<Node>,
    epilog_separator: String,
    opacity: f64,
    layer: Option<String>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            visible: true,
            prolog: Vec::new(),
            prolog_separator: "\n".to_string(),
            epilog: Vec::new(),
            epilog_separator: "\n".to_string(),
            opacity: 1.0,
            layer: None,
        }
    }
}

impl RenderState {
    /// Whether every field still holds its default value.
    pub fn is_default(&self) -> bool {
        self.visible
            && self.prolog.is_empty()
            && self.epilog.is_empty()
            && self.opacity >= 1.0
            && self.layer.is_none()
    }
}

impl Node {
    /// Render through the pipeline with the given bracket style.
    ///
    /// The style is passed down to nested nodes and to prolog and epilog
    /// entries.
    pub fn render_with(&self, style: &dyn WrapStyle) -> String {
        let state = &self.state;
        if !state.visible {
            return String::new();
        }

        let mut out = join_rendered(&state.prolog, &state.prolog_separator, style);

        if let Some(layer) = &state.layer {
            out.push_str(&style.open_layer(layer));
        }
        let translucent = state.opacity < 1.0;
        if translucent {
            out.push_str(&style.open_opacity(state.opacity));
        }

        out.push_str(&self.render_core(style));

        if translucent {
            out.push_str(&style.close_opacity(state.opacity));
        }
        if let Some(layer) = &state.layer {
            out.push_str(&style.close_layer(layer));
        }

        out.push_str(&join_rendered(&state.epilog, &state.epilog_separator, style));
        out
    }

    pub fn render_state(&self) -> &RenderState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn show(&mut self) -> &mut Self {
        self.state.visible = true;
        self
    }

    pub fn hide(&mut self) -> &mut Self {
        self.state.visible = false;
        self
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.state.visible = visible;
        self
    }

    pub fn opacity(&self) -> f64 {
        self.state.opacity
    }

    /// Set the opacity, clamped into `[0, 1]`. Non-finite values reset it to 1.
    pub fn set_opacity(&mut self, opacity: f64) -> &mut Self {
        self.state.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self
    }

    pub fn layer(&self) -> Option<&str> {
        self.state.layer.as_deref()
    }

    pub fn set_layer(&mut self, layer: impl Into<String>) -> &mut Self {
        self.state.layer = Some(layer.into());
        self
    }

    pub fn clear_layer(&mut self) -> &mut Self {
        self.state.layer = None;
        self
    }

    pub fn prolog(&self) -> &[Node] {
        &self.state.prolog
    }

    pub fn epilog(&self) -> &[Node] {
        &self.state.epilog
    }

    pub fn set_prolog_separator(&mut self, separator: impl Into<String>) -> &mut Self {
        self.state.prolog_separator = separator.into();
        self
    }

    pub fn set_epilog_separator(&mut self, separator: impl Into<String>) -> &mut Self {
        self.state.epilog_separator = separator.into();
        self
    }

    /// Render `node` before this one. Returns the stored node, whose id
    /// is renewed if another prolog entry already has it.
    pub fn add_prolog(&mut self, node: Node) -> &mut Node {
        push_unique(&mut self.state.prolog, node)
    }

    /// Render `node` after this one. Returns the stored node, whose id is
    /// renewed if another epilog entry already has it.
    pub fn add_epilog(&mut self, node: Node) -> &mut Node {
        push_unique(&mut self.state.epilog, node)
    }

    pub fn remove_from_prolog(&mut self, id: NodeId) -> Option<Node> {
        let index = self.state.prolog.iter().position(|n| n.id() == id)?;
        Some(self.state.prolog.remove(index))
    }

    pub fn remove_from_epilog(&mut self, id: NodeId) -> Option<Node> {
        let index = self.state.epilog.iter().position(|n| n.id() == id)?;
        Some(self.state.epilog.remove(index))
    }

    /// Move an epilog entry last so it renders on top of the others.
    pub fn bump_epilog(&mut self, id: NodeId) -> Option<&mut Node> {
        let node = self.remove_from_epilog(id)?;
        Some(self.add_epilog(node))
    }
}

fn push_unique(nodes: &mut Vec<Node>, mut node: Node) -> &mut Node {
    if nodes.iter().any(|n| n.id() == node.id()) {
        node.renew_id();
    }
    let index = nodes.len();
    nodes.push(node);
    &mut nodes[index]
}

fn join_rendered(nodes: &[Node], separator: &str, style: &dyn WrapStyle) -> String {
    nodes
        .iter()
        .map(|node| node.render_with(style))
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Brackets that are easy to spot in assertions.
    struct Markers;

    impl WrapStyle for Markers {
        fn open_layer(&self, layer: &str) -> String {
            format!("<L:{layer}>")
        }
        fn close_layer(&self, layer: &str) -> String {
            format!("</L:{layer}>")
        }
        fn open_opacity(&self, opacity: f64) -> String {
            format!("<O:{opacity}>")
        }
        fn close_opacity(&self, _opacity: f64) -> String {
            "</O>".to_string()
        }
    }

    #[test]
    fn test_default_state_renders_core_only() {
        let node = Node::constant("body");
        assert!(node.render_state().is_default());
        assert_eq!(node.render(), "body");
    }

    #[test]
    fn test_hidden_node_renders_nothing() {
        let mut node = Node::constant("body");
        node.add_prolog(Node::constant("before"));
        node.add_epilog(Node::constant("after"));
        node.set_layer("background").set_opacity(0.5).hide();
        assert_eq!(node.render(), "");
        assert_eq!(node.render_with(&Markers), "");

        node.show();
        assert_eq!(
            node.render_with(&Markers),
            "before<L:background><O:0.5>body</O></L:background>after"
        );
    }

    #[test]
    fn test_wrapping_order() {
        let mut node = Node::constant("body");
        node.add_prolog(Node::constant("p1"));
        node.add_prolog(Node::constant("p2"));
        node.add_epilog(Node::constant("e1"));
        node.add_epilog(Node::constant("e2"));
        node.set_opacity(0.25).set_layer("top");
        assert_eq!(
            node.render_with(&Markers),
            "p1\np2<L:top><O:0.25>body</O></L:top>e1\ne2"
        );
    }

    #[test]
    fn test_tikz_brackets() {
        let mut node = Node::constant("x");
        node.set_opacity(0.5).set_layer("bg");
        assert_eq!(
            node.render(),
            "\\begin{pgfonlayer}{bg}\\begin{scope}[transparency group, opacity=0.5]\n\
             x\\end{scope}\n\\end{pgfonlayer}"
        );
    }

    #[test]
    fn test_full_opacity_has_no_bracket() {
        let mut node = Node::constant("x");
        node.set_opacity(1.0);
        assert_eq!(node.render(), "x");
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut node = Node::constant("x");
        assert_eq!(node.set_opacity(-3.0).opacity(), 0.0);
        assert_eq!(node.set_opacity(7.0).opacity(), 1.0);
        assert_eq!(node.set_opacity(f64::NAN).opacity(), 1.0);
    }

    #[test]
    fn test_custom_separators() {
        let mut node = Node::constant("x");
        node.add_epilog(Node::constant("a"));
        node.add_epilog(Node::constant("b"));
        node.set_epilog_separator(" ");
        node.add_prolog(Node::constant("c"));
        node.add_prolog(Node::constant("d"));
        node.set_prolog_separator("");
        assert_eq!(node.render(), "cdxa b");
    }

    #[test]
    fn test_prolog_entries_use_their_own_pipeline() {
        let mut node = Node::constant("x");
        node.add_prolog(Node::constant("hidden")).hide();
        node.add_prolog(Node::constant("shown"));
        assert_eq!(node.render(), "\nshownx");
    }

    #[test]
    fn test_remove_by_identity() {
        let mut node = Node::constant("x");
        let first = node.add_epilog(Node::constant("a")).id();
        node.add_epilog(Node::constant("b"));
        let removed = node.remove_from_epilog(first).unwrap();
        assert_eq!(removed.render(), "a");
        assert_eq!(node.render(), "xb");
        assert!(node.remove_from_epilog(first).is_none());

        let p = node.add_prolog(Node::constant("p")).id();
        assert!(node.remove_from_prolog(p).is_some());
        assert_eq!(node.render(), "xb");
    }

    #[test]
    fn test_bump_epilog_renders_last() {
        let mut node = Node::constant("x");
        let a = node.add_epilog(Node::constant("a")).id();
        node.add_epilog(Node::constant("b"));
        node.add_epilog(Node::constant("c"));
        node.bump_epilog(a);
        assert_eq!(node.render(), "xb\nc\na");
        assert!(node.bump_epilog(Node::constant("z").id()).is_none());
    }

    #[test]
    fn test_copies_in_one_epilog_stay_distinct() {
        let diff = Node::constant("diff");
        let mut node = Node::constant("x");
        let first = node.add_epilog(diff.copy()).id();
        let second = node.add_epilog(diff.copy());
        second.set_layer("top");
        let second = second.id();
        assert_ne!(first, second);

        let removed = node.remove_from_epilog(second).unwrap();
        assert_eq!(removed.layer(), Some("top"));
        assert_eq!(node.render(), "xdiff");

        node.add_epilog(diff.copy()).set_layer("top");
        node.bump_epilog(first);
        assert_eq!(
            node.render(),
            "x\\begin{pgfonlayer}{top}diff\\end{pgfonlayer}\ndiff"
        );
    }

    #[test]
    fn test_bump_works_on_copies() {
        let mut stub = Node::constant("x");
        let a = stub.add_epilog(Node::constant("a")).id();
        stub.add_epilog(Node::constant("b"));

        let mut step = stub.copy();
        step.bump_epilog(a);
        assert_eq!(step.render(), "xb\na");
        assert_eq!(stub.render(), "xa\nb");
    }
}

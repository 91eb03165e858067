/*
 * constant.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Trivial leaf nodes wrapping immutable text.

use std::sync::Arc;

use crate::builder::{Args, Builder, SharedBuilder};
use crate::error::{ModifierError, Result};
use crate::node::{Node, NodeKind};

/// Immutable raw text. Offers no editing surface beyond the render state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantNode {
    raw: String,
}

impl ConstantNode {
    pub(crate) fn new(raw: String) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Produces constant nodes from text, verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantBuilder;

impl ConstantBuilder {
    pub fn shared() -> SharedBuilder {
        Arc::new(ConstantBuilder)
    }
}

impl Builder for ConstantBuilder {
    fn parse(&self, text: &str) -> Result<Node> {
        Ok(Node::constant(text))
    }

    /// Expects exactly one positional value: the text to wrap.
    fn build(&self, args: &Args) -> Result<Node> {
        match (args.positional(), args.named()) {
            ([text], []) => Ok(Node::constant(text.as_str())),
            _ => Err(ModifierError::construction(
                "<constant>",
                "expected exactly one positional value",
            )),
        }
    }

    fn accepts(&self, node: &Node) -> bool {
        matches!(node.kind(), NodeKind::Constant(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_build_wrap_text() {
        let parsed = ConstantBuilder.parse("  raw \\text{} ").unwrap();
        assert_eq!(parsed.render(), "  raw \\text{} ");
        assert_eq!(parsed.as_constant().unwrap().raw(), "  raw \\text{} ");

        let built = ConstantBuilder.build(&Args::from("x")).unwrap();
        assert_eq!(built.render(), "x");
    }

    #[test]
    fn test_build_rejects_other_arguments() {
        assert!(ConstantBuilder.build(&Args::new()).is_err());
        assert!(ConstantBuilder.build(&Args::from(["a", "b"])).is_err());
        assert!(ConstantBuilder.build(&Args::new().with("text", "a")).is_err());
    }

    #[test]
    fn test_accepts_only_constants() {
        assert!(ConstantBuilder.accepts(&Node::constant("a")));
    }
}

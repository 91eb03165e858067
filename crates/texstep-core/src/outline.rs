/*
 * outline.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Indented, human-readable description of a node tree.
//!
//! ```text
//! sequence ",\n" (2 elements)
//!   [0] capture "<mod>/{<text>}"
//!     mod: "+"
//!     text: "a"
//!   [1] capture "<mod>/{<text>}" [hidden]
//!     mod: "-"
//!     text: "b"
//!   tail: constant ""
//! ```

use std::fmt::{self, Write};

use crate::error::excerpt;
use crate::node::{FieldValue, Node, NodeKind};

impl Node {
    /// Describe this tree for debugging, one node per line.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = write_node(&mut out, self, 0, "");
        out
    }
}

fn write_node(out: &mut String, node: &Node, depth: usize, label: &str) -> fmt::Result {
    let indent = "  ".repeat(depth);
    write!(out, "{indent}{label}")?;
    match node.kind() {
        NodeKind::Constant(constant) => write!(out, "constant {:?}", excerpt(constant.raw()))?,
        NodeKind::Capture(capture) => write!(out, "capture {:?}", capture.spec().template())?,
        NodeKind::Sequence(sequence) => write!(
            out,
            "sequence {:?} ({} elements)",
            sequence.separator(),
            sequence.len()
        )?,
    }
    write_state(out, node)?;
    out.push('\n');

    match node.kind() {
        NodeKind::Constant(_) => {}
        NodeKind::Capture(capture) => {
            for (name, value) in capture.fields() {
                match value {
                    FieldValue::Text(text) => {
                        writeln!(out, "{indent}  {name}: {:?}", excerpt(text))?;
                    }
                    FieldValue::Node(child) => {
                        write_node(out, child, depth + 1, &format!("{name}: "))?;
                    }
                }
            }
        }
        NodeKind::Sequence(sequence) => {
            if let Some(head) = sequence.head() {
                write_node(out, head, depth + 1, "head: ")?;
            }
            for (i, element) in sequence.iter().enumerate() {
                write_node(out, element, depth + 1, &format!("[{i}] "))?;
            }
            if let Some(tail) = sequence.tail() {
                write_node(out, tail, depth + 1, "tail: ")?;
            }
        }
    }

    for entry in node.prolog() {
        write_node(out, entry, depth + 1, "prolog: ")?;
    }
    for entry in node.epilog() {
        write_node(out, entry, depth + 1, "epilog: ")?;
    }
    Ok(())
}

fn write_state(out: &mut String, node: &Node) -> fmt::Result {
    if node.render_state().is_default() {
        return Ok(());
    }
    let mut notes = Vec::new();
    if !node.is_visible() {
        notes.push("hidden".to_string());
    }
    if node.opacity() < 1.0 {
        notes.push(format!("opacity={}", node.opacity()));
    }
    if let Some(layer) = node.layer() {
        notes.push(format!("layer={layer}"));
    }
    if notes.is_empty() {
        return Ok(());
    }
    write!(out, " [{}]", notes.join(", "))
}

#[cfg(test)]
mod tests {
    use crate::builder::Builder;
    use crate::capture::PatternBuilder;
    use crate::node::Node;
    use crate::sequence::SequenceBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outline_of_sequence() {
        let line = PatternBuilder::compile("<mod>/{<text>}").unwrap().shared();
        let builder = SequenceBuilder::new(line, ",\n").unwrap().with_tail();
        let mut node = builder.parse("+/{a},\n-/{b},\n").unwrap();
        node.as_sequence_mut().unwrap().get_mut(1).unwrap().hide();

        assert_eq!(
            node.outline(),
            "sequence \",\\n\" (2 elements)\n\
             \x20 [0] capture \"<mod>/{<text>}\"\n\
             \x20   mod: \"+\"\n\
             \x20   text: \"a\"\n\
             \x20 [1] capture \"<mod>/{<text>}\" [hidden]\n\
             \x20   mod: \"-\"\n\
             \x20   text: \"b\"\n\
             \x20 tail: constant \"\"\n"
        );
    }

    #[test]
    fn test_outline_shows_state_and_epilog() {
        let mut node = Node::constant("x");
        node.set_layer("bg").set_opacity(0.5);
        node.add_epilog(Node::constant("y"));
        assert_eq!(
            node.outline(),
            "constant \"x\" [opacity=0.5, layer=bg]\n  epilog: constant \"y\"\n"
        );
    }
}

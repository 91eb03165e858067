/*
 * record.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Typed records declared outside the crate, over nested patterns.
 */

use pretty_assertions::assert_eq;
use texstep_core::{
    Args, Builder, ModifierError, Node, PatternBuilder, PatternOptions, SequenceBuilder,
    capture_record,
};

capture_record! {
    /// A single diff line.
    pub struct DiffLine {
        modifier => "mod",
        text => "text",
    }
}

capture_record! {
    pub struct Command {
        anchor => "anchor",
        location => "loc",
        text => "text",
    }
}

#[test]
fn test_keyword_placeholder_through_accessor() {
    let builder = PatternBuilder::compile("<mod>/{<text>}").unwrap();
    let mut line = DiffLine::try_from(builder.parse("+/{x}").unwrap()).unwrap();
    assert_eq!(*line.modifier(), "+");
    line.set_modifier("-").set_text("y");
    assert_eq!(line.node().render(), "-/{y}");
    assert_eq!(DiffLine::FIELDS, ["mod", "text"]);
}

#[test]
fn test_record_over_built_node() {
    let options = PatternOptions::new().default_value("anchor", "center");
    let builder =
        PatternBuilder::compile_with(r"\Command[<anchor>]{<loc>}{<text>}", options).unwrap();
    let mut command = Command::from_node(builder.build(&Args::from(["A", "git init"])).unwrap())
        .unwrap();
    assert_eq!(*command.anchor(), "center");
    command.set_location("B");
    command.node_mut().set_opacity(0.5);
    assert_eq!(
        command.into_node().render(),
        "\\begin{scope}[transparency group, opacity=0.5]\n\\Command[center]{B}{git init}\\end{scope}\n"
    );
}

#[test]
fn test_record_field_holding_a_node() {
    let lines = SequenceBuilder::new(
        PatternBuilder::compile("<mod>/{<text>}").unwrap().shared(),
        "\n",
    )
    .unwrap()
    .shared();
    let options = PatternOptions::new().nested("text", lines);
    let builder =
        PatternBuilder::compile_with(r"\Command[<anchor>]{<loc>}{<text>}", options).unwrap();
    let mut command = Command::from_node(
        builder
            .parse("\\Command[west]{A}{+/{a}\n-/{b}}")
            .unwrap(),
    )
    .unwrap();

    assert!(command.text().as_text().is_none());
    let mut replacement = Node::constant("0/{c}");
    replacement.set_layer("front");
    command.set_text(replacement);
    assert_eq!(
        command.node().render(),
        "\\Command[west]{A}{\\begin{pgfonlayer}{front}0/{c}\\end{pgfonlayer}}"
    );
}

#[test]
fn test_record_rejects_wrong_shape() {
    let builder = PatternBuilder::compile("<mod>:<body>").unwrap();
    let err = DiffLine::from_node(builder.parse("+:x").unwrap()).unwrap_err();
    assert_eq!(
        err,
        ModifierError::UnknownField {
            field: "text".to_string(),
            template: "<mod>:<body>".to_string(),
        }
    );
}

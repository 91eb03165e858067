/*
 * capture.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Capture nodes and the pattern-based builder.
//!
//! A [`CaptureNode`] holds one value per placeholder of its pattern, plus the
//! literal text found between captures in the original match. Rendering
//! interleaves the two, so an unedited node reproduces its input exactly.
//!
//! [`PatternBuilder::build`] is defined in terms of [`PatternBuilder::parse`]:
//! values are filled into the template and the result is parsed back, then
//! checked field by field.

use std::sync::Arc;

use crate::builder::{Args, Builder, SharedBuilder};
use crate::error::{ModifierError, Result};
use crate::node::{FieldValue, Node, NodeKind};
use crate::pattern::{PatternOptions, PatternSpec};
use crate::render::WrapStyle;

/// Named fields from a single pattern match.
///
/// The field set is fixed by the pattern. Values can be replaced, never
/// added or removed.
#[derive(Debug, Clone)]
pub struct CaptureNode {
    spec: Arc<PatternSpec>,
    /// Literal spans of the original match, one more than there are fields.
    literals: Arc<[String]>,
    fields: Vec<FieldValue>,
}

impl CaptureNode {
    pub fn spec(&self) -> &Arc<PatternSpec> {
        &self.spec
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.spec.index_of(name).map(|i| &self.fields[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.spec.index_of(name).map(|i| &mut self.fields[i])
    }

    /// Like [`CaptureNode::get`], failing on an unknown name.
    pub fn field(&self, name: &str) -> Result<&FieldValue> {
        self.get(name)
            .ok_or_else(|| ModifierError::unknown_field(self.spec.template(), name))
    }

    pub fn field_mut(&mut self, name: &str) -> Result<&mut FieldValue> {
        match self.spec.index_of(name) {
            Some(i) => Ok(&mut self.fields[i]),
            None => Err(ModifierError::unknown_field(self.spec.template(), name)),
        }
    }

    /// Text of a plain-string field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Nested node held by a field.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.get(name).and_then(FieldValue::as_node)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.get_mut(name).and_then(FieldValue::as_node_mut)
    }

    /// Replace a field's value.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        *self.field_mut(name)? = value.into();
        Ok(())
    }

    /// Fields in template order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.spec.names().zip(&self.fields)
    }

    /// Field-for-field equality, nested nodes compared by rendered text.
    pub fn same_fields(&self, other: &CaptureNode) -> bool {
        self.spec.template() == other.spec.template()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| match (a, b) {
                    (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
                    _ => a.render() == b.render(),
                })
    }

    pub(crate) fn render_core(&self, style: &dyn WrapStyle) -> String {
        let mut out = self.literals[0].clone();
        for (value, literal) in self.fields.iter().zip(&self.literals[1..]) {
            out.push_str(&value.render_with(style));
            out.push_str(literal);
        }
        out
    }
}

/// Builds capture nodes for one compiled pattern.
#[derive(Debug, Clone)]
pub struct PatternBuilder {
    spec: Arc<PatternSpec>,
}

impl PatternBuilder {
    pub fn compile(template: &str) -> Result<Self> {
        Ok(Self::from_spec(PatternSpec::compile(template)?))
    }

    pub fn compile_with(template: &str, options: PatternOptions) -> Result<Self> {
        Ok(Self::from_spec(PatternSpec::compile_with(template, options)?))
    }

    pub fn from_spec(spec: PatternSpec) -> Self {
        Self {
            spec: Arc::new(spec),
        }
    }

    pub fn spec(&self) -> &Arc<PatternSpec> {
        &self.spec
    }

    pub fn shared(self) -> SharedBuilder {
        Arc::new(self)
    }

    /// Parse with a template used in a single place. Every field is named.
    pub fn parse_once(template: &str, text: &str) -> Result<Node> {
        Self::anonymous(template)?.parse(text)
    }

    /// Build with a template used in a single place. Every field is named.
    pub fn build_once(template: &str, args: &Args) -> Result<Node> {
        Self::anonymous(template)?.build(args)
    }

    fn anonymous(template: &str) -> Result<Self> {
        Self::compile_with(
            template,
            PatternOptions::new().positionals(Vec::<String>::new()),
        )
    }

    /// Gather one value per placeholder: defaults, then positional, then named.
    fn collect_values(&self, args: &Args) -> Result<Vec<String>> {
        let spec = &self.spec;
        let template = spec.template();
        let placeholders = spec.placeholders();

        let mut values: Vec<Option<String>> = placeholders
            .iter()
            .map(|p| p.default_value().map(str::to_string))
            .collect();

        let slots: Vec<usize> = placeholders
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_positional())
            .map(|(i, _)| i)
            .collect();
        if args.positional().len() > slots.len() {
            return Err(ModifierError::construction(
                template,
                format!(
                    "expected at most {} positional values, got {}",
                    slots.len(),
                    args.positional().len()
                ),
            ));
        }
        for (&slot, value) in slots.iter().zip(args.positional()) {
            values[slot] = Some(value.clone());
        }

        for (name, value) in args.named() {
            let Some(i) = spec.index_of(name) else {
                return Err(ModifierError::construction(
                    template,
                    format!("no field `{name}`"),
                ));
            };
            values[i] = Some(value.clone());
        }

        values
            .into_iter()
            .zip(placeholders)
            .map(|(value, p)| {
                value.ok_or_else(|| {
                    ModifierError::construction(
                        template,
                        format!("no value for field `{}`", p.name()),
                    )
                })
            })
            .collect()
    }
}

impl Builder for PatternBuilder {
    fn parse(&self, text: &str) -> Result<Node> {
        let spec = &self.spec;
        let Some(captures) = spec.matcher().captures(text) else {
            return Err(ModifierError::mismatch(spec.template(), text));
        };

        let placeholders = spec.placeholders();
        let mut literals = Vec::with_capacity(placeholders.len() + 1);
        let mut fields = Vec::with_capacity(placeholders.len());
        let mut cursor = 0;
        for (i, placeholder) in placeholders.iter().enumerate() {
            let Some(capture) = captures.get(i + 1) else {
                return Err(ModifierError::mismatch(spec.template(), text));
            };
            literals.push(text[cursor..capture.start()].to_string());
            let value = match placeholder.nested() {
                Some(nested) => FieldValue::from(nested.parse(capture.as_str())?),
                None => FieldValue::Text(capture.as_str().to_string()),
            };
            fields.push(value);
            cursor = capture.end();
        }
        literals.push(text[cursor..].to_string());

        tracing::trace!(template = spec.template(), "Parsed capture node");

        Ok(Node::from_kind(NodeKind::Capture(CaptureNode {
            spec: Arc::clone(spec),
            literals: literals.into(),
            fields,
        })))
    }

    /// Fill the template with values and parse the result back.
    ///
    /// # Errors
    ///
    /// Returns [`ModifierError::Construction`] if arguments are missing or
    /// unknown, or if a value would be read back differently (for example
    /// because it contains the literal text following its placeholder).
    fn build(&self, args: &Args) -> Result<Node> {
        let template = self.spec.template();
        let values = self.collect_values(args)?;
        let text = self.spec.reconstruction().fill(&values);

        let node = self.parse(&text).map_err(|e| {
            ModifierError::construction(template, format!("filled text does not parse: {e}"))
        })?;

        if let Some(capture) = node.as_capture() {
            for ((name, field), value) in capture.fields().zip(&values) {
                let read_back = field.render();
                if &read_back != value {
                    return Err(ModifierError::construction(
                        template,
                        format!("value {value:?} for field `{name}` reads back as {read_back:?}"),
                    ));
                }
            }
        }
        Ok(node)
    }

    fn accepts(&self, node: &Node) -> bool {
        node.as_capture().is_some_and(|capture| {
            Arc::ptr_eq(&capture.spec, &self.spec) || capture.spec.template() == self.spec.template()
        })
    }
}

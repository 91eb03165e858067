/*
 * record.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Statically declared accessors over capture nodes.

use crate::error::{ModifierError, Result};
use crate::node::{FieldValue, Node};

/// Declare a record type wrapping a capture node.
///
/// Each entry maps a Rust accessor name to a placeholder name, so
/// placeholders that are Rust keywords stay reachable. The macro generates
/// `FIELDS`, `from_node`, `node`, `node_mut`, `into_node`, a getter per field
/// and a `set_<field>` setter per field.
///
/// # Example
///
/// ```
/// use texstep_core::{Builder, PatternBuilder, capture_record};
///
/// capture_record! {
///     /// One line of a diff hunk.
///     pub struct DiffLine {
///         modifier => "mod",
///         text => "text",
///     }
/// }
///
/// let builder = PatternBuilder::compile("<mod>/{<text>}").unwrap();
/// let mut line = DiffLine::from_node(builder.parse("+/{hello}").unwrap()).unwrap();
/// assert_eq!(*line.modifier(), "+");
/// line.set_modifier("-");
/// assert_eq!(line.node().render(), "-/{hello}");
/// ```
#[macro_export]
macro_rules! capture_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $field:ident => $placeholder:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            node: $crate::Node,
        }

        impl $name {
            /// Placeholder names this record reads and writes.
            pub const FIELDS: &'static [&'static str] = &[$($placeholder),*];

            /// Wrap a capture node that declares every field in `FIELDS`.
            pub fn from_node(node: $crate::Node) -> $crate::Result<Self> {
                $crate::record::check_fields(&node, Self::FIELDS)?;
                Ok(Self { node })
            }

            pub fn node(&self) -> &$crate::Node {
                &self.node
            }

            pub fn node_mut(&mut self) -> &mut $crate::Node {
                &mut self.node
            }

            pub fn into_node(self) -> $crate::Node {
                self.node
            }

            $(
                pub fn $field(&self) -> &$crate::FieldValue {
                    $crate::record::field(&self.node, $placeholder)
                }

                $crate::paste::paste! {
                    pub fn [<set_ $field>](
                        &mut self,
                        value: impl Into<$crate::FieldValue>,
                    ) -> &mut Self {
                        $crate::record::set_field(&mut self.node, $placeholder, value.into());
                        self
                    }
                }
            )*
        }

        impl TryFrom<$crate::Node> for $name {
            type Error = $crate::ModifierError;

            fn try_from(node: $crate::Node) -> ::std::result::Result<Self, Self::Error> {
                Self::from_node(node)
            }
        }
    };
}

/// Fail unless `node` is a capture node declaring all of `fields`.
#[doc(hidden)]
pub fn check_fields(node: &Node, fields: &[&str]) -> Result<()> {
    for field in fields {
        node.field(field)?;
    }
    Ok(())
}

/// Value of a field checked by [`check_fields`].
///
/// Reads as empty text if the wrapped node was since replaced by one
/// without the field.
#[doc(hidden)]
pub fn field<'a>(node: &'a Node, name: &str) -> &'a FieldValue {
    static MISSING: FieldValue = FieldValue::Text(String::new());
    node.field(name).unwrap_or(&MISSING)
}

#[doc(hidden)]
pub fn set_field(node: &mut Node, name: &str, value: FieldValue) {
    if let Err(ModifierError::UnknownField { field, template }) = node.set(name, value) {
        tracing::warn!(field = %field, template = %template, "Record field no longer present");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::capture::PatternBuilder;

    capture_record! {
        struct Branch {
            name => "name",
            color => "color",
        }
    }

    fn branch() -> Branch {
        let builder = PatternBuilder::compile(r"\Branch{<name>}{<color>}").unwrap();
        Branch::from_node(builder.parse(r"\Branch{main}{Blue4}").unwrap()).unwrap()
    }

    #[test]
    fn test_getters_and_setters() {
        let mut branch = branch();
        assert_eq!(*branch.name(), "main");
        branch.set_name("dev").set_color("Red3");
        assert_eq!(*branch.color(), "Red3");
        assert_eq!(branch.node().render(), r"\Branch{dev}{Red3}");
        assert_eq!(Branch::FIELDS, ["name", "color"]);
    }

    #[test]
    fn test_from_node_checks_fields() {
        let err = Branch::from_node(Node::constant("x")).unwrap_err();
        assert!(matches!(err, ModifierError::UnknownField { ref field, .. } if field == "name"));

        let other = PatternBuilder::compile("<name>:<kind>").unwrap();
        assert!(Branch::try_from(other.parse("a:b").unwrap()).is_err());
    }

    #[test]
    fn test_replaced_node_reads_empty() {
        let mut branch = branch();
        *branch.node_mut() = Node::constant("gone");
        assert_eq!(*branch.name(), "");
        branch.set_name("ignored");
        assert_eq!(branch.into_node().render(), "gone");
    }
}

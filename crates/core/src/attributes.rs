//! Synthesized attributes: what a node exposes on the XPath attribute axis.

use crate::syntax::{Point, SyntaxNode};
use std::path::Path;

/// Name of the attribute carrying a node's kind.
pub const KIND: &str = "type";
/// Name of the attribute carrying a node's start position.
pub const POSITION: &str = "pos";
/// Name of the optional attribute carrying a node's source text.
pub const SOURCE: &str = "src";

/// A read-only name/value pair derived from a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub value: String,
}

impl Attribute {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Derives the attributes of `node`: its kind, its position within `file`, then one
/// attribute per scalar field in declaration order.
pub fn synthesize<N: SyntaxNode>(node: &N, file: Option<&Path>) -> Vec<Attribute> {
    let mut attrs = vec![
        Attribute::new(KIND, node.kind()),
        Attribute::new(POSITION, position(file, node.span().start)),
    ];
    attrs.extend(
        node.scalars()
            .into_iter()
            .map(|(name, value)| Attribute::new(name, value.to_string())),
    );
    attrs
}

/// The `src` attribute of `node`: its text as reported by [`SyntaxNode::text`].
/// Only added when [`QueryConfig::source_attribute`](crate::QueryConfig) is set, after
/// the scalar fields.
pub fn source<N: SyntaxNode>(node: &N) -> Attribute {
    Attribute::new(SOURCE, node.text())
}

/// Renders a position as `file:line:column`, dropping the parts that are unknown.
pub fn position(file: Option<&Path>, point: Point) -> String {
    match (file, point.is_valid()) {
        (Some(file), true) => format!("{}:{}:{}", file.display(), point.line, point.column),
        (None, true) => format!("{}:{}", point.line, point.column),
        (Some(file), false) => file.display().to_string(),
        (None, false) => "-".to_string(),
    }
}

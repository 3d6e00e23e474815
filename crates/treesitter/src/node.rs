//! [`SyntaxNode`] over tree-sitter nodes.
//!
//! Only named nodes become children. Consecutive children stored under the same field
//! form one sequence field; children the grammar leaves unnamed are grouped under the
//! empty field name. Anonymous tokens stored under a field, such as the `operator` of a
//! binary expression, become scalar fields holding their source text, and a named leaf
//! exposes its own source as the scalar `text`.

use astpath_core::{Field, Point, Slot, Span, SyntaxNode};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name of the scalar field holding the source text of a named leaf.
pub const TEXT: &str = "text";

/// A tree-sitter node paired with the source it was parsed from.
#[derive(Clone, Copy)]
pub struct TsNode<'t> {
    node: tree_sitter::Node<'t>,
    source: &'t str,
}

impl<'t> TsNode<'t> {
    pub fn new(node: tree_sitter::Node<'t>, source: &'t str) -> Self {
        Self { node, source }
    }

    pub fn inner(&self) -> tree_sitter::Node<'t> {
        self.node
    }

    /// The source text covered by the node.
    pub fn source_text(&self) -> &'t str {
        self.source.get(self.node.byte_range()).unwrap_or_default()
    }

    fn wrap(&self, node: tree_sitter::Node<'t>) -> Self {
        Self::new(node, self.source)
    }
}

fn point(offset: usize, p: tree_sitter::Point) -> Point {
    Point::new(offset, p.row + 1, p.column + 1)
}

/// Appends `child` to the last field when it carries the same name, promoting a single
/// node to a sequence.
fn append<'t>(fields: &mut Vec<Field<TsNode<'t>>>, name: &'static str, child: TsNode<'t>) {
    if let Some(last) = fields.last_mut() {
        if last.name == name {
            match &mut last.slot {
                Slot::Nodes(nodes) => {
                    nodes.push(child);
                    return;
                }
                Slot::Node(first) => {
                    let first = *first;
                    last.slot = Slot::Nodes(vec![first, child]);
                    return;
                }
                Slot::Scalar(_) => {}
            }
        }
    }
    fields.push(Field::node(name, child));
}

impl SyntaxNode for TsNode<'_> {
    fn kind(&self) -> &'static str {
        self.node.kind()
    }

    fn span(&self) -> Span {
        Span::new(
            point(self.node.start_byte(), self.node.start_position()),
            point(self.node.end_byte(), self.node.end_position()),
        )
    }

    fn fields(&self) -> Vec<Field<Self>> {
        let mut fields = Vec::new();
        let mut cursor = self.node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                let name = cursor.field_name();
                if child.is_named() {
                    append(&mut fields, name.unwrap_or(""), self.wrap(child));
                } else if let Some(name) = name {
                    fields.push(Field::scalar(name, self.wrap(child).source_text()));
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        if self.node.is_named() && self.node.named_child_count() == 0 {
            fields.push(Field::scalar(TEXT, self.source_text()));
        }
        fields
    }

    fn text(&self) -> String {
        self.source_text().to_string()
    }
}

impl PartialEq for TsNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for TsNode<'_> {}

impl Hash for TsNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl fmt::Debug for TsNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.node.start_position();
        write!(f, "{}@{}:{}", self.kind(), start.row + 1, start.column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Language, ParsedFile};
    use astpath_core::{Inspector, Scalar};

    const GO: &str = "package main\n\nfunc main() {\n\tprint(\"a\")\n\tprintln(\"b\")\n}\n";
    const RUST: &str = "fn main() {\n    let x = 1 + 2;\n}\n";

    fn find<'t>(node: TsNode<'t>, kind: &str) -> Option<TsNode<'t>> {
        if node.kind() == kind {
            return Some(node);
        }
        node.fields().into_iter().find_map(|field| match field.slot {
            Slot::Node(child) => find(child, kind),
            Slot::Nodes(children) => children.into_iter().find_map(|c| find(c, kind)),
            Slot::Scalar(_) => None,
        })
    }

    #[test]
    fn test_field_names_and_scalars() {
        let file = ParsedFile::parse("main.rs", RUST, Language::Rust).unwrap();
        let binary = find(file.root(), "binary_expression").unwrap();
        let names: Vec<_> = binary.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["left", "operator", "right"]);
        assert_eq!(
            binary.scalars(),
            vec![("operator", Scalar::Str("+".into()))]
        );

        let literal = find(file.root(), "integer_literal").unwrap();
        assert_eq!(literal.scalars(), vec![(TEXT, Scalar::Str("1".into()))]);
        assert_eq!(literal.text(), "1");
    }

    #[test]
    fn test_unnamed_children_form_one_sequence() {
        let file = ParsedFile::parse("main.go", GO, Language::Go).unwrap();
        let root = file.root();
        assert_eq!(root.kind(), "source_file");
        let fields = root.fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "");
        let Slot::Nodes(children) = &fields[0].slot else {
            panic!("expected a sequence, got {:?}", fields[0].slot);
        };
        let kinds: Vec<_> = children.iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec!["package_clause", "function_declaration"]);
    }

    #[test]
    fn test_span_is_one_based() {
        let file = ParsedFile::parse("main.go", GO, Language::Go).unwrap();
        let func = find(file.root(), "function_declaration").unwrap();
        let span = func.span();
        assert_eq!((span.start.line, span.start.column), (3, 1));
        assert_eq!(span.start.offset, 14);
        assert_eq!((span.end.line, span.end.column), (6, 2));
        assert!(func.text().starts_with("func main()"));
    }

    #[test]
    fn test_identity() {
        let file = ParsedFile::parse("main.go", GO, Language::Go).unwrap();
        let a = find(file.root(), "function_declaration").unwrap();
        let b = find(file.root(), "function_declaration").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, file.root());
        assert_eq!(format!("{:?}", a), "function_declaration@3:1");
    }

    #[test]
    fn test_inspector_names() {
        let file = ParsedFile::parse("main.go", GO, Language::Go).unwrap();
        let inspector = Inspector::new([file.root()]);
        let func = find(file.root(), "function_declaration").unwrap();
        assert_eq!(inspector.name(&func), "");
        assert_eq!(inspector.index(&func), 1);
        let name = find(func, "identifier").unwrap();
        assert_eq!(inspector.name(&name), "name");
        assert_eq!(inspector.parent(&name), Some(func));
    }
}

//! The introspection capability a syntax tree must provide to be queried.
//!
//! Node shapes vary by kind, so instead of a fixed schema every node describes itself
//! as an ordered list of named fields. A field holds either child nodes or scalar data.

use std::fmt;
use std::hash::Hash;

/// A location in source text. Lines and columns are 1-based; line 0 marks "no position".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Point {
    pub const fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

/// The source extent of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Point,
    pub end: Point,
}

impl Span {
    /// A span with no position, as reported by an empty source set.
    pub const NONE: Span = Span {
        start: Point::new(0, 0, 0),
        end: Point::new(0, 0, 0),
    };

    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_valid()
    }

    /// From the start of `self` to the end of `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }
}

/// Data held directly by a node rather than through a child node.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(f64, f64),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Uint(u) => write!(f, "{}", u),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Complex(re, im) => write!(f, "({}{:+}i)", re, im),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

/// What a field holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<N> {
    /// A single child node.
    Node(N),
    /// An ordered sequence of child nodes.
    Nodes(Vec<N>),
    Scalar(Scalar),
}

/// One named field of a node, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<N> {
    pub name: &'static str,
    pub slot: Slot<N>,
}

impl<N> Field<N> {
    pub fn node(name: &'static str, node: N) -> Self {
        Self {
            name,
            slot: Slot::Node(node),
        }
    }

    pub fn nodes(name: &'static str, nodes: Vec<N>) -> Self {
        Self {
            name,
            slot: Slot::Nodes(nodes),
        }
    }

    pub fn scalar(name: &'static str, value: impl Into<Scalar>) -> Self {
        Self {
            name,
            slot: Slot::Scalar(value.into()),
        }
    }
}

/// A node of a syntax tree that can describe its own structure.
///
/// Handles are cheap to clone and compare by identity: two handles are equal exactly
/// when they denote the same node of the same tree.
pub trait SyntaxNode: Clone + Eq + Hash + fmt::Debug {
    /// The structural type tag of the node, such as `FuncDecl` or `call_expression`.
    fn kind(&self) -> &'static str;

    fn span(&self) -> Span;

    /// Every field of the node in declaration order.
    fn fields(&self) -> Vec<Field<Self>>;

    /// A string rendering of the node, used as its XPath string value.
    fn text(&self) -> String;

    /// The directly held scalar fields, in declaration order.
    fn scalars(&self) -> Vec<(&'static str, Scalar)> {
        self.fields()
            .into_iter()
            .filter_map(|field| match field.slot {
                Slot::Scalar(value) => Some((field.name, value)),
                _ => None,
            })
            .collect()
    }
}

//! The cursor the XPath engine drives over a [`SourceSet`].

use crate::attributes::{self, Attribute};
use crate::config::QueryConfig;
use crate::inspector::Inspector;
use crate::root::{NodeRef, SourceSet};
use crate::syntax::SyntaxNode;
use astpath_xpath::{NodeNavigator, NodeType};
use itertools::Itertools;
use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

const TRACE_TARGET: &str = "astpath::cursor";

/// The sibling list a cursor was reached through.
#[derive(Debug, Clone)]
enum Siblings<N> {
    /// Every file of the source set, at the root's child level.
    Files(usize),
    Nodes(Arc<[N]>),
}

impl<N: Clone> Siblings<N> {
    fn empty() -> Self {
        Siblings::Files(0)
    }

    fn len(&self) -> usize {
        match self {
            Siblings::Files(count) => *count,
            Siblings::Nodes(nodes) => nodes.len(),
        }
    }

    fn get(&self, index: usize) -> Option<NodeRef<N>> {
        match self {
            Siblings::Files(count) => (index < *count).then_some(NodeRef::File(index)),
            Siblings::Nodes(nodes) => nodes.get(index).cloned().map(NodeRef::Node),
        }
    }

    fn positions(&self) -> Vec<NodeRef<N>> {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }
}

/// A position in the tree plus the sibling list it was reached through.
///
/// Cloning is cheap: the inspector, source set and sibling list are shared and never
/// mutated, so a clone moves independently of the cursor it came from.
#[derive(Clone)]
pub struct Cursor<N: SyntaxNode> {
    inspector: Arc<Inspector<N>>,
    files: Arc<SourceSet<N>>,
    trace: bool,
    source_attribute: bool,
    current: NodeRef<N>,
    siblings: Siblings<N>,
    index: usize,
    /// Position within `attrs`, `None` when not iterating attributes.
    attr: Option<usize>,
    attrs: Arc<[Attribute]>,
}

impl<N: SyntaxNode> Cursor<N> {
    /// A cursor on the synthetic root of `files`.
    pub fn new(inspector: Arc<Inspector<N>>, files: Arc<SourceSet<N>>, config: &QueryConfig) -> Self {
        Self {
            inspector,
            files,
            trace: config.trace,
            source_attribute: config.source_attribute,
            current: NodeRef::Root,
            siblings: Siblings::empty(),
            index: 0,
            attr: None,
            attrs: Arc::from(Vec::new()),
        }
    }

    pub fn position(&self) -> &NodeRef<N> {
        &self.current
    }

    pub fn is_root(&self) -> bool {
        self.current.is_root()
    }

    /// The syntax node under the cursor, or the owner of the current attribute.
    /// `None` on the synthetic root.
    pub fn node(&self) -> Option<N> {
        match &self.current {
            NodeRef::Root => None,
            NodeRef::File(i) => self.files.get(*i).map(|file| file.root().clone()),
            NodeRef::Node(node) => Some(node.clone()),
        }
    }

    /// The attribute under the cursor, when iterating attributes.
    pub fn attribute(&self) -> Option<&Attribute> {
        self.attr.and_then(|i| self.attrs.get(i))
    }

    /// The kind of the current node, or the name of the current attribute.
    pub fn kind(&self) -> &str {
        if let Some(attr) = self.attribute() {
            return attr.name;
        }
        self.kind_of(&self.current)
    }

    /// The positions sharing the current parent, the current one included.
    pub fn siblings(&self) -> Vec<NodeRef<N>> {
        self.siblings.positions()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn inspector(&self) -> &Arc<Inspector<N>> {
        &self.inspector
    }

    fn kind_of(&self, position: &NodeRef<N>) -> &'static str {
        match position {
            NodeRef::Root => "",
            NodeRef::File(i) => self.files.get(*i).map_or("", |file| file.root().kind()),
            NodeRef::Node(node) => node.kind(),
        }
    }

    /// Lifts a node to a file position when it is the top-level node of a file.
    fn lift(&self, node: N) -> NodeRef<N> {
        match self.files.index_of(&node) {
            Some(i) => NodeRef::File(i),
            None => NodeRef::Node(node),
        }
    }

    fn children_of(&self, position: &NodeRef<N>) -> Siblings<N> {
        match position {
            NodeRef::Root => Siblings::Files(self.files.len()),
            NodeRef::File(i) => match self.files.get(*i) {
                Some(file) => Siblings::Nodes(self.inspector.children(file.root())),
                None => Siblings::empty(),
            },
            NodeRef::Node(node) => Siblings::Nodes(self.inspector.children(node)),
        }
    }

    /// The origin path of the file containing the current position.
    fn origin(&self) -> Option<&Path> {
        let file = match &self.current {
            NodeRef::Root => return None,
            NodeRef::File(i) => *i,
            NodeRef::Node(node) => {
                let root = self.inspector.root_of(node)?;
                let root = self.inspector.roots().get(root)?;
                self.files.index_of(root)?
            }
        };
        self.files.get(file).map(|file| file.path())
    }

    fn synthesize(&self) -> Vec<Attribute> {
        let Some(node) = self.node() else {
            return Vec::new();
        };
        let mut attrs = attributes::synthesize(&node, self.origin());
        if self.source_attribute {
            attrs.push(attributes::source(&node));
        }
        attrs
    }

    fn trace(&self, op: &str) {
        if !self.trace {
            return;
        }
        log::trace!(
            target: TRACE_TARGET,
            "{} {}[{}] siblings=[{}]",
            op,
            self.kind(),
            self.index,
            self.siblings
                .positions()
                .iter()
                .map(|s| self.kind_of(s))
                .join(",")
        );
    }
}

impl<N: SyntaxNode> NodeNavigator for Cursor<N> {
    fn node_type(&self) -> NodeType {
        if self.current.is_root() {
            NodeType::Root
        } else if self.attr.is_some() {
            NodeType::Attribute
        } else {
            NodeType::Element
        }
    }

    fn local_name(&self) -> Cow<'_, str> {
        if let Some(attr) = self.attribute() {
            return Cow::Borrowed(attr.name);
        }
        match &self.current {
            NodeRef::Root => Cow::Borrowed(""),
            NodeRef::File(i) => Cow::Borrowed(self.files.get(*i).map_or("", |file| file.name())),
            NodeRef::Node(node) => Cow::Borrowed(self.inspector.name(node)),
        }
    }

    fn value(&self) -> String {
        if let Some(attr) = self.attribute() {
            return attr.value.clone();
        }
        match &self.current {
            NodeRef::Root => String::new(),
            NodeRef::File(i) => self
                .files
                .get(*i)
                .map(|file| file.name().to_string())
                .unwrap_or_default(),
            NodeRef::Node(node) => node.text(),
        }
    }

    fn move_to_root(&mut self) {
        self.current = NodeRef::Root;
        self.siblings = Siblings::empty();
        self.index = 0;
        self.attr = None;
        self.attrs = Arc::from(Vec::new());
        self.trace("#");
    }

    fn move_to_parent(&mut self) -> bool {
        if self.attr.take().is_some() {
            self.trace("^attr");
            return true;
        }

        let parent = match &self.current {
            NodeRef::Root => return false,
            NodeRef::File(_) => {
                self.move_to_root();
                return true;
            }
            NodeRef::Node(node) => self.inspector.parent(node),
        };

        let Some(parent) = parent else {
            // Detached nodes fold into the root.
            self.move_to_root();
            return true;
        };

        let current = self.lift(parent);
        (self.siblings, self.index) = match &current {
            NodeRef::File(i) => (Siblings::Files(self.files.len()), *i),
            NodeRef::Node(node) => match self.inspector.parent(node) {
                Some(grandparent) => (
                    Siblings::Nodes(self.inspector.children(&grandparent)),
                    self.inspector.ordinal(node),
                ),
                None => (Siblings::Nodes(Arc::from(vec![node.clone()])), 0),
            },
            NodeRef::Root => (Siblings::empty(), 0),
        };
        self.current = current;
        self.trace("^");
        true
    }

    fn move_to_next_attribute(&mut self) -> bool {
        let next = match self.attr {
            None => {
                self.attrs = self.synthesize().into();
                0
            }
            Some(i) => i + 1,
        };
        if next >= self.attrs.len() {
            return false;
        }
        self.attr = Some(next);
        self.trace("@");
        true
    }

    fn move_to_child(&mut self) -> bool {
        if self.attr.is_some() {
            return false;
        }
        let children = self.children_of(&self.current);
        let Some(first) = children.get(0) else {
            self.trace("/");
            return false;
        };
        self.siblings = children;
        self.index = 0;
        self.current = first;
        self.trace("v");
        true
    }

    fn move_to_first(&mut self) -> bool {
        if self.attr.is_some() {
            return false;
        }
        let Some(first) = self.siblings.get(0) else {
            return false;
        };
        self.index = 0;
        self.current = first;
        self.trace("<<");
        true
    }

    fn move_to_next(&mut self) -> bool {
        if self.attr.is_some() {
            return false;
        }
        let Some(next) = self.siblings.get(self.index + 1) else {
            return false;
        };
        self.index += 1;
        self.current = next;
        self.trace("+");
        true
    }

    fn move_to_previous(&mut self) -> bool {
        if self.attr.is_some() || self.index == 0 {
            return false;
        }
        let Some(previous) = self.siblings.get(self.index - 1) else {
            return false;
        };
        self.index -= 1;
        self.current = previous;
        self.trace("-");
        true
    }

    fn move_to(&mut self, other: &Self) -> bool {
        // File positions are indices into the source set, so both must be shared.
        if !Arc::ptr_eq(&self.inspector, &other.inspector) || !Arc::ptr_eq(&self.files, &other.files)
        {
            return false;
        }
        self.current = other.current.clone();
        self.siblings = other.siblings.clone();
        self.index = other.index;
        self.attr = other.attr;
        self.attrs = Arc::clone(&other.attrs);
        self.trace("@=");
        true
    }

    fn sibling_index(&self) -> usize {
        self.index
    }

    fn attribute_index(&self) -> Option<usize> {
        self.attr
    }
}

impl<N: SyntaxNode> fmt::Debug for Cursor<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("current", &self.current)
            .field("index", &self.index)
            .field("siblings", &self.siblings.len())
            .field("attr", &self.attribute())
            .finish()
    }
}

//! Defines the cursor protocol the engine drives while evaluating an expression.

/// The type of the node a navigator is positioned on, aligned with the XPath 1.0 data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

/// A stateful cursor over a read-only tree.
///
/// The engine never sees the tree itself. It forks navigators with `Clone`, moves them
/// with the `move_to_*` family and reads the current position through the accessors.
/// Implementations must keep clones fully independent: moving a clone never changes
/// the navigator it was cloned from.
///
/// Movement methods return `false` and leave the navigator untouched when the move
/// is impossible, with the exception of `move_to_root`, which always succeeds.
pub trait NodeNavigator: Clone + std::fmt::Debug {
    /// The type of the current position.
    fn node_type(&self) -> NodeType;

    /// The local name of the current element or attribute. Empty for the root.
    fn local_name(&self) -> std::borrow::Cow<'_, str>;

    /// The namespace prefix of the current name.
    fn prefix(&self) -> &str {
        ""
    }

    /// The string value of the current position, as used by `string()`.
    fn value(&self) -> String;

    /// Resets the navigator to the root of the tree.
    fn move_to_root(&mut self);

    /// Moves to the parent. Leaving an attribute moves back to the element owning it.
    fn move_to_parent(&mut self) -> bool;

    /// Moves to the first attribute on the first call for an element, then to each
    /// following attribute.
    fn move_to_next_attribute(&mut self) -> bool;

    /// Moves to the first child of the current element.
    fn move_to_child(&mut self) -> bool;

    /// Moves to the first sibling of the current node.
    fn move_to_first(&mut self) -> bool;

    /// Moves to the next sibling of the current node.
    fn move_to_next(&mut self) -> bool;

    /// Moves to the previous sibling of the current node.
    fn move_to_previous(&mut self) -> bool;

    /// Adopts the position of `other`. Fails when `other` navigates a different tree.
    fn move_to(&mut self, other: &Self) -> bool;

    /// Number of siblings preceding the current node.
    fn sibling_index(&self) -> usize {
        let mut nav = self.clone();
        let mut index = 0;
        while nav.move_to_previous() {
            index += 1;
        }
        index
    }

    /// Slot of the current attribute in its element's attribute order, `None` when
    /// not on an attribute.
    ///
    /// The provided version locates the slot by name, which is ambiguous when an
    /// element repeats an attribute name. Navigators that track the slot should
    /// report it directly.
    fn attribute_index(&self) -> Option<usize> {
        if self.node_type() != NodeType::Attribute {
            return None;
        }
        let name = self.local_name();
        let mut nav = self.clone();
        if !nav.move_to_parent() {
            return None;
        }
        let mut slot = 0;
        while nav.move_to_next_attribute() {
            if nav.local_name() == name {
                return Some(slot);
            }
            slot += 1;
        }
        None
    }
}

// Test utilities - publicly available for integration testing in downstream crates
pub mod tests {
    use super::*;
    use std::borrow::Cow;

    #[derive(Debug, Clone)]
    struct MockNodeData {
        node_type: NodeType,
        name: &'static str,
        value: String,
        parent: Option<usize>,
        children: Vec<usize>,
        attributes: Vec<usize>,
    }

    #[derive(Debug)]
    pub struct MockTree {
        nodes: Vec<MockNodeData>,
    }

    impl MockTree {
        fn siblings(&self, id: usize) -> &[usize] {
            match self.nodes[id].parent {
                Some(parent) => &self.nodes[parent].children,
                None => &[],
            }
        }
    }

    /// A navigator over a `MockTree`, tracking a node id and an optional attribute slot.
    #[derive(Debug, Clone)]
    pub struct MockNavigator<'a> {
        tree: &'a MockTree,
        node: usize,
        attr: Option<usize>,
    }

    impl<'a> MockNavigator<'a> {
        pub fn new(tree: &'a MockTree) -> Self {
            Self {
                tree,
                node: 0,
                attr: None,
            }
        }

        /// The id of the current node. Attributes carry ids of their own.
        pub fn id(&self) -> usize {
            match self.attr {
                Some(slot) => self.tree.nodes[self.node].attributes[slot],
                None => self.node,
            }
        }

        fn data(&self) -> &MockNodeData {
            &self.tree.nodes[self.id()]
        }

        fn step_sibling(&mut self, forward: bool) -> bool {
            if self.attr.is_some() {
                return false;
            }
            let siblings = self.tree.siblings(self.node);
            let Some(index) = siblings.iter().position(|&s| s == self.node) else {
                return false;
            };
            let target = if forward {
                siblings.get(index + 1)
            } else {
                index.checked_sub(1).and_then(|i| siblings.get(i))
            };
            match target {
                Some(&next) => {
                    self.node = next;
                    true
                }
                None => false,
            }
        }
    }

    impl NodeNavigator for MockNavigator<'_> {
        fn node_type(&self) -> NodeType {
            self.data().node_type
        }

        fn local_name(&self) -> Cow<'_, str> {
            Cow::Borrowed(self.data().name)
        }

        fn value(&self) -> String {
            self.data().value.clone()
        }

        fn move_to_root(&mut self) {
            self.node = 0;
            self.attr = None;
        }

        fn move_to_parent(&mut self) -> bool {
            if self.attr.take().is_some() {
                return true;
            }
            match self.tree.nodes[self.node].parent {
                Some(parent) => {
                    self.node = parent;
                    true
                }
                None => false,
            }
        }

        fn move_to_next_attribute(&mut self) -> bool {
            let next = self.attr.map_or(0, |slot| slot + 1);
            if next < self.tree.nodes[self.node].attributes.len() {
                self.attr = Some(next);
                true
            } else {
                false
            }
        }

        fn move_to_child(&mut self) -> bool {
            if self.attr.is_some() {
                return false;
            }
            match self.tree.nodes[self.node].children.first() {
                Some(&child) => {
                    self.node = child;
                    true
                }
                None => false,
            }
        }

        fn move_to_first(&mut self) -> bool {
            if self.attr.is_some() {
                return false;
            }
            match self.tree.siblings(self.node).first() {
                Some(&first) => {
                    self.node = first;
                    true
                }
                None => false,
            }
        }

        fn move_to_next(&mut self) -> bool {
            self.step_sibling(true)
        }

        fn move_to_previous(&mut self) -> bool {
            self.step_sibling(false)
        }

        fn move_to(&mut self, other: &Self) -> bool {
            if !std::ptr::eq(self.tree, other.tree) {
                return false;
            }
            self.node = other.node;
            self.attr = other.attr;
            true
        }

        fn attribute_index(&self) -> Option<usize> {
            self.attr
        }
    }

    /// Creates a simple mock tree for testing:
    /// <root> <!-- id 0 -->
    ///   <para id="p1" lang="en">Hello</para> <!-- id 1, attrs 2&3, text 4 -->
    ///   <div></div> <!-- id 5 -->
    ///   <para>World</para> <!-- id 6, text 7 -->
    /// </root>
    pub fn create_test_tree() -> MockTree {
        let node = |node_type, name, value: &str, parent| MockNodeData {
            node_type,
            name,
            value: value.to_string(),
            parent,
            children: vec![],
            attributes: vec![],
        };

        let mut nodes = vec![
            node(NodeType::Root, "", "HelloWorld", None),
            node(NodeType::Element, "para", "Hello", Some(0)),
            node(NodeType::Attribute, "id", "p1", Some(1)),
            node(NodeType::Attribute, "lang", "en", Some(1)),
            node(NodeType::Text, "", "Hello", Some(1)),
            node(NodeType::Element, "div", "", Some(0)),
            node(NodeType::Element, "para", "World", Some(0)),
            node(NodeType::Text, "", "World", Some(6)),
        ];
        nodes[0].children = vec![1, 5, 6];
        nodes[1].children = vec![4];
        nodes[1].attributes = vec![2, 3];
        nodes[6].children = vec![7];

        MockTree { nodes }
    }

    #[test]
    fn test_mock_navigator_protocol() {
        let tree = create_test_tree();
        let mut nav = MockNavigator::new(&tree);
        assert_eq!(nav.node_type(), NodeType::Root);
        assert!(nav.move_to_child());
        assert_eq!(nav.local_name(), "para");
        assert!(nav.move_to_next_attribute());
        assert_eq!(nav.node_type(), NodeType::Attribute);
        assert_eq!(nav.value(), "p1");
        assert!(!nav.move_to_next());
        assert!(nav.move_to_parent());
        assert_eq!(nav.id(), 1);
        assert!(nav.move_to_next());
        assert!(nav.move_to_next());
        assert!(!nav.move_to_next());
        assert!(nav.move_to_first());
        assert_eq!(nav.id(), 1);
    }

    #[test]
    fn test_sibling_and_attribute_slots() {
        let tree = create_test_tree();
        let mut nav = MockNavigator::new(&tree);
        assert_eq!(nav.sibling_index(), 0);
        assert_eq!(nav.attribute_index(), None);
        assert!(nav.move_to_child());
        assert!(nav.move_to_next());
        assert!(nav.move_to_next());
        assert_eq!(nav.sibling_index(), 2);
        assert!(nav.move_to_first());
        assert!(nav.move_to_next_attribute());
        assert!(nav.move_to_next_attribute());
        assert_eq!(nav.attribute_index(), Some(1));
    }
}

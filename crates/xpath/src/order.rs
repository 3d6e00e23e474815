//! Document order for navigator positions.
//!
//! Navigators carry no global identity, so a position's place in the document is
//! reconstructed by walking to the root and recording the sibling index at every level.

use crate::navigator::NodeNavigator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Segment {
    // Attributes of an element come before its children.
    Attribute(usize),
    Child(usize),
}

/// The root-to-node address of a position. Comparing keys compares document order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentKey(Vec<Segment>);

impl DocumentKey {
    pub fn of<N: NodeNavigator>(node: &N) -> Self {
        let mut nav = node.clone();
        let mut segments = Vec::new();

        if let Some(slot) = nav.attribute_index() {
            if nav.move_to_parent() {
                segments.push(Segment::Attribute(slot));
            }
        }

        loop {
            let index = nav.sibling_index();
            if !nav.move_to_parent() {
                break;
            }
            segments.push(Segment::Child(index));
        }

        segments.reverse();
        DocumentKey(segments)
    }

    /// Number of levels below the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

/// Sorts positions into document order and drops duplicates.
pub fn sort_document_order<N: NodeNavigator>(nodes: Vec<N>) -> Vec<N> {
    if nodes.len() < 2 {
        return nodes;
    }
    let mut keyed: Vec<(DocumentKey, N)> = nodes
        .into_iter()
        .map(|node| (DocumentKey::of(&node), node))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.dedup_by(|a, b| a.0 == b.0);
    keyed.into_iter().map(|(_, node)| node).collect()
}

/// True when both navigators sit on the same position.
pub fn is_same_position<N: NodeNavigator>(a: &N, b: &N) -> bool {
    DocumentKey::of(a) == DocumentKey::of(b)
}

//! Collects the nodes along each XPath axis by driving a navigator.
//!
//! Every collector returns nodes in proximity order: document order for forward
//! axes, reverse document order for reverse axes.

use crate::ast::{Axis, NodeTest, NodeTypeTest};
use crate::navigator::{NodeNavigator, NodeType};

/// Collects every node on `axis` from `node`, in proximity order.
pub fn collect<N: NodeNavigator>(axis: Axis, node: &N) -> Vec<N> {
    let mut out = Vec::new();
    match axis {
        Axis::SelfAxis => out.push(node.clone()),
        Axis::Child => collect_children(node, &mut out),
        Axis::Attribute => collect_attributes(node, &mut out),
        Axis::Descendant => collect_descendants(node, &mut out),
        Axis::DescendantOrSelf => {
            out.push(node.clone());
            collect_descendants(node, &mut out);
        }
        Axis::Parent => {
            let mut nav = node.clone();
            if nav.move_to_parent() {
                out.push(nav);
            }
        }
        Axis::Ancestor => collect_ancestors(node, &mut out),
        Axis::AncestorOrSelf => {
            out.push(node.clone());
            collect_ancestors(node, &mut out);
        }
        Axis::FollowingSibling => {
            let mut nav = node.clone();
            while nav.move_to_next() {
                out.push(nav.clone());
            }
        }
        Axis::PrecedingSibling => {
            let mut nav = node.clone();
            while nav.move_to_previous() {
                out.push(nav.clone());
            }
        }
        Axis::Following => collect_following(node, &mut out),
        Axis::Preceding => collect_preceding(node, &mut out),
    }
    out
}

/// Applies a node test. Name tests and `*` match the axis' principal node type.
pub fn matches<N: NodeNavigator>(node: &N, test: &NodeTest, axis: Axis) -> bool {
    let principal = if axis == Axis::Attribute {
        NodeType::Attribute
    } else {
        NodeType::Element
    };
    match test {
        NodeTest::Wildcard => node.node_type() == principal,
        NodeTest::Name(name) => node.node_type() == principal && qualified_name(node) == *name,
        NodeTest::NodeType(NodeTypeTest::Node) => true,
        NodeTest::NodeType(NodeTypeTest::Text) => node.node_type() == NodeType::Text,
        NodeTest::NodeType(NodeTypeTest::Comment) => node.node_type() == NodeType::Comment,
        NodeTest::NodeType(NodeTypeTest::ProcessingInstruction) => {
            node.node_type() == NodeType::ProcessingInstruction
        }
    }
}

/// The `prefix:local` name of a position, or just the local name without a prefix.
pub fn qualified_name<N: NodeNavigator>(node: &N) -> String {
    let prefix = node.prefix();
    if prefix.is_empty() {
        node.local_name().into_owned()
    } else {
        format!("{}:{}", prefix, node.local_name())
    }
}

fn collect_children<N: NodeNavigator>(node: &N, out: &mut Vec<N>) {
    let mut nav = node.clone();
    if !nav.move_to_child() {
        return;
    }
    out.push(nav.clone());
    while nav.move_to_next() {
        out.push(nav.clone());
    }
}

fn collect_attributes<N: NodeNavigator>(node: &N, out: &mut Vec<N>) {
    if node.node_type() == NodeType::Attribute {
        return;
    }
    let mut nav = node.clone();
    while nav.move_to_next_attribute() {
        out.push(nav.clone());
    }
}

/// Pre-order walk below `node`, without `node` itself.
fn collect_descendants<N: NodeNavigator>(node: &N, out: &mut Vec<N>) {
    let mut nav = node.clone();
    if !nav.move_to_child() {
        return;
    }
    let mut depth = 1usize;
    loop {
        out.push(nav.clone());
        if nav.move_to_child() {
            depth += 1;
            continue;
        }
        while !nav.move_to_next() {
            if !nav.move_to_parent() {
                return;
            }
            depth -= 1;
            if depth == 0 {
                return;
            }
        }
    }
}

fn collect_ancestors<N: NodeNavigator>(node: &N, out: &mut Vec<N>) {
    let mut nav = node.clone();
    while nav.move_to_parent() {
        out.push(nav.clone());
    }
}

fn collect_following<N: NodeNavigator>(node: &N, out: &mut Vec<N>) {
    let mut nav = node.clone();
    if nav.node_type() == NodeType::Attribute && nav.move_to_parent() {
        collect_descendants(&nav, out);
    }
    loop {
        let mut sibling = nav.clone();
        while sibling.move_to_next() {
            out.push(sibling.clone());
            collect_descendants(&sibling, out);
        }
        if !nav.move_to_parent() {
            break;
        }
    }
}

fn collect_preceding<N: NodeNavigator>(node: &N, out: &mut Vec<N>) {
    let mut nav = node.clone();
    if nav.node_type() == NodeType::Attribute {
        nav.move_to_parent();
    }
    loop {
        let mut sibling = nav.clone();
        while sibling.move_to_previous() {
            let mut subtree = vec![sibling.clone()];
            collect_descendants(&sibling, &mut subtree);
            out.extend(subtree.into_iter().rev());
        }
        if !nav.move_to_parent() {
            break;
        }
    }
}

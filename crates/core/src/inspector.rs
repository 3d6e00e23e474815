//! Parent, ancestor and field-position lookups over a set of syntax trees.

use crate::syntax::{SyntaxNode, Slot};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Link<N> {
    parent: Option<N>,
    /// Field of `parent` holding the node.
    name: &'static str,
    /// Position within that field when it is a sequence, else 0.
    index: usize,
    /// Position among all children of `parent`.
    ordinal: usize,
    /// Ordinal of the top-level tree containing the node.
    root: usize,
    children: Arc<[N]>,
}

/// A read-only index from every node of a forest to its parent.
///
/// The index is built by one pre-order walk in [`Inspector::new`] and never changes
/// afterwards, so an `Inspector` can be shared across threads behind an `Arc`. Child
/// lists are captured during the walk and handed out without asking the nodes again.
#[derive(Debug)]
pub struct Inspector<N: SyntaxNode> {
    roots: Vec<N>,
    links: HashMap<N, Link<N>>,
}

impl<N: SyntaxNode> Inspector<N> {
    pub fn new(roots: impl IntoIterator<Item = N>) -> Self {
        let roots: Vec<N> = roots.into_iter().collect();
        let mut links = HashMap::new();

        for (ordinal, root) in roots.iter().enumerate() {
            if links.contains_key(root) {
                continue;
            }
            links.insert(
                root.clone(),
                Link {
                    parent: None,
                    name: "",
                    index: 0,
                    ordinal: 0,
                    root: ordinal,
                    children: Arc::from(Vec::new()),
                },
            );

            let mut stack = vec![root.clone()];
            while let Some(node) = stack.pop() {
                let links_of_node = child_links(&node);
                let mut children = Vec::with_capacity(links_of_node.len());
                let mut discovered = Vec::new();
                for (position, (child, name, index)) in links_of_node.into_iter().enumerate() {
                    children.push(child.clone());
                    // A node reachable twice keeps its first position.
                    if links.contains_key(&child) {
                        continue;
                    }
                    links.insert(
                        child.clone(),
                        Link {
                            parent: Some(node.clone()),
                            name,
                            index,
                            ordinal: position,
                            root: ordinal,
                            children: Arc::from(Vec::new()),
                        },
                    );
                    discovered.push(child);
                }
                if let Some(link) = links.get_mut(&node) {
                    link.children = children.into();
                }
                stack.extend(discovered.into_iter().rev());
            }
        }

        log::debug!(
            "indexed {} nodes across {} trees",
            links.len(),
            roots.len()
        );
        Self { roots, links }
    }

    /// The immediate structural children of `node`, in field declaration order.
    /// Nodes outside the indexed forest are asked for their fields directly.
    pub fn children(&self, node: &N) -> Arc<[N]> {
        match self.links.get(node) {
            Some(link) => Arc::clone(&link.children),
            None => child_links(node)
                .into_iter()
                .map(|(child, _, _)| child)
                .collect(),
        }
    }

    /// The nodes from the top-level tree down to `node`, both inclusive.
    /// Empty when `node` is not part of the indexed forest.
    pub fn stack(&self, node: &N) -> Vec<N> {
        let mut stack = self.path(node);
        stack.reverse();
        stack
    }

    /// [`Inspector::stack`] reversed: `node` first, its top-level tree last.
    pub fn path(&self, node: &N) -> Vec<N> {
        let mut path = Vec::new();
        let mut current = self.links.get(node).map(|_| node.clone());
        while let Some(n) = current {
            current = self.links.get(&n).and_then(|link| link.parent.clone());
            path.push(n);
        }
        path
    }

    pub fn parent(&self, node: &N) -> Option<N> {
        self.links.get(node).and_then(|link| link.parent.clone())
    }

    /// The name of the field of the parent that holds `node`. Empty for top-level
    /// trees, unknown nodes and unnamed slots.
    pub fn name(&self, node: &N) -> &'static str {
        self.links.get(node).map_or("", |link| link.name)
    }

    /// The position of `node` within its parent's sequence field, 0 otherwise.
    pub fn index(&self, node: &N) -> usize {
        self.links.get(node).map_or(0, |link| link.index)
    }

    /// The position of `node` among all children of its parent, 0 for top-level trees
    /// and unknown nodes.
    pub fn ordinal(&self, node: &N) -> usize {
        self.links.get(node).map_or(0, |link| link.ordinal)
    }

    /// The ordinal of the top-level tree containing `node`.
    pub fn root_of(&self, node: &N) -> Option<usize> {
        self.links.get(node).map(|link| link.root)
    }

    pub fn roots(&self) -> &[N] {
        &self.roots
    }

    pub fn contains(&self, node: &N) -> bool {
        self.links.contains_key(node)
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Children of `node` with the field name and sequence position each is held under.
fn child_links<N: SyntaxNode>(node: &N) -> Vec<(N, &'static str, usize)> {
    let mut out = Vec::new();
    for field in node.fields() {
        match field.slot {
            Slot::Node(child) => out.push((child, field.name, 0)),
            Slot::Nodes(children) => {
                out.extend(
                    children
                        .into_iter()
                        .enumerate()
                        .map(|(i, child)| (child, field.name, i)),
                );
            }
            Slot::Scalar(_) => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, MockAst};

    #[test]
    fn test_children_follow_field_order() {
        let ast = fixture::single_return();
        let file = ast.root(0);
        let inspector = Inspector::new(ast.roots());

        let kinds: Vec<_> = inspector.children(&file).iter().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec!["Ident", "FuncDecl"]);

        let func = inspector.children(&file)[1].clone();
        let kinds: Vec<_> = inspector.children(&func).iter().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec!["Ident", "FuncType", "BlockStmt"]);
    }

    #[test]
    fn test_stack_path_parent() {
        let ast = fixture::single_return();
        let inspector = Inspector::new(ast.roots());
        let ret = ast.find("ReturnStmt").unwrap();

        let stack: Vec<_> = inspector.stack(&ret).iter().map(|n| n.kind()).collect();
        assert_eq!(stack, vec!["File", "FuncDecl", "BlockStmt", "ReturnStmt"]);
        let path: Vec<_> = inspector.path(&ret).iter().map(|n| n.kind()).collect();
        assert_eq!(path, vec!["ReturnStmt", "BlockStmt", "FuncDecl", "File"]);

        assert_eq!(inspector.parent(&ret).unwrap().kind(), "BlockStmt");
        assert_eq!(inspector.parent(&ast.root(0)), None);
    }

    #[test]
    fn test_field_names_and_indices() {
        let ast = fixture::assign_then_return();
        let inspector = Inspector::new(ast.roots());

        let func = ast.find("FuncDecl").unwrap();
        assert_eq!(inspector.name(&func), "Decls");
        assert_eq!(inspector.index(&func), 0);

        let ret = ast.find("ReturnStmt").unwrap();
        assert_eq!(inspector.name(&ret), "List");
        assert_eq!(inspector.index(&ret), 1);
        assert_eq!(inspector.ordinal(&ret), 1);

        let body = ast.find("BlockStmt").unwrap();
        assert_eq!(inspector.name(&body), "Body");
        assert_eq!(inspector.index(&body), 0);
        // Name and Type come before Body.
        assert_eq!(inspector.ordinal(&body), 2);

        assert_eq!(inspector.name(&ast.root(0)), "");
    }

    #[test]
    fn test_unknown_nodes() {
        let ast = fixture::single_return();
        let inspector = Inspector::new(ast.roots());

        let mut other = MockAst::new();
        let stray = other.node("Ident", 1, 1).scalar("Name", "x").build();
        let stray = other.get(stray);

        assert!(!inspector.contains(&stray));
        assert!(inspector.stack(&stray).is_empty());
        assert!(inspector.path(&stray).is_empty());
        assert_eq!(inspector.parent(&stray), None);
        assert_eq!(inspector.name(&stray), "");
        assert_eq!(inspector.index(&stray), 0);
        assert_eq!(inspector.ordinal(&stray), 0);
        assert_eq!(inspector.root_of(&stray), None);
        assert!(inspector.children(&stray).is_empty());
    }

    #[test]
    fn test_multiple_roots() {
        let ast = fixture::two_files();
        let inspector = Inspector::new(ast.roots());
        assert_eq!(inspector.roots().len(), 2);

        let second = ast.root(1);
        let leaf = inspector.children(&second)[0].clone();
        assert_eq!(inspector.root_of(&leaf), Some(1));
        assert_eq!(inspector.stack(&leaf)[0], second);
        assert!(inspector.len() > 2);
        assert!(!inspector.is_empty());
    }
}

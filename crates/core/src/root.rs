//! The synthetic root that joins independently parsed files into one tree.

use crate::syntax::{Span, SyntaxNode};
use std::path::{Path, PathBuf};

/// One parsed file: its origin, display name and top-level node.
#[derive(Debug, Clone)]
pub struct SourceFile<N> {
    path: PathBuf,
    name: String,
    root: N,
}

impl<N> SourceFile<N> {
    pub fn new(path: impl Into<PathBuf>, root: N) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name, root }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The base name of the origin path.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &N {
        &self.root
    }
}

/// An ordered set of files, presented to queries as the children of one root.
#[derive(Debug, Clone)]
pub struct SourceSet<N> {
    files: Vec<SourceFile<N>>,
}

impl<N> Default for SourceSet<N> {
    fn default() -> Self {
        Self { files: Vec::new() }
    }
}

impl<N: SyntaxNode> SourceSet<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<PathBuf>, root: N) {
        self.files.push(SourceFile::new(path, root));
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, root: N) -> Self {
        self.push(path, root);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SourceFile<N>> {
        self.files.get(index)
    }

    /// The first file whose display name is `name`.
    pub fn by_name(&self, name: &str) -> Option<&SourceFile<N>> {
        self.files.iter().find(|file| file.name == name)
    }

    /// The position of the file whose top-level node is `root`.
    pub fn index_of(&self, root: &N) -> Option<usize> {
        self.files.iter().position(|file| file.root == *root)
    }

    /// Top-level nodes in file order.
    pub fn roots(&self) -> Vec<N> {
        self.files.iter().map(|file| file.root.clone()).collect()
    }

    pub fn files(&self) -> &[SourceFile<N>] {
        &self.files
    }

    /// `(display name, top-level node)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &N)> {
        self.files.iter().map(|file| (file.name(), file.root()))
    }

    /// From the start of the first file to the end of the last, or [`Span::NONE`].
    pub fn span(&self) -> Span {
        match (self.files.first(), self.files.last()) {
            (Some(first), Some(last)) => first.root.span().to(last.root.span()),
            _ => Span::NONE,
        }
    }
}

impl<N: SyntaxNode, P: Into<PathBuf>> FromIterator<(P, N)> for SourceSet<N> {
    fn from_iter<I: IntoIterator<Item = (P, N)>>(iter: I) -> Self {
        Self {
            files: iter
                .into_iter()
                .map(|(path, root)| SourceFile::new(path, root))
                .collect(),
        }
    }
}

/// A position the cursor can stand on: the synthetic root, a file, or a node below one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef<N> {
    Root,
    /// The top-level node of the file at this index of the source set.
    File(usize),
    Node(N),
}

impl<N> NodeRef<N> {
    pub fn is_root(&self) -> bool {
        matches!(self, NodeRef::Root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;
    use crate::syntax::Point;

    #[test]
    fn test_display_names_are_base_names() {
        let ast = fixture::two_files();
        let files = ast.source_set();
        assert_eq!(files.len(), 2);
        let names: Vec<_> = files.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a.go", "b.go"]);
        assert_eq!(files.get(1).unwrap().path(), Path::new("pkg/b.go"));
        assert_eq!(files.by_name("b.go").unwrap().root(), &ast.root(1));
        assert!(files.by_name("c.go").is_none());
        assert_eq!(files.index_of(&ast.root(1)), Some(1));
    }

    #[test]
    fn test_span_covers_all_files() {
        let ast = fixture::two_files();
        let files = ast.source_set();
        let span = files.span();
        assert_eq!(span.start, Point::new(0, 1, 1));
        assert_eq!(span.end, ast.root(1).span().end);
    }

    #[test]
    fn test_empty_set() {
        let files: SourceSet<fixture::MockNode<'_>> = SourceSet::new();
        assert!(files.is_empty());
        assert_eq!(files.span(), Span::NONE);
        assert!(files.roots().is_empty());
    }
}

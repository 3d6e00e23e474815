//! Reading and parsing source files from disk.

use crate::error::LoadError;
use crate::language::Language;
use crate::node::TsNode;
use astpath_core::SourceSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One source file and the tree parsed from it.
pub struct ParsedFile {
    path: PathBuf,
    language: Language,
    source: String,
    tree: tree_sitter::Tree,
}

impl ParsedFile {
    /// Parses `source`, rejecting it when the tree contains syntax errors.
    pub fn parse(
        path: impl Into<PathBuf>,
        source: impl Into<String>,
        language: Language,
    ) -> Result<Self, LoadError> {
        let path = path.into();
        let source = source.into();
        let tree = language
            .parser()?
            .parse(&source, None)
            .ok_or_else(|| LoadError::Parse(path.clone()))?;

        if let Some(error) = first_error(tree.root_node()) {
            let start = error.start_position();
            let near = source
                .get(error.byte_range())
                .unwrap_or_default()
                .lines()
                .next()
                .unwrap_or_default()
                .to_string();
            return Err(LoadError::Syntax {
                path,
                line: start.row + 1,
                column: start.column + 1,
                near,
            });
        }

        log::debug!(
            "Parsed {} as {} ({} bytes)",
            path.display(),
            language,
            source.len()
        );
        Ok(Self {
            path,
            language,
            source,
            tree,
        })
    }

    /// Reads and parses the file at `path`, choosing the grammar from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let language = Language::from_path(path)?;
        let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, source, language)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> TsNode<'_> {
        TsNode::new(self.tree.root_node(), &self.source)
    }
}

/// The first error or missing node in pre-order.
fn first_error(root: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    if !root.has_error() {
        return None;
    }
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Files loaded together and queried as one source set.
pub struct Package {
    dir: PathBuf,
    files: Vec<ParsedFile>,
}

impl Package {
    pub fn new(dir: impl Into<PathBuf>, files: Vec<ParsedFile>) -> Self {
        Self {
            dir: dir.into(),
            files,
        }
    }

    /// The directory the files were read from, `.` for files named individually.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files(&self) -> &[ParsedFile] {
        &self.files
    }

    pub fn source_set(&self) -> SourceSet<TsNode<'_>> {
        self.files
            .iter()
            .map(|file| (file.path().to_path_buf(), file.root()))
            .collect()
    }
}

/// Loads every path. A directory becomes one package of its supported files, read
/// non-recursively in name order. Files named directly are gathered into a final
/// package. No paths means the current directory.
pub fn load_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Package>, LoadError> {
    if paths.is_empty() {
        return Ok(vec![load_dir(Path::new("."))?]);
    }

    let mut packages = Vec::new();
    let mut loose = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            packages.push(load_dir(path)?);
        } else {
            loose.push(ParsedFile::load(path)?);
        }
    }
    if !loose.is_empty() {
        packages.push(Package::new(".", loose));
    }
    Ok(packages)
}

fn load_dir(dir: &Path) -> Result<Package, LoadError> {
    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && Language::from_path(&path).is_ok() {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(LoadError::NoSources(dir.to_path_buf()));
    }
    paths.sort();

    let files = paths
        .iter()
        .map(ParsedFile::load)
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("Loaded {} files from {}", files.len(), dir.display());
    Ok(Package::new(dir, files))
}

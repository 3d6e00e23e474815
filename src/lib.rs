//! # astpath
//!
//! XPath queries over syntax trees.
//!
//! - **xpath**: the XPath 1.0 engine, driven through the `NodeNavigator` cursor protocol
//! - **astpath-core**: the cursor adapter, attribute synthesis and the [`Evaluator`] facade
//! - **treesitter**: Go and Rust sources parsed with tree-sitter
//!
//! The `astquery` binary wraps all three; see [`cli`].

pub use astpath_treesitter as treesitter;
pub use astpath_xpath as xpath;

pub mod cli;
pub mod error;
pub mod output;

pub use astpath_core::{
    Attribute, Cursor, Evaluator, Inspector, NodeRef, QueryConfig, QueryError, SourceFile,
    SourceSet, SyntaxNode, Value,
};
pub use astpath_treesitter::{Language, LoadError, Package, ParsedFile, TsNode, load_paths};
pub use error::AppError;

//! # astpath-treesitter
//!
//! Go and Rust sources parsed with tree-sitter, ready to query with `astpath-core`.

pub mod error;
pub mod language;
pub mod loader;
pub mod node;

pub use error::LoadError;
pub use language::Language;
pub use loader::{Package, ParsedFile, load_paths};
pub use node::TsNode;

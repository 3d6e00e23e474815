//! # astpath-core
//!
//! Exposes syntax trees from any parser to the XPath engine in `astpath-xpath`.
//!
//! - **syntax**: the [`SyntaxNode`] trait a parser's node handle implements
//! - **inspector**: parent and field-name index built once per set of trees
//! - **attributes**: the `type`, `pos` and scalar-field attributes of a node
//! - **root**: the synthetic root joining several parsed files
//! - **navigator**: the [`Cursor`] the engine moves over that tree
//! - **evaluator**: the query facade returning nodes or values
//!
//! The crate does no I/O. Loading and parsing files is left to the caller, see
//! `astpath-treesitter` for a tree-sitter backed source.

pub use astpath_xpath as xpath;

pub mod attributes;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod fixture;
pub mod inspector;
pub mod navigator;
pub mod root;
pub mod syntax;

pub use attributes::Attribute;
pub use config::QueryConfig;
pub use error::QueryError;
pub use evaluator::{Evaluator, Value};
pub use inspector::Inspector;
pub use navigator::Cursor;
pub use root::{NodeRef, SourceFile, SourceSet};
pub use syntax::{Field, Point, Scalar, Slot, Span, SyntaxNode};

pub mod ast;
pub mod axes;
pub mod engine;
pub mod error;
pub mod functions;
pub mod navigator;
pub mod operators;
pub mod order;
pub mod parser;

pub use ast::{Axis, BinaryOperator, Expression, LocationPath, NodeTest, Step};
pub use engine::{EvaluationContext, XPath, XPathValue, evaluate};
pub use navigator::{NodeNavigator, NodeType};
pub use order::DocumentKey;

// Re-export test utilities for integration testing in downstream crates
pub use error::XPathError;
pub use navigator::tests;
pub use parser::parse_expression;

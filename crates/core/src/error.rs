//! Defines the error type of the query facade.

use astpath_xpath::XPathError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The expression is not valid XPath. Never retried.
    #[error("expression cannot compile: {0}")]
    Compile(XPathError),
    /// The expression compiled but failed while running, e.g. `count('x')`.
    #[error("expression failed to evaluate: {0}")]
    Evaluate(XPathError),
}

impl From<XPathError> for QueryError {
    fn from(e: XPathError) -> Self {
        if e.is_compile_error() {
            QueryError::Compile(e)
        } else {
            QueryError::Evaluate(e)
        }
    }
}

use astpath_core::QueryError;
use astpath_treesitter::LoadError;
use thiserror::Error;

/// Everything that can stop an `astquery` run.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("load: {0}")]
    Load(#[from] LoadError),

    #[error("eval: {0}")]
    Query(#[from] QueryError),

    #[error("write: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: unsupported file type", .0.display())]
    Unsupported(PathBuf),

    #[error("{}: no supported source files", .0.display())]
    NoSources(PathBuf),

    #[error("cannot load the {language} grammar: {message}")]
    Language {
        language: &'static str,
        message: String,
    },

    #[error("{}: parser produced no tree", .0.display())]
    Parse(PathBuf),

    #[error("{}:{line}:{column}: syntax error near '{near}'", .path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
        near: String,
    },
}

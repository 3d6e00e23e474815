use crate::error::LoadError;
use std::fmt;
use std::path::Path;

/// A grammar this crate can parse with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Go,
    Rust,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Go, Language::Rust];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "go" => Some(Language::Go),
            "rs" => Some(Language::Rust),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| LoadError::Unsupported(path.to_path_buf()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::Rust => "rust",
        }
    }

    pub fn grammar(self) -> tree_sitter::Language {
        match self {
            Language::Go => tree_sitter_go::LANGUAGE.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
        }
    }

    pub(crate) fn parser(self) -> Result<tree_sitter::Parser, LoadError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&self.grammar())
            .map_err(|e| LoadError::Language {
                language: self.name(),
                message: e.to_string(),
            })?;
        Ok(parser)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path(Path::new("a/b.go")).unwrap(), Language::Go);
        assert_eq!(Language::from_path(Path::new("lib.rs")).unwrap(), Language::Rust);
        assert!(matches!(
            Language::from_path(Path::new("setup.py")),
            Err(LoadError::Unsupported(_))
        ));
        assert!(Language::from_path(Path::new("Makefile")).is_err());
    }

    #[test]
    fn test_grammars_load() {
        for language in Language::ALL {
            assert!(language.parser().is_ok(), "{language}");
        }
    }
}

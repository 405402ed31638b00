//! Content layer errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the content tree
#[derive(Error, Debug)]
pub enum ContentError {
    /// Fatal: the configured content directory does not exist
    #[error("Content directory not found: {}", .0.display())]
    MissingContentDir(PathBuf),

    /// A single file could not be turned into a post
    #[error("Failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: ParseFailure },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContentError {
    pub fn parse(path: impl Into<PathBuf>, reason: ParseFailure) -> Self {
        ContentError::Parse {
            path: path.into(),
            reason,
        }
    }
}

/// Why a content file was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("invalid frontmatter: {0}")]
    InvalidFrontMatter(String),

    #[error("missing frontmatter block")]
    MissingFrontMatter,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("slug `{0}` is already used by another post")]
    DuplicateSlug(String),

    #[error("unreadable file: {0}")]
    Unreadable(String),
}

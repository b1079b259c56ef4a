use std::path::PathBuf;

use thiserror::Error;

/// Failures of the content store queries and imports.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to determine project directories")]
    NoConfigDir,

    #[error("content invariant violated: {0}")]
    Invariant(String),

    #[error("content fetch task failed: {0}")]
    Task(String),
}

/// Navigation requests that are not valid in the current view state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowseError {
    #[error("a category must be selected before choosing a brand")]
    NoCategorySelected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LightboxError {
    #[error("cannot open the lightbox on an empty list")]
    EmptySnapshot,
}

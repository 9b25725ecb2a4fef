//! Error types for the tree codec.

use std::path::PathBuf;

/// Errors that can occur while converting between directories and trees.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] sprig_store::StoreError),

    /// Walking the working directory failed.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// Reading or writing a working-directory file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A tree entry would be written outside the target directory.
    #[error("tree entry escapes the working directory: {}", .0.display())]
    PathOutsideRoot(PathBuf),

    /// A file name cannot be represented as a tree entry.
    #[error("cannot store {}: {reason}", .path.display())]
    InvalidName { path: PathBuf, reason: String },
}

/// Convenience alias for tree results.
pub type TreeResult<T> = Result<T, TreeError>;

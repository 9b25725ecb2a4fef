//! Error types for reference operations.

use thiserror::Error;

/// Errors that can occur during reference operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// Attempted to store an empty target.
    #[error("refusing to write empty value to ref {name}")]
    InvalidRefValue { name: String },

    /// A ref that must resolve to a hash is missing, or its symbolic chain
    /// ends at a missing ref.
    #[error("ref not found: {name}")]
    NotFound { name: String },

    /// Symbolic refs point at each other.
    #[error("symbolic ref cycle starting at {name}")]
    SymbolicRefCycle { name: String },

    /// The ref name is not acceptable.
    #[error("invalid ref name: {name}: {reason}")]
    InvalidRefName { name: String, reason: String },

    /// A direct ref holds something that is not an object id.
    #[error("ref {name} does not point at an object id: {target:?}")]
    InvalidTarget { name: String, target: String },

    /// The token is neither a ref nor an object id.
    #[error("unknown revision: {0:?}")]
    UnknownRevision(String),

    /// I/O error during file-based ref operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for ref operations.
pub type Result<T> = std::result::Result<T, RefError>;

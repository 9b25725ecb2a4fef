//! Error types for the commit graph.

use sprig_types::ObjectId;

/// Errors that can occur while reading or walking commits.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A commit payload does not follow the commit format.
    #[error("malformed commit {id}: {reason}")]
    MalformedCommit { id: ObjectId, reason: String },

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] sprig_store::StoreError),

    /// Ref operation failed.
    #[error("ref error: {0}")]
    Ref(#[from] sprig_refs::RefError),
}

/// Convenience alias for graph results.
pub type GraphResult<T> = Result<T, GraphError>;

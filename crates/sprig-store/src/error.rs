use sprig_types::ObjectId;

use crate::object::ObjectKind;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// The stored kind tag differs from the one the caller expected.
    #[error("object {id} is a {actual}, expected a {expected}")]
    TypeMismatch {
        id: ObjectId,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    /// Content hash mismatch on read (data corruption).
    #[error("hash mismatch for {id}: stored bytes hash to {computed}")]
    HashMismatch { id: ObjectId, computed: ObjectId },

    /// The object data is malformed or cannot be decoded.
    #[error("corrupt object {id}: {reason}")]
    CorruptObject { id: ObjectId, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

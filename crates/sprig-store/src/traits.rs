use sprig_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::{ObjectKind, StoredObject};

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. The same kind and payload always
///   produce the same ID.
/// - Writing an object that already exists is a no-op.
/// - There is no update or delete; the store is append-only.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content-addressed ID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` on I/O failure or data corruption.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    /// Write an object and return its content-addressed ID.
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Hash and persist a tagged payload, returning its ID.
    fn put(&self, kind: ObjectKind, payload: &[u8]) -> StoreResult<ObjectId> {
        self.write(&StoredObject::new(kind, payload.to_vec()))
    }

    /// Load the payload stored under `id`.
    ///
    /// Fails with [`StoreError::NotFound`] when there is no such object and
    /// with [`StoreError::TypeMismatch`] when `expected` is given and the
    /// stored kind differs.
    fn get(&self, id: &ObjectId, expected: Option<ObjectKind>) -> StoreResult<Vec<u8>> {
        let obj = self.read(id)?.ok_or(StoreError::NotFound(*id))?;
        if let Some(expected) = expected {
            if obj.kind != expected {
                return Err(StoreError::TypeMismatch {
                    id: *id,
                    expected,
                    actual: obj.kind,
                });
            }
        }
        Ok(obj.data)
    }

    /// Load the full stored object, failing if it does not exist.
    fn load(&self, id: &ObjectId) -> StoreResult<StoredObject> {
        self.read(id)?.ok_or(StoreError::NotFound(*id))
    }
}

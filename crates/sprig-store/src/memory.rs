use std::collections::HashMap;
use std::sync::RwLock;

use sprig_types::ObjectId;

use crate::error::StoreResult;
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. All objects are held in memory behind a
/// `RwLock`. Objects are cloned on read/write.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ObjectId, StoredObject>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.get(id).cloned())
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        let mut map = self.objects.write().expect("lock poisoned");
        map.entry(id).or_insert_with(|| object.clone());
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::StoreError;
    use crate::object::{ObjectKind, Tree, TreeEntry};

    fn kind_strategy() -> impl Strategy<Value = ObjectKind> {
        prop_oneof![
            Just(ObjectKind::Blob),
            Just(ObjectKind::Tree),
            Just(ObjectKind::Commit),
        ]
    }

    proptest! {
        #[test]
        fn get_returns_what_put_stored(kind in kind_strategy(), payload in proptest::collection::vec(any::<u8>(), 0..256)) {
            let store = InMemoryObjectStore::new();
            let id = store.put(kind, &payload).unwrap();
            prop_assert_eq!(store.get(&id, Some(kind)).unwrap(), payload.clone());

            let again = store.put(kind, &payload).unwrap();
            prop_assert_eq!(id, again);
            prop_assert_eq!(store.len(), 1);
        }

        #[test]
        fn distinct_payloads_get_distinct_ids(a in proptest::collection::vec(any::<u8>(), 0..64), b in proptest::collection::vec(any::<u8>(), 0..64)) {
            prop_assume!(a != b);
            let store = InMemoryObjectStore::new();
            let ida = store.put(ObjectKind::Blob, &a).unwrap();
            let idb = store.put(ObjectKind::Blob, &b).unwrap();
            prop_assert_ne!(ida, idb);
        }
    }

    #[test]
    fn same_bytes_different_kind_are_distinct_objects() {
        let store = InMemoryObjectStore::new();
        let blob = store.put(ObjectKind::Blob, b"x").unwrap();
        let tree = store.put(ObjectKind::Tree, b"x").unwrap();
        assert_ne!(blob, tree);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = InMemoryObjectStore::new();
        let id = ObjectId::from_hash([7; 20]);
        assert!(matches!(store.get(&id, None), Err(StoreError::NotFound(missing)) if missing == id));
        assert!(store.read(&id).unwrap().is_none());
        assert!(!store.exists(&id).unwrap());
    }

    #[test]
    fn get_with_wrong_kind_is_type_mismatch() {
        let store = InMemoryObjectStore::new();
        let id = store.put(ObjectKind::Blob, b"content").unwrap();
        let err = store.get(&id, Some(ObjectKind::Commit)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::TypeMismatch {
                expected: ObjectKind::Commit,
                actual: ObjectKind::Blob,
                ..
            }
        ));
        // No expectation means any kind is accepted.
        assert_eq!(store.get(&id, None).unwrap(), b"content");
    }

    #[test]
    fn write_and_read_tree() {
        let store = InMemoryObjectStore::new();
        let blob = store.put(ObjectKind::Blob, b"hello").unwrap();
        let tree = Tree::new(vec![TreeEntry::blob("hello.txt", blob)]);
        let id = store.write(&tree.to_stored_object()).unwrap();

        let read_back = store.load(&id).unwrap();
        assert_eq!(read_back.kind, ObjectKind::Tree);
        let decoded = Tree::from_stored_object(&read_back).unwrap();
        assert_eq!(decoded.get("hello.txt").unwrap().object_id, blob);
    }

    #[test]
    fn default_creates_empty_store() {
        let store = InMemoryObjectStore::default();
        assert!(store.is_empty());
        let debug = format!("{store:?}");
        assert!(debug.contains("object_count"));
    }
}

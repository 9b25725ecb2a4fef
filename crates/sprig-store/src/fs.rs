use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use sprig_crypto::ContentHasher;
use sprig_types::ObjectId;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// Loose-object store on the local filesystem.
///
/// Each object lives in its own file, `<root>/<hex id>`, holding the framed
/// bytes `kind || NUL || payload`. New objects are written to a temporary
/// file in `root` and renamed into place, so readers never observe a
/// partially written object.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Open the store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory holding the object files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `id`.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.root.join(id.to_hex())
    }
}

impl ObjectStore for FsObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let framed = match fs::read(self.object_path(id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let computed = ContentHasher::hash_framed(&framed);
        if computed != *id {
            return Err(StoreError::HashMismatch { id: *id, computed });
        }
        StoredObject::decode(*id, &framed).map(Some)
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        let path = self.object_path(&id);
        if path.exists() {
            debug!(object = %id.short_hex(), kind = %object.kind, "object already stored");
            return Ok(id);
        }

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(&object.encode())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(object = %id.short_hex(), kind = %object.kind, size = object.size, "stored object");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }
}

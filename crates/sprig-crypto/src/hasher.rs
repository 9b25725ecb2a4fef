use sha1::{Digest, Sha1};
use sprig_types::ObjectId;

/// Kind-tagged SHA-1 content hasher.
///
/// Each hasher carries a kind tag (`"blob"`, `"tree"`, `"commit"`) that is
/// hashed ahead of the payload, separated by a NUL byte. A blob and a tree
/// with identical payload bytes therefore never share an id.
pub struct ContentHasher {
    tag: &'static str,
}

impl ContentHasher {
    /// Hasher for blob objects.
    pub const BLOB: Self = Self { tag: "blob" };
    /// Hasher for tree objects.
    pub const TREE: Self = Self { tag: "tree" };
    /// Hasher for commit objects.
    pub const COMMIT: Self = Self { tag: "commit" };

    /// Hash a payload under this hasher's tag.
    pub fn hash(&self, payload: &[u8]) -> ObjectId {
        let mut hasher = Sha1::new();
        hasher.update(self.tag.as_bytes());
        hasher.update([0u8]);
        hasher.update(payload);
        ObjectId::from_hash(hasher.finalize().into())
    }

    /// Hash an already framed `tag || NUL || payload` byte sequence.
    pub fn hash_framed(framed: &[u8]) -> ObjectId {
        ObjectId::from_hash(Sha1::digest(framed).into())
    }
}

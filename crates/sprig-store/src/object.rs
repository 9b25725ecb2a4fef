use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sprig_crypto::ContentHasher;
use sprig_types::ObjectId;

use crate::error::{StoreError, StoreResult};

/// The kind of object stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Raw content (file contents).
    Blob,
    /// Directory listing: ordered entries mapping names to object references.
    Tree,
    /// Snapshot pointer: tree, optional parent, message.
    Commit,
}

impl ObjectKind {
    /// The ASCII tag written in front of the payload.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }

    fn hasher(&self) -> &'static ContentHasher {
        match self {
            Self::Blob => &ContentHasher::BLOB,
            Self::Tree => &ContentHasher::TREE,
            Self::Commit => &ContentHasher::COMMIT,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ObjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blob" => Ok(Self::Blob),
            "tree" => Ok(Self::Tree),
            "commit" => Ok(Self::Commit),
            other => Err(format!("unknown object kind: {other:?}")),
        }
    }
}

/// A stored object: kind tag + payload + cached size.
///
/// `StoredObject` is the unit of storage. The store never interprets the
/// payload; it is a pure key-value store keyed by content hash. On disk an
/// object is framed as `kind || NUL || payload`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The payload bytes of the object.
    pub data: Vec<u8>,
    /// The size of `data` in bytes.
    pub size: u64,
}

impl StoredObject {
    /// Create a new stored object from kind and data.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { kind, data, size }
    }

    /// Compute the content-addressed ID for this object.
    pub fn compute_id(&self) -> ObjectId {
        self.kind.hasher().hash(&self.data)
    }

    /// Frame the object as `kind || NUL || payload`.
    pub fn encode(&self) -> Vec<u8> {
        let tag = self.kind.tag().as_bytes();
        let mut framed = Vec::with_capacity(tag.len() + 1 + self.data.len());
        framed.extend_from_slice(tag);
        framed.push(0);
        framed.extend_from_slice(&self.data);
        framed
    }

    /// Parse a framed object read from storage under `id`.
    pub fn decode(id: ObjectId, framed: &[u8]) -> StoreResult<Self> {
        let nul = framed
            .iter()
            .position(|b| *b == 0)
            .ok_or_else(|| StoreError::CorruptObject {
                id,
                reason: "missing NUL after kind tag".into(),
            })?;
        let tag = std::str::from_utf8(&framed[..nul]).map_err(|_| StoreError::CorruptObject {
            id,
            reason: "kind tag is not UTF-8".into(),
        })?;
        let kind = tag
            .parse::<ObjectKind>()
            .map_err(|reason| StoreError::CorruptObject { id, reason })?;
        Ok(Self::new(kind, framed[nul + 1..].to_vec()))
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// What a tree entry points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A file; the entry references a blob.
    Blob,
    /// A subdirectory; the entry references another tree.
    Tree,
}

impl EntryKind {
    /// The object kind the entry's id must resolve to.
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            Self::Blob => ObjectKind::Blob,
            Self::Tree => ObjectKind::Tree,
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.object_kind().tag())
    }
}

/// A single entry in a tree object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Blob (file) or tree (directory).
    pub kind: EntryKind,
    /// Entry name (filename or directory name).
    pub name: String,
    /// Content-addressed ID of the referenced object.
    pub object_id: ObjectId,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(kind: EntryKind, name: impl Into<String>, object_id: ObjectId) -> Self {
        Self {
            kind,
            name: name.into(),
            object_id,
        }
    }

    /// Shorthand for a file entry.
    pub fn blob(name: impl Into<String>, object_id: ObjectId) -> Self {
        Self::new(EntryKind::Blob, name, object_id)
    }

    /// Shorthand for a subdirectory entry.
    pub fn tree(name: impl Into<String>, object_id: ObjectId) -> Self {
        Self::new(EntryKind::Tree, name, object_id)
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

/// Directory listing object.
///
/// The payload is one line per entry, `<kind> <hex id> <name>\n`, in name
/// order. Because [`Tree::new`] sorts, two trees with the same entries always
/// encode to the same bytes and therefore the same id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    /// Sorted entries in this directory.
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Create a new tree with the given entries, sorted by name.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort();
        Self { entries }
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Serialize entries into the canonical payload.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!(
                "{} {} {}\n",
                entry.kind, entry.object_id, entry.name
            ));
        }
        out.into_bytes()
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Tree, self.encode())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        expect_kind(obj, ObjectKind::Tree)?;
        let id = obj.compute_id();
        let corrupt = |reason: String| StoreError::CorruptObject { id, reason };

        let text = std::str::from_utf8(&obj.data)
            .map_err(|_| corrupt("tree payload is not UTF-8".into()))?;
        let mut entries = Vec::new();
        for line in text.split('\n').filter(|l| !l.is_empty()) {
            let mut parts = line.splitn(3, ' ');
            let (Some(kind), Some(hex), Some(name)) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(corrupt(format!("malformed tree line: {line:?}")));
            };
            let kind = match kind {
                "blob" => EntryKind::Blob,
                "tree" => EntryKind::Tree,
                other => return Err(corrupt(format!("unknown entry kind: {other:?}"))),
            };
            let object_id = ObjectId::from_hex(hex)
                .map_err(|e| corrupt(format!("bad entry id {hex:?}: {e}")))?;
            if name.is_empty() || name.contains('/') {
                return Err(corrupt(format!("invalid entry name: {name:?}")));
            }
            entries.push(TreeEntry::new(kind, name, object_id));
        }
        Ok(Self { entries })
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn expect_kind(obj: &StoredObject, expected: ObjectKind) -> StoreResult<()> {
    if obj.kind != expected {
        return Err(StoreError::TypeMismatch {
            id: obj.compute_id(),
            expected,
            actual: obj.kind,
        });
    }
    Ok(())
}

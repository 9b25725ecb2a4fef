//! Commit objects and creating them from HEAD.
//!
//! A commit payload is a `tree <hex>` line, an optional `parent <hex>` line,
//! a blank line, then the message verbatim:
//!
//! ```text
//! tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904
//! parent 8a2b5c1f0e7d6a39b4c2e1f0d9a8b7c6e5f4d3c2
//!
//! second commit
//! ```

use serde::{Deserialize, Serialize};
use sprig_refs::{RefStore, RefValue, HEAD};
use sprig_store::{ObjectKind, ObjectStore};
use sprig_types::ObjectId;
use tracing::info;

use crate::error::{GraphError, GraphResult};

/// A decoded commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Id of the commit object itself.
    pub id: ObjectId,
    /// Root tree of the snapshot.
    pub tree: ObjectId,
    /// The previous commit, absent for the first one.
    pub parent: Option<ObjectId>,
    /// Free-form message, possibly spanning several lines.
    pub message: String,
}

impl Commit {
    /// Build the payload for a commit with these fields.
    pub fn payload(tree: &ObjectId, parent: Option<&ObjectId>, message: &str) -> Vec<u8> {
        let mut text = format!("tree {tree}\n");
        if let Some(parent) = parent {
            text.push_str(&format!("parent {parent}\n"));
        }
        text.push('\n');
        text.push_str(message);
        text.into_bytes()
    }

    /// This commit's payload.
    pub fn encode(&self) -> Vec<u8> {
        Self::payload(&self.tree, self.parent.as_ref(), &self.message)
    }

    /// Parse a commit payload stored under `id`.
    pub fn decode(id: ObjectId, payload: &[u8]) -> GraphResult<Self> {
        let malformed = |reason: &str| GraphError::MalformedCommit {
            id,
            reason: reason.to_string(),
        };
        let text = std::str::from_utf8(payload).map_err(|_| malformed("payload is not UTF-8"))?;

        let (tree_line, rest) = text
            .split_once('\n')
            .ok_or_else(|| malformed("missing tree line"))?;
        let tree = tree_line
            .strip_prefix("tree ")
            .and_then(|hex| ObjectId::from_hex(hex).ok())
            .ok_or_else(|| malformed("first line must be `tree <hex>`"))?;

        let (parent, rest) = match rest.strip_prefix("parent ") {
            Some(after) => {
                let (hex, rest) = after
                    .split_once('\n')
                    .ok_or_else(|| malformed("unterminated parent line"))?;
                let parent =
                    ObjectId::from_hex(hex).map_err(|_| malformed("bad parent id"))?;
                (Some(parent), rest)
            }
            None => (None, rest),
        };

        let message = rest
            .strip_prefix('\n')
            .ok_or_else(|| malformed("missing blank line before message"))?;

        Ok(Self {
            id,
            tree,
            parent,
            message: message.to_string(),
        })
    }

    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// Load and decode the commit stored under `id`.
pub fn get_commit(store: &dyn ObjectStore, id: &ObjectId) -> GraphResult<Commit> {
    let payload = store.get(id, Some(ObjectKind::Commit))?;
    Commit::decode(*id, &payload)
}

/// Record `tree` as a new commit on top of HEAD and advance HEAD.
///
/// The parent is the dereferenced HEAD (none on the first commit). HEAD is
/// written through, so when it names a branch the branch moves.
pub fn commit_tree(
    store: &dyn ObjectStore,
    refs: &dyn RefStore,
    tree: &ObjectId,
    message: &str,
) -> GraphResult<ObjectId> {
    let parent = match refs.get_ref(HEAD, true)? {
        Some(value) => Some(value.object_id(HEAD)?),
        None => None,
    };

    let payload = Commit::payload(tree, parent.as_ref(), message);
    let id = store.put(ObjectKind::Commit, &payload)?;
    refs.set_ref(HEAD, &RefValue::direct(id), true)?;

    info!(
        commit = %id.short_hex(),
        tree = %tree.short_hex(),
        parent = ?parent.map(|p| p.short_hex()),
        "created commit"
    );
    Ok(id)
}

#[cfg(test)]
mod tests {
    use sprig_refs::InMemoryRefStore;
    use sprig_store::InMemoryObjectStore;

    use super::*;

    fn oid(byte: u8) -> ObjectId {
        ObjectId::from_hash([byte; 20])
    }

    fn on_master() -> InMemoryRefStore {
        let refs = InMemoryRefStore::new();
        refs.set_ref(HEAD, &RefValue::symbolic("refs/heads/master"), false)
            .unwrap();
        refs
    }

    #[test]
    fn payload_layout() {
        let bytes = Commit::payload(&oid(1), Some(&oid(2)), "msg");
        let expected = format!("tree {}\nparent {}\n\nmsg", oid(1), oid(2));
        assert_eq!(bytes, expected.into_bytes());

        let root = Commit::payload(&oid(1), None, "first");
        assert_eq!(root, format!("tree {}\n\nfirst", oid(1)).into_bytes());
    }

    #[test]
    fn decode_keeps_multiline_message() {
        let payload = Commit::payload(&oid(1), Some(&oid(2)), "subject\n\nbody line\n");
        let commit = Commit::decode(oid(9), &payload).unwrap();
        assert_eq!(commit.tree, oid(1));
        assert_eq!(commit.parent, Some(oid(2)));
        assert_eq!(commit.message, "subject\n\nbody line\n");
        assert_eq!(commit.summary(), "subject");
        assert_eq!(commit.encode(), payload);
    }

    #[test]
    fn decode_rejects_malformed() {
        let bad = [
            "".to_string(),
            "parent x\n\nmsg".to_string(),
            format!("tree {}\nmsg", oid(1)),
            format!("tree {}\nparent nothex\n\nmsg", oid(1)),
            format!("tree {}", oid(1)),
        ];
        for payload in bad {
            let err = Commit::decode(oid(0), payload.as_bytes()).unwrap_err();
            assert!(
                matches!(err, GraphError::MalformedCommit { .. }),
                "{payload:?} should be malformed"
            );
        }
    }

    #[test]
    fn commits_chain_through_branch() {
        let store = InMemoryObjectStore::new();
        let refs = on_master();

        let a = commit_tree(&store, &refs, &oid(1), "a").unwrap();
        let b = commit_tree(&store, &refs, &oid(1), "b").unwrap();

        assert_eq!(get_commit(&store, &a).unwrap().parent, None);
        assert_eq!(get_commit(&store, &b).unwrap().parent, Some(a));
        assert_eq!(refs.resolve("master").unwrap(), b);
        assert_eq!(
            refs.get_ref(HEAD, false).unwrap().unwrap(),
            RefValue::symbolic("refs/heads/master")
        );
    }

    #[test]
    fn get_commit_checks_kind() {
        let store = InMemoryObjectStore::new();
        let blob = store.put(ObjectKind::Blob, b"x").unwrap();
        assert!(matches!(
            get_commit(&store, &blob),
            Err(GraphError::Store(sprig_store::StoreError::TypeMismatch { .. }))
        ));
    }
}

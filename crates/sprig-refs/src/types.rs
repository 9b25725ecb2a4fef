//! Core reference types.
//!
//! A ref file holds either a raw object id (a *direct* ref) or
//! `ref: <other ref name>` (a *symbolic* ref).

use serde::{Deserialize, Serialize};
use sprig_types::ObjectId;

use crate::error::{RefError, Result};

/// Prefix marking a symbolic ref in its stored form.
pub const SYMBOLIC_PREFIX: &str = "ref: ";

/// Namespace for branches.
pub const HEADS_PREFIX: &str = "refs/heads/";

/// Namespace for tags.
pub const TAGS_PREFIX: &str = "refs/tags/";

/// The distinguished "current position" ref.
pub const HEAD: &str = "HEAD";

/// The value stored under a ref name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefValue {
    /// An object id in hex (direct) or another ref name (symbolic).
    pub target: String,
    /// Whether `target` names another ref.
    pub symbolic: bool,
}

impl RefValue {
    /// A direct ref to an object.
    pub fn direct(id: ObjectId) -> Self {
        Self {
            target: id.to_hex(),
            symbolic: false,
        }
    }

    /// A symbolic ref naming another ref.
    pub fn symbolic(ref_name: impl Into<String>) -> Self {
        Self {
            target: ref_name.into(),
            symbolic: true,
        }
    }

    /// Parse the stored form of a ref.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.strip_prefix(SYMBOLIC_PREFIX) {
            Some(target) => Self::symbolic(target.trim()),
            None => Self {
                target: raw.to_string(),
                symbolic: false,
            },
        }
    }

    /// The stored form of this value.
    pub fn encode(&self) -> String {
        if self.symbolic {
            format!("{SYMBOLIC_PREFIX}{}", self.target)
        } else {
            self.target.clone()
        }
    }

    /// Interpret a direct value as an object id. `name` is used for errors.
    pub fn object_id(&self, name: &str) -> Result<ObjectId> {
        if self.symbolic {
            return Err(RefError::InvalidTarget {
                name: name.to_string(),
                target: self.encode(),
            });
        }
        ObjectId::from_hex(&self.target).map_err(|_| RefError::InvalidTarget {
            name: name.to_string(),
            target: self.target.clone(),
        })
    }
}

impl std::fmt::Display for RefValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

/// The state of HEAD: either symbolic (pointing to a ref) or detached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Head {
    /// HEAD names another ref, normally `refs/heads/<branch>`.
    Symbolic(String),
    /// HEAD is detached, pointing directly to a commit.
    Detached(ObjectId),
}

impl Head {
    /// The branch HEAD is on, if it is symbolic to `refs/heads/*`.
    pub fn branch(&self) -> Option<&str> {
        match self {
            Head::Symbolic(name) => name.strip_prefix(HEADS_PREFIX),
            Head::Detached(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_direct_and_symbolic() {
        let direct = RefValue::parse("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d\n");
        assert!(!direct.symbolic);
        assert_eq!(direct.target, "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");

        let sym = RefValue::parse("ref: refs/heads/master");
        assert!(sym.symbolic);
        assert_eq!(sym.target, "refs/heads/master");
    }

    #[test]
    fn encode_matches_on_disk_shape() {
        assert_eq!(
            RefValue::symbolic("refs/heads/main").encode(),
            "ref: refs/heads/main"
        );
        let id = ObjectId::from_hash([0x11; 20]);
        assert_eq!(RefValue::direct(id).encode(), id.to_hex());
    }

    #[test]
    fn object_id_rejects_symbolic_and_garbage() {
        assert!(matches!(
            RefValue::symbolic("refs/heads/x").object_id("HEAD"),
            Err(RefError::InvalidTarget { .. })
        ));
        let garbage = RefValue::parse("not a hash");
        assert!(garbage.object_id("refs/tags/x").is_err());
    }

    #[test]
    fn head_branch_name() {
        assert_eq!(
            Head::Symbolic("refs/heads/feature/x".into()).branch(),
            Some("feature/x")
        );
        assert_eq!(Head::Detached(ObjectId::from_hash([1; 20])).branch(), None);
    }
}

//! The [`RefStore`] trait defining the reference storage interface.
//!
//! Backends implement three primitives (read, write, enumerate). Everything
//! else -- following symbolic chains, writing through HEAD, listing with a
//! prefix, turning a user-supplied revision into an object id -- is provided
//! on top of them so every backend behaves the same way.

use std::collections::HashSet;

use sprig_types::ObjectId;
use tracing::debug;

use crate::error::{RefError, Result};
use crate::types::{Head, RefValue, HEAD, HEADS_PREFIX, TAGS_PREFIX};

/// Prefixes tried, in order, when resolving a revision token.
pub const RESOLVE_PREFIXES: [&str; 4] = ["", "refs/", TAGS_PREFIX, HEADS_PREFIX];

/// Storage backend for named references.
///
/// The namespace is hierarchical:
///
/// - `HEAD` for the current position
/// - `refs/heads/*` for branches
/// - `refs/tags/*` for tags
pub trait RefStore: Send + Sync {
    /// Read the stored value of `name` without following symbolic refs.
    ///
    /// Returns `Ok(None)` if the ref does not exist.
    fn read_raw(&self, name: &str) -> Result<Option<RefValue>>;

    /// Store `value` at exactly `name`, creating or overwriting it.
    fn write_raw(&self, name: &str, value: &RefValue) -> Result<()>;

    /// Every ref name physically present, `HEAD` included when it exists.
    fn ref_names(&self) -> Result<Vec<String>>;

    /// Follow `name` and report the last name reached and its value.
    ///
    /// Without `deref` this is just a read. With `deref`, symbolic values
    /// are followed until a direct value or a missing ref; the returned name
    /// is where the chain stopped, which is where a write-through lands.
    fn resolve_chain(&self, name: &str, deref: bool) -> Result<(String, Option<RefValue>)> {
        let mut current = name.to_string();
        let mut seen = HashSet::new();
        loop {
            if !seen.insert(current.clone()) {
                return Err(RefError::SymbolicRefCycle {
                    name: name.to_string(),
                });
            }
            match self.read_raw(&current)? {
                Some(value) if deref && value.symbolic => current = value.target,
                other => return Ok((current, other)),
            }
        }
    }

    /// Read a ref, optionally dereferencing symbolic values.
    ///
    /// A missing ref (or a chain ending at one) is `Ok(None)`.
    fn get_ref(&self, name: &str, deref: bool) -> Result<Option<RefValue>> {
        Ok(self.resolve_chain(name, deref)?.1)
    }

    /// Write `value` at `name`.
    ///
    /// With `deref`, the write goes to the end of `name`'s symbolic chain, so
    /// updating HEAD while it tracks a branch moves the branch. Empty targets
    /// are rejected before anything is written.
    fn set_ref(&self, name: &str, value: &RefValue, deref: bool) -> Result<()> {
        if value.target.is_empty() {
            return Err(RefError::InvalidRefValue {
                name: name.to_string(),
            });
        }
        let (target_name, _) = if deref {
            self.resolve_chain(name, true)?
        } else {
            (name.to_string(), None)
        };
        debug!(name, written = %target_name, value = %value, "set ref");
        self.write_raw(&target_name, value)
    }

    /// All refs whose name starts with `prefix`, sorted by name.
    ///
    /// Refs whose chain ends at a missing ref are left out.
    fn list_refs(&self, prefix: &str, deref: bool) -> Result<Vec<(String, RefValue)>> {
        let mut names = self.ref_names()?;
        names.retain(|n| n.starts_with(prefix));
        names.sort();
        names.dedup();

        let mut refs = Vec::with_capacity(names.len());
        for name in names {
            if let Some(value) = self.get_ref(&name, deref)? {
                refs.push((name, value));
            }
        }
        Ok(refs)
    }

    /// Returns `true` if `refs/heads/<name>` exists.
    fn is_branch(&self, name: &str) -> Result<bool> {
        Ok(self.read_raw(&format!("{HEADS_PREFIX}{name}"))?.is_some())
    }

    /// Follow `name` to the object id it ultimately designates.
    fn peel(&self, name: &str) -> Result<ObjectId> {
        match self.get_ref(name, true)? {
            Some(value) => value.object_id(name),
            None => Err(RefError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Turn a user-supplied revision into an object id.
    ///
    /// `"@"` means `HEAD` and an empty token means the dereferenced `HEAD`.
    /// Otherwise the token is looked up under each of [`RESOLVE_PREFIXES`];
    /// the first existing ref wins and is followed to its object id. If no
    /// ref matches, the token must itself be a full hex object id.
    fn resolve(&self, token: &str) -> Result<ObjectId> {
        let token = if token == "@" { HEAD } else { token };
        if token.is_empty() {
            return self.peel(HEAD);
        }

        for prefix in RESOLVE_PREFIXES {
            let name = format!("{prefix}{token}");
            if self.read_raw(&name)?.is_some() {
                return self.peel(&name);
            }
        }

        ObjectId::from_hex(token).map_err(|_| RefError::UnknownRevision(token.to_string()))
    }

    /// Read the current HEAD state.
    ///
    /// Returns `Ok(None)` if HEAD has not been set.
    fn head(&self) -> Result<Option<Head>> {
        match self.read_raw(HEAD)? {
            None => Ok(None),
            Some(value) if value.symbolic => Ok(Some(Head::Symbolic(value.target))),
            Some(value) => Ok(Some(Head::Detached(value.object_id(HEAD)?))),
        }
    }

    /// The branch HEAD tracks, or `None` when detached or unset.
    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self
            .head()?
            .and_then(|head| head.branch().map(str::to_string)))
    }

    /// List all branch refs, dereferenced.
    fn branches(&self) -> Result<Vec<(String, RefValue)>> {
        self.list_refs(HEADS_PREFIX, true)
    }

    /// List all tag refs, dereferenced.
    fn tags(&self) -> Result<Vec<(String, RefValue)>> {
        self.list_refs(TAGS_PREFIX, true)
    }
}

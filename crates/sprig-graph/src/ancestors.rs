//! Depth-first walk over commit parents.

use std::collections::HashSet;

use sprig_store::ObjectStore;
use sprig_types::ObjectId;
use tracing::debug;

use crate::commit::{get_commit, Commit};
use crate::error::GraphResult;

/// Iterator over every commit reachable from a set of starting commits.
///
/// The starts seed a stack; each step pops an id, skips it if already seen,
/// otherwise loads the commit, pushes its parent and yields it. Every
/// reachable commit is yielded exactly once even when the starts share
/// history. The walk stops after the first error.
pub struct Ancestors<'a> {
    store: &'a dyn ObjectStore,
    stack: Vec<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl<'a> Ancestors<'a> {
    pub fn new(store: &'a dyn ObjectStore, starts: impl IntoIterator<Item = ObjectId>) -> Self {
        Self {
            store,
            stack: starts.into_iter().collect(),
            seen: HashSet::new(),
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = GraphResult<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if !self.seen.insert(id) {
                continue;
            }
            match get_commit(self.store, &id) {
                Ok(commit) => {
                    if let Some(parent) = commit.parent {
                        self.stack.push(parent);
                    }
                    debug!(commit = %id.short_hex(), "visited commit");
                    return Some(Ok(commit));
                }
                Err(e) => {
                    self.stack.clear();
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

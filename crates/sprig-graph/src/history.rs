//! Commit history with ref decorations.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use sprig_refs::RefStore;
use sprig_store::ObjectStore;
use sprig_types::ObjectId;

use crate::ancestors::Ancestors;
use crate::commit::Commit;
use crate::error::GraphResult;

/// One commit in a history listing plus the refs that point at it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    #[serde(flatten)]
    pub commit: Commit,
    /// Ref names (e.g. `HEAD`, `refs/heads/master`) whose dereferenced value
    /// is this commit, sorted.
    pub refs: Vec<String>,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "commit {}", self.commit.id)?;
        if !self.refs.is_empty() {
            write!(f, " ({})", self.refs.join(", "))?;
        }
        write!(
            f,
            "\ntree {}\n\n{}\n",
            self.commit.tree, self.commit.message
        )
    }
}

/// Lazy history iterator returned by [`log`].
pub struct Log<'a> {
    ancestors: Ancestors<'a>,
    decorations: HashMap<ObjectId, Vec<String>>,
}

impl Iterator for Log<'_> {
    type Item = GraphResult<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit = match self.ancestors.next()? {
            Ok(commit) => commit,
            Err(e) => return Some(Err(e)),
        };
        let refs = self.decorations.get(&commit.id).cloned().unwrap_or_default();
        Some(Ok(LogEntry { commit, refs }))
    }
}

/// History starting at `start`, newest first.
///
/// Ref decorations are gathered once up front from the dereferenced ref
/// listing; commits are loaded as the iterator advances.
pub fn log<'a>(
    store: &'a dyn ObjectStore,
    refs: &dyn RefStore,
    start: ObjectId,
) -> GraphResult<Log<'a>> {
    let mut decorations: HashMap<ObjectId, Vec<String>> = HashMap::new();
    for (name, value) in refs.list_refs("", true)? {
        // Tags and branches may point at non-commits or garbage; those just
        // never match a commit id.
        if let Ok(id) = value.object_id(&name) {
            decorations.entry(id).or_default().push(name);
        }
    }
    Ok(Log {
        ancestors: Ancestors::new(store, [start]),
        decorations,
    })
}

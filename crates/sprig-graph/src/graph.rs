//! Export of refs and the commits they reach as a Graphviz graph.

use std::fmt::Write;

use serde::Serialize;
use sprig_refs::{RefStore, RefValue};
use sprig_store::{ObjectKind, ObjectStore};
use sprig_types::ObjectId;
use tracing::debug;

use crate::ancestors::Ancestors;
use crate::error::GraphResult;

/// Number of hex characters shown in a commit node label.
pub const LABEL_HEX_LEN: usize = 10;

/// A ref node and the node it points to (a ref name or an object id).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RefNode {
    pub name: String,
    pub target: String,
    pub symbolic: bool,
}

/// A commit node and its parent edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommitNode {
    pub id: ObjectId,
    pub parent: Option<ObjectId>,
}

/// Every ref plus every commit reachable from a direct ref.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RefGraph {
    pub refs: Vec<RefNode>,
    pub commits: Vec<CommitNode>,
}

impl RefGraph {
    /// Collect refs without dereferencing and walk the commits they reach.
    ///
    /// Direct refs that name a non-commit object (a tag on a tree, say) or
    /// an object missing from the store are still listed but not walked.
    pub fn build(store: &dyn ObjectStore, refs: &dyn RefStore) -> GraphResult<Self> {
        let listed = refs.list_refs("", false)?;

        let mut starts = Vec::new();
        for (name, value) in &listed {
            if value.symbolic {
                continue;
            }
            let id = value.object_id(name)?;
            let kind = store.read(&id)?.map(|obj| obj.kind);
            if kind == Some(ObjectKind::Commit) {
                starts.push(id);
            }
        }

        let mut commits = Vec::new();
        for commit in Ancestors::new(store, starts) {
            let commit = commit?;
            commits.push(CommitNode {
                id: commit.id,
                parent: commit.parent,
            });
        }

        let refs = listed
            .into_iter()
            .map(|(name, RefValue { target, symbolic })| RefNode {
                name,
                target,
                symbolic,
            })
            .collect::<Vec<_>>();
        debug!(refs = refs.len(), commits = commits.len(), "built ref graph");
        Ok(Self { refs, commits })
    }

    /// Render as Graphviz DOT: refs as notes, commits as filled boxes.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph commits {\n");
        for node in &self.refs {
            let _ = writeln!(dot, "\"{}\" [shape=note]", node.name);
            let _ = writeln!(dot, "\"{}\" -> \"{}\"", node.name, node.target);
        }
        for node in &self.commits {
            let hex = node.id.to_hex();
            let _ = writeln!(
                dot,
                "\"{hex}\" [shape=box style=filled label=\"{}\"]",
                &hex[..LABEL_HEX_LEN]
            );
            if let Some(parent) = &node.parent {
                let _ = writeln!(dot, "\"{hex}\" -> \"{parent}\"");
            }
        }
        dot.push('}');
        dot.push('\n');
        dot
    }
}

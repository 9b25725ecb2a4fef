//! Commit graph for sprig.
//!
//! Commits form a singly linked chain through their `parent` field. This
//! crate encodes and decodes commits, creates them on top of HEAD, walks
//! ancestry, lists history and exports the ref/commit graph.
//!
//! # Key Types
//!
//! - [`Commit`] -- decoded commit object
//! - [`Ancestors`] -- depth-first walk yielding each reachable commit once
//! - [`LogEntry`] / [`Log`] -- decorated history
//! - [`RefGraph`] -- refs and commits, renderable as Graphviz DOT

pub mod ancestors;
pub mod commit;
pub mod error;
pub mod graph;
pub mod history;

pub use ancestors::Ancestors;
pub use commit::{commit_tree, get_commit, Commit};
pub use error::{GraphError, GraphResult};
pub use graph::{CommitNode, RefGraph, RefNode, LABEL_HEX_LEN};
pub use history::{log, Log, LogEntry};

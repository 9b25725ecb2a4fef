//! Repository handle for sprig.
//!
//! [`Repository`] ties together the object store, the ref store, the tree
//! codec and the commit graph for one working directory. It is the entry
//! point for the `sprig` binary and for programs embedding sprig.

pub mod config;
pub mod error;
pub mod repository;

pub use config::{RepoConfig, CONFIG_FILE};
pub use error::{SdkError, SdkResult};
pub use repository::{BranchInfo, Repository, TagInfo, META_DIR};

// Re-export key types
pub use sprig_graph::{Commit, LogEntry, RefGraph};
pub use sprig_refs::Head;
pub use sprig_store::ObjectKind;
pub use sprig_types::ObjectId;

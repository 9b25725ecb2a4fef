//! Content-addressed object storage for sprig.
//!
//! This crate implements a hash-keyed object store analogous to git's
//! `.git/objects/` directory. Every piece of data -- file contents, directory
//! listings, commits -- is stored as an immutable object identified by the
//! SHA-1 of its kind tag and payload.
//!
//! # Object Types
//!
//! - blobs -- raw content (file contents), stored as [`ObjectKind::Blob`]
//! - [`Tree`] -- directory listing mapping names to object references
//! - commits are stored as [`ObjectKind::Commit`] payloads and decoded by
//!   `sprig-graph`
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`FsObjectStore`] -- one file per object under the repository directory
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Writes of an existing object are no-ops.
//! 3. There is no update or delete.
//! 4. The store never interprets payloads; typed views live in [`object`].
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{EntryKind, ObjectKind, StoredObject, Tree, TreeEntry};
pub use traits::ObjectStore;

//! Reference management for sprig.
//!
//! References are the human-readable entry points into the commit graph:
//! branches, tags and `HEAD`. A ref holds either an object id (direct) or
//! the name of another ref (symbolic).
//!
//! # Namespace
//!
//! - **HEAD** names the current branch symbolically, or holds a commit id
//!   directly when detached.
//! - **Branches** live under `refs/heads/` and move as commits are made.
//! - **Tags** live under `refs/tags/`.
//!
//! # Modules
//!
//! - [`error`] -- Error types for ref operations
//! - [`types`] -- [`RefValue`] and [`Head`]
//! - [`traits`] -- The [`RefStore`] trait, including revision resolution
//! - [`names`] -- Branch/tag name validation
//! - [`fs`] -- [`FsRefStore`], one file per ref
//! - [`memory`] -- In-memory [`InMemoryRefStore`] for tests

pub mod error;
pub mod fs;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{RefError, Result};
pub use fs::FsRefStore;
pub use memory::InMemoryRefStore;
pub use names::{validate_branch_name, validate_ref_path, validate_tag_name};
pub use traits::{RefStore, RESOLVE_PREFIXES};
pub use types::{Head, RefValue, HEAD, HEADS_PREFIX, SYMBOLIC_PREFIX, TAGS_PREFIX};

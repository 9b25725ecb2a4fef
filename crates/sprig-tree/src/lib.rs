//! Tree codec for sprig.
//!
//! Maps a working directory to a canonical tree object and back:
//!
//! - [`snapshot`] walks a directory into an owned [`DirNode`]
//! - [`write_tree`] stores a snapshot bottom-up and returns the root tree id
//! - [`flatten`] expands a stored tree into `path -> blob id`
//! - [`read_tree`] replaces a directory's contents with a stored tree
//!
//! Names in the [`IgnoreSet`] (the repository directory, `.git`, and any
//! configured extras) are never stored and never touched on disk.

pub mod codec;
pub mod error;
pub mod ignore;
pub mod node;

pub use codec::{clear_dir, flatten, load_tree, read_tree, write_dir, write_tree};
pub use error::{TreeError, TreeResult};
pub use ignore::{IgnoreSet, ALWAYS_IGNORED};
pub use node::{snapshot, DirNode, Node};

//! Owned snapshots of a working directory.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{TreeError, TreeResult};
use crate::ignore::IgnoreSet;

/// One entry of a directory snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A file, by its absolute path on disk.
    File(PathBuf),
    /// A subdirectory.
    Dir(DirNode),
}

/// A directory: children keyed by name, in name order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirNode {
    pub children: BTreeMap<String, Node>,
}

impl DirNode {
    /// Create an empty directory node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files anywhere below this node.
    pub fn file_count(&self) -> usize {
        self.children
            .values()
            .map(|child| match child {
                Node::File(_) => 1,
                Node::Dir(dir) => dir.file_count(),
            })
            .sum()
    }

    /// Place `node` at `relative`, creating intermediate directories.
    fn insert(&mut self, relative: &Path, node: Node) -> TreeResult<()> {
        let mut names = Vec::new();
        for component in relative.components() {
            let Component::Normal(part) = component else {
                return Err(TreeError::PathOutsideRoot(relative.to_path_buf()));
            };
            names.push(entry_name(relative, part.to_str())?);
        }
        let Some(leaf) = names.pop() else {
            return Ok(());
        };

        let mut dir = self;
        for name in names {
            dir = match dir
                .children
                .entry(name)
                .or_insert_with(|| Node::Dir(DirNode::new()))
            {
                Node::Dir(sub) => sub,
                Node::File(_) => {
                    return Err(TreeError::InvalidName {
                        path: relative.to_path_buf(),
                        reason: "parent is a file".into(),
                    })
                }
            };
        }
        dir.children.insert(leaf, node);
        Ok(())
    }
}

/// Validate a single file name for use as a tree entry.
fn entry_name(path: &Path, name: Option<&str>) -> TreeResult<String> {
    let invalid = |reason: &str| TreeError::InvalidName {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };
    let name = name.ok_or_else(|| invalid("name is not valid UTF-8"))?;
    if name.contains('\n') {
        return Err(invalid("name contains a newline"));
    }
    Ok(name.to_string())
}

/// Walk `dir` into an owned [`DirNode`], pruning ignored names.
///
/// Symlinks are not followed; they are snapshotted as files.
pub fn snapshot(dir: &Path, ignore: &IgnoreSet) -> TreeResult<DirNode> {
    let mut root = DirNode::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !ignore.is_ignored(entry.file_name()));

    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| TreeError::PathOutsideRoot(entry.path().to_path_buf()))?;
        let node = if entry.file_type().is_dir() {
            Node::Dir(DirNode::new())
        } else {
            Node::File(entry.path().to_path_buf())
        };
        root.insert(relative, node)?;
    }
    Ok(root)
}

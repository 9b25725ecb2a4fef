//! Conversion between working directories and tree objects.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use sprig_store::{EntryKind, ObjectKind, ObjectStore, StoreError, Tree, TreeEntry};
use sprig_types::ObjectId;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{TreeError, TreeResult};
use crate::ignore::IgnoreSet;
use crate::node::{snapshot, DirNode, Node};

/// Store the contents of `dir` and return the id of its root tree.
///
/// Files become blobs and directories become trees, written bottom-up.
/// Running this twice over an unchanged directory yields the same id.
pub fn write_tree(store: &dyn ObjectStore, dir: &Path, ignore: &IgnoreSet) -> TreeResult<ObjectId> {
    let root = snapshot(dir, ignore)?;
    let id = write_dir(store, &root)?;
    debug!(tree = %id.short_hex(), files = root.file_count(), "wrote tree");
    Ok(id)
}

/// Store one directory node and everything below it.
pub fn write_dir(store: &dyn ObjectStore, node: &DirNode) -> TreeResult<ObjectId> {
    let mut entries = Vec::with_capacity(node.children.len());
    for (name, child) in &node.children {
        let entry = match child {
            Node::File(path) => {
                let data = fs::read(path)?;
                TreeEntry::blob(name.clone(), store.put(ObjectKind::Blob, &data)?)
            }
            Node::Dir(sub) => TreeEntry::tree(name.clone(), write_dir(store, sub)?),
        };
        entries.push(entry);
    }
    Ok(store.write(&Tree::new(entries).to_stored_object())?)
}

/// Load and decode the tree stored under `id`.
pub fn load_tree(store: &dyn ObjectStore, id: &ObjectId) -> TreeResult<Tree> {
    let stored = store.load(id)?;
    Ok(Tree::from_stored_object(&stored)?)
}

/// Expand a tree into every file path below it and the blob it holds.
///
/// Nested trees are merged under their directory name. Empty subtrees
/// contribute nothing.
pub fn flatten(store: &dyn ObjectStore, tree: &ObjectId) -> TreeResult<BTreeMap<PathBuf, ObjectId>> {
    let mut files = BTreeMap::new();
    flatten_into(store, tree, Path::new(""), &mut files)?;
    Ok(files)
}

fn flatten_into(
    store: &dyn ObjectStore,
    tree: &ObjectId,
    prefix: &Path,
    files: &mut BTreeMap<PathBuf, ObjectId>,
) -> TreeResult<()> {
    for entry in load_tree(store, tree)?.entries {
        let path = prefix.join(&entry.name);
        if entry.name == "." || entry.name == ".." {
            return Err(TreeError::PathOutsideRoot(path));
        }
        match entry.kind {
            EntryKind::Blob => {
                files.insert(path, entry.object_id);
            }
            EntryKind::Tree => flatten_into(store, &entry.object_id, &path, files)?,
        }
    }
    Ok(())
}

/// Replace the contents of `dir` with the tree stored under `tree`.
///
/// The tree is fully expanded and every blob checked for presence before
/// anything on disk is touched. Then every non-ignored file in `dir` is
/// removed, directories left empty are removed, and the tree's files are
/// written back with their parent directories.
pub fn read_tree(
    store: &dyn ObjectStore,
    tree: &ObjectId,
    dir: &Path,
    ignore: &IgnoreSet,
) -> TreeResult<()> {
    let files = flatten(store, tree)?;
    for id in files.values() {
        if !store.exists(id)? {
            return Err(StoreError::NotFound(*id).into());
        }
    }

    clear_dir(dir, ignore)?;

    for (relative, id) in &files {
        if ignore.is_ignored_path(relative) {
            debug!(path = %relative.display(), "skipping ignored tree entry");
            continue;
        }
        let target = dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, store.get(id, Some(ObjectKind::Blob))?)?;
    }
    debug!(tree = %tree.short_hex(), files = files.len(), "checked out tree");
    Ok(())
}

/// Remove every non-ignored file under `dir`, then every directory that
/// ends up empty. Ignored entries and their contents are left alone.
pub fn clear_dir(dir: &Path, ignore: &IgnoreSet) -> TreeResult<()> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| !ignore.is_ignored(entry.file_name()));

    let mut dirs = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    // Pre-order walk: reversed, every child directory precedes its parent.
    for path in dirs.iter().rev() {
        if fs::read_dir(path)?.next().is_none() {
            fs::remove_dir(path)?;
        }
    }
    Ok(())
}

//! File-backed reference store.
//!
//! Every ref is a small text file under the repository directory: `HEAD` at
//! the root, branches under `refs/heads/`, tags under `refs/tags/`. The file
//! holds either a hex object id or `ref: <name>`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::error::{RefError, Result};
use crate::names::validate_ref_path;
use crate::traits::RefStore;
use crate::types::{RefValue, HEAD};

/// Reference store rooted at a repository metadata directory.
///
/// Writes go through a temporary file in the destination directory followed
/// by a rename, so a concurrent reader sees either the old or the new value.
/// There is no compare-and-swap: two writers racing on one ref end with the
/// last rename.
#[derive(Debug, Clone)]
pub struct FsRefStore {
    root: PathBuf,
}

impl FsRefStore {
    /// Create a store over `root` (the directory containing `HEAD`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The repository metadata directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ref_path(&self, name: &str) -> Result<PathBuf> {
        validate_ref_path(name)?;
        Ok(self.root.join(name))
    }
}

impl RefStore for FsRefStore {
    fn read_raw(&self, name: &str) -> Result<Option<RefValue>> {
        let path = self.ref_path(name)?;
        // Directories such as `refs/heads` are namespaces, not refs.
        if !path.is_file() {
            return Ok(None);
        }
        let value = RefValue::parse(&fs::read_to_string(&path)?);
        if value.target.is_empty() {
            return Err(RefError::InvalidRefValue {
                name: name.to_string(),
            });
        }
        Ok(Some(value))
    }

    fn write_raw(&self, name: &str, value: &RefValue) -> Result<()> {
        let path = self.ref_path(name)?;
        let parent = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(value.encode().as_bytes())?;
        tmp.persist(&path).map_err(|e| RefError::Io(e.error))?;
        Ok(())
    }

    fn ref_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        if self.root.join(HEAD).is_file() {
            names.push(HEAD.to_string());
        }

        let refs_dir = self.root.join("refs");
        if !refs_dir.is_dir() {
            return Ok(names);
        }
        for entry in WalkDir::new(&refs_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| RefError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            // Skip in-flight temp files and anything else hidden.
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            names.push(name);
        }
        Ok(names)
    }
}

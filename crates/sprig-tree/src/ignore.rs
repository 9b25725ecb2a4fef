//! Names skipped when snapshotting or clearing a working directory.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::Path;

/// Names that are always ignored besides the repository directory itself.
pub const ALWAYS_IGNORED: &[&str] = &[".git"];

/// A set of file and directory names excluded from trees.
///
/// Matching is by exact name at any depth: ignoring `target` skips every
/// entry called `target`, file or directory, and everything beneath it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    names: BTreeSet<String>,
}

impl IgnoreSet {
    /// The default set for a repository whose metadata lives in `meta_dir`.
    pub fn new(meta_dir: impl Into<String>) -> Self {
        let mut names: BTreeSet<String> = ALWAYS_IGNORED.iter().map(|s| s.to_string()).collect();
        names.insert(meta_dir.into());
        Self { names }
    }

    /// Add extra names, typically from repository configuration.
    pub fn with_names<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(extra.into_iter().map(Into::into));
        self
    }

    /// Returns `true` if an entry with this file name is ignored.
    pub fn is_ignored(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.names.contains(n))
    }

    /// Returns `true` if any component of a relative path is ignored.
    pub fn is_ignored_path(&self, relative: &Path) -> bool {
        relative.iter().any(|part| self.is_ignored(part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set() {
        let ignore = IgnoreSet::new(".sprig");
        assert!(ignore.is_ignored(OsStr::new(".sprig")));
        assert!(ignore.is_ignored(OsStr::new(".git")));
        assert!(!ignore.is_ignored(OsStr::new("src")));
        assert!(!ignore.is_ignored(OsStr::new(".sprig-backup")));
    }

    #[test]
    fn extra_names_and_paths() {
        let ignore = IgnoreSet::new(".sprig").with_names(["target"]);
        assert!(ignore.is_ignored_path(Path::new("a/target/b.txt")));
        assert!(!ignore.is_ignored_path(Path::new("a/targets/b.txt")));
    }
}

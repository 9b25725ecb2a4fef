//! Per-repository configuration stored as `config.toml`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// File name of the configuration inside the repository directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Repository configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Branch HEAD names in a fresh repository.
    pub default_branch: String,
    /// Extra file or directory names left out of trees.
    pub ignore: Vec<String>,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            default_branch: "master".into(),
            ignore: Vec::new(),
        }
    }
}

impl RepoConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> SdkResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))
    }

    /// Write to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> SdkResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = RepoConfig::default();
        assert_eq!(c.default_branch, "master");
        assert!(c.ignore.is_empty());
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let c = RepoConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(c, RepoConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "ignore = [\"target\", \"node_modules\"]\n").unwrap();
        let c = RepoConfig::load(&path).unwrap();
        assert_eq!(c.default_branch, "master");
        assert_eq!(c.ignore, ["target", "node_modules"]);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let c = RepoConfig {
            default_branch: "main".into(),
            ignore: vec!["build".into()],
        };
        c.save(&path).unwrap();
        assert_eq!(RepoConfig::load(&path).unwrap(), c);
    }

    #[test]
    fn garbage_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "default_branch = [").unwrap();
        assert!(matches!(RepoConfig::load(&path), Err(SdkError::Config(_))));
    }
}

//! Absolute project layout derived from `[app]` and `[build]`.

use std::path::{Path, PathBuf};

/// Resolved directories and artifact paths for one project.
///
/// Everything the supervisor touches on disk goes through this type, so
/// tests can point it at a temporary directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    pub controllers: PathBuf,
    pub source: PathBuf,
    pub assets: PathBuf,
    pub config: PathBuf,
    pub genfiles: PathBuf,
    pub binary: PathBuf,
    pub server_file: PathBuf,
}

impl Layout {
    /// Layout with the default relative paths under `root`.
    pub fn with_root(root: &Path) -> Self {
        let mut config = super::DevConfig::default();
        config.root = root.to_path_buf();
        config.layout()
    }

    /// Directories registered with the watcher.
    pub fn watch_roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.source.clone()];
        for dir in [&self.assets, &self.config] {
            if !roots.iter().any(|r| dir.starts_with(r)) {
                roots.push(dir.clone());
            }
        }
        roots
    }
}

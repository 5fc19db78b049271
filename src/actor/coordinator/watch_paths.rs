use std::path::PathBuf;

use crate::config::DevConfig;

/// Source, assets and configuration directories plus the config file.
///
/// Roots that do not exist yet are kept; the watcher attaches them once
/// they appear.
pub(super) fn collect_watch_paths(config: &DevConfig) -> Vec<PathBuf> {
    let layout = config.layout();
    let mut paths = layout.watch_roots();

    if !config.config_path.as_os_str().is_empty()
        && !paths.iter().any(|root| config.config_path.starts_with(root))
    {
        paths.push(config.config_path.clone());
    }

    paths
}

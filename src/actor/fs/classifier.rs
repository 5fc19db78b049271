use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::types::{ChangeKind, ClassifiedEvents, Verdict};
use crate::config::{DevConfig, WatchConfig};

/// Decides which changes are worth a restart.
#[derive(Debug, Clone)]
pub(super) struct EventClassifier {
    assets: PathBuf,
    genfiles: PathBuf,
    watch: WatchConfig,
}

impl EventClassifier {
    pub(super) fn from_config(config: &DevConfig) -> Self {
        let layout = config.layout();
        Self {
            assets: layout.assets,
            genfiles: layout.genfiles,
            watch: config.watch.clone(),
        }
    }

    #[cfg(test)]
    pub(super) fn new(assets: PathBuf, genfiles: PathBuf, ignored_exts: &[&str]) -> Self {
        Self {
            assets,
            genfiles,
            watch: WatchConfig {
                ignore_asset_extensions: ignored_exts.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
        }
    }

    /// Verdict for a single path.
    ///
    /// Script files under the assets tree are served as-is by the backend,
    /// so they never need a rebuild.
    pub(super) fn verdict(&self, path: &Path) -> Verdict {
        if path.starts_with(&self.genfiles) {
            return Verdict::Ignore;
        }
        if path.starts_with(&self.assets) && self.is_ignored_ext(path) {
            return Verdict::LogOnly;
        }
        Verdict::Restart
    }

    fn is_ignored_ext(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.watch.is_ignored_asset_ext(ext))
    }

    /// Split raw debounced changes by verdict.
    ///
    /// Kinds are reconciled with the filesystem first: atomic saves often
    /// report `Removed` for a file that exists again by the time we look.
    pub(super) fn classify(&self, raw: FxHashMap<PathBuf, ChangeKind>) -> Option<ClassifiedEvents> {
        let mut events = ClassifiedEvents::default();

        for (path, kind) in raw {
            let Some(kind) = correct_by_existence(&path, kind) else {
                continue;
            };
            match self.verdict(&path) {
                Verdict::Restart => events.restart.push((path, kind)),
                Verdict::LogOnly => events.log_only.push((path, kind)),
                Verdict::Ignore => {
                    crate::debug!("watch"; "ignored: {}", path.display());
                }
            }
        }

        events.restart.sort_by(|a, b| a.0.cmp(&b.0));
        events.log_only.sort_by(|a, b| a.0.cmp(&b.0));
        (!events.is_empty()).then_some(events)
    }
}

/// Reconcile an event kind with what is on disk now.
fn correct_by_existence(path: &Path, kind: ChangeKind) -> Option<ChangeKind> {
    let exists = path.exists();
    match kind {
        ChangeKind::Created if !exists => {
            crate::debug!("watch"; "discard created (gone): {}", path.display());
            None
        }
        ChangeKind::Modified if !exists => Some(ChangeKind::Removed),
        ChangeKind::Removed if exists => Some(ChangeKind::Modified),
        _ => Some(kind),
    }
}

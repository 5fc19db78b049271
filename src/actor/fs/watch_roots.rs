use std::path::PathBuf;

use notify::{RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

/// Keeps the configured roots registered with the watcher.
///
/// Directory roots are watched recursively, so subdirectories created
/// later are observed as well. A root that does not exist yet (or was
/// deleted) is attached once it appears.
pub(super) struct WatchRoots {
    desired: Vec<PathBuf>,
    attached: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            desired: paths,
            attached: FxHashSet::default(),
        }
    }

    /// Register every root that exists now. Missing roots are skipped.
    pub(super) fn attach_existing<W: Watcher>(&mut self, watcher: &mut W) -> notify::Result<()> {
        for path in self.desired.iter().filter(|p| p.exists()) {
            watcher.watch(path, mode_for(path))?;
            crate::debug!("watch"; "watching {}", path.display());
            self.attached.insert(path.clone());
        }
        Ok(())
    }

    /// Forget vanished roots and attach roots that (re)appeared.
    pub(super) fn maintain<W: Watcher>(&mut self, watcher: &mut W) {
        self.attached.retain(|path| path.exists());

        for path in &self.desired {
            if self.attached.contains(path) || !path.exists() {
                continue;
            }
            match watcher.watch(path, mode_for(path)) {
                Ok(()) => {
                    self.attached.insert(path.clone());
                    crate::debug!("watch"; "re-attached watch: {}", path.display());
                }
                Err(e) => crate::debug!("watch"; "cannot watch {}: {}", path.display(), e),
            }
        }
    }

    #[cfg(test)]
    pub(super) fn attached_count(&self) -> usize {
        self.attached.len()
    }
}

fn mode_for(path: &std::path::Path) -> RecursiveMode {
    if path.is_dir() {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    }
}

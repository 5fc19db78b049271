use std::path::PathBuf;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// How a changed path affects the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Verdict {
    /// Rebuild and relaunch
    Restart,
    /// Front-end asset the backend does not compile; logged only
    LogOnly,
    /// Generated artifacts and other noise
    Ignore,
}

/// Debounced changes, split by verdict
#[derive(Debug, Default)]
pub(super) struct ClassifiedEvents {
    pub(super) restart: Vec<(PathBuf, ChangeKind)>,
    pub(super) log_only: Vec<(PathBuf, ChangeKind)>,
}

impl ClassifiedEvents {
    pub(super) fn is_empty(&self) -> bool {
        self.restart.is_empty() && self.log_only.is_empty()
    }
}

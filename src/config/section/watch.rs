//! `[watch]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! ignore_asset_extensions = ["js"]  # Logged only, no restart
//! debounce_ms = 300
//! ```

use serde::{Deserialize, Serialize};

/// File watcher settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WatchConfig {
    /// Extensions (without dot) of asset files that never trigger a restart.
    pub ignore_asset_extensions: Vec<String>,

    /// Quiet period before a burst of events becomes one restart.
    pub debounce_ms: u64,
}

impl WatchConfig {
    /// Whether `ext` is one of the restart-exempt asset extensions.
    pub fn is_ignored_asset_ext(&self, ext: &str) -> bool {
        self.ignore_asset_extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            ignore_asset_extensions: vec!["js".into()],
            debounce_ms: 300,
        }
    }
}

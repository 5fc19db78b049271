//! `[app]` section configuration.
//!
//! Describes where the application keeps its sources. All paths are
//! relative to the project root (the directory holding `ego.toml`).
//!
//! # Example
//!
//! ```toml
//! [app]
//! name = "shop"                   # Defaults to the project directory name
//! controllers = "app/controllers" # Inspected for actions (non-recursive)
//! source = "app"                  # Watched recursively
//! assets = "assets"               # Watched; script edits do not restart
//! config = "conf"                 # Watched recursively
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application layout settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Application name passed to the server template.
    /// Empty means "use the project directory name".
    pub name: String,

    /// Controllers directory.
    pub controllers: PathBuf,

    /// Application source root.
    pub source: PathBuf,

    /// Front-end assets root.
    pub assets: PathBuf,

    /// Configuration directory.
    pub config: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            controllers: PathBuf::from("app/controllers"),
            source: PathBuf::from("app"),
            assets: PathBuf::from("assets"),
            config: PathBuf::from("conf"),
        }
    }
}

//! Actor Message Definitions
//!
//! ```text
//! FsActor --Restart--> SupervisorActor
//! ```

use std::path::PathBuf;

/// Messages to Supervisor Actor
#[derive(Debug)]
pub enum SupervisorMsg {
    /// Rebuild and relaunch the backend
    Restart {
        /// Paths that triggered the restart (empty for the initial start)
        changed: Vec<PathBuf>,
    },
    /// Stop the backend and exit the actor loop
    Shutdown,
}

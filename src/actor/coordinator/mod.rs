//! Actor Coordinator - wires up the watch/restart actor system
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels
//! - Wires up actors
//! - Queues the initial build
//! - Runs them until shutdown

mod runtime;
mod watch_paths;

use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::messages::SupervisorMsg;
use super::supervisor::SupervisorActor;
use crate::config::DevConfig;
use crate::supervisor::Supervisor;

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    config: Arc<DevConfig>,
    supervisor: Option<Arc<Supervisor>>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    /// Create from Arc<DevConfig>.
    pub fn with_config(config: Arc<DevConfig>) -> Self {
        Self {
            config,
            supervisor: None,
            shutdown_rx: None,
        }
    }

    /// Use an existing supervisor instead of one built from the config.
    pub fn with_supervisor(mut self, supervisor: Arc<Supervisor>) -> Self {
        self.supervisor = Some(supervisor);
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system until shutdown.
    pub async fn run(mut self) -> Result<()> {
        let (supervisor_tx, supervisor_rx) = mpsc::channel::<SupervisorMsg>(CHANNEL_BUFFER);

        let supervisor = self
            .supervisor
            .take()
            .unwrap_or_else(|| Arc::new(Supervisor::from_config(&self.config)));

        // Watcher first: edits made during the initial build still count.
        let watch_paths = watch_paths::collect_watch_paths(&self.config);
        let fs_actor = FsActor::new(watch_paths, supervisor_tx.clone(), &self.config)
            .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;
        let supervisor_actor = SupervisorActor::new(supervisor_rx, supervisor);

        supervisor_tx
            .send(SupervisorMsg::Restart { changed: vec![] })
            .await
            .map_err(|_| anyhow::anyhow!("supervisor actor is not running"))?;

        crate::debug!("actor"; "start");
        let shutdown_rx = self.shutdown_rx.take();
        runtime::run_actors(fs_actor, supervisor_actor, supervisor_tx, shutdown_rx).await?;

        crate::debug!("actor"; "stopped");
        Ok(())
    }
}

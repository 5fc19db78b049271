//! Supervisor Actor
//!
//! Owns the receiving end of restart requests and drives the process
//! supervisor. `restart()` stops the live backend synchronously, so it runs
//! on the blocking pool and requests are handled strictly in order.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::messages::SupervisorMsg;
use crate::supervisor::Supervisor;
use crate::utils::path::display_relative;

pub struct SupervisorActor {
    rx: mpsc::Receiver<SupervisorMsg>,
    supervisor: Arc<Supervisor>,
}

impl SupervisorActor {
    pub fn new(rx: mpsc::Receiver<SupervisorMsg>, supervisor: Arc<Supervisor>) -> Self {
        Self { rx, supervisor }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                SupervisorMsg::Restart { changed } => {
                    self.log_trigger(&changed);
                    let supervisor = Arc::clone(&self.supervisor);
                    if let Err(e) = tokio::task::spawn_blocking(move || supervisor.restart()).await
                    {
                        crate::log!("error"; "restart task failed: {}", e);
                    }
                }
                SupervisorMsg::Shutdown => break,
            }
        }

        let supervisor = Arc::clone(&self.supervisor);
        let _ = tokio::task::spawn_blocking(move || supervisor.shutdown()).await;
        crate::debug!("actor"; "supervisor stopped");
    }

    fn log_trigger(&self, changed: &[std::path::PathBuf]) {
        let root = &self.supervisor.settings().layout.root;
        match changed {
            [] => {}
            [one] => crate::log!("watch"; "changed: {}", display_relative(one, root)),
            [first, rest @ ..] => crate::log!(
                "watch"; "changed: {} (+{} more)",
                display_relative(first, root),
                rest.len()
            ),
        }
    }
}

use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::fs::FsActor;
use crate::actor::messages::SupervisorMsg;
use crate::actor::supervisor::SupervisorActor;

/// How long the supervisor gets to stop the backend on the way out.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Run all actors concurrently.
pub(super) async fn run_actors(
    fs: FsActor,
    supervisor: SupervisorActor,
    supervisor_tx: mpsc::Sender<SupervisorMsg>,
    shutdown_rx: Option<Receiver<()>>,
) -> Result<()> {
    let supervisor_handle = tokio::spawn(async move { supervisor.run().await });
    let fs_handle = tokio::spawn(async move { fs.run().await });

    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() || crate::core::is_shutdown() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            if fs_handle.is_finished() {
                crate::log!("watch"; "watcher stopped unexpectedly");
                crate::core::request_shutdown(1);
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    } else {
        let _ = fs_handle.await;
    }

    crate::debug!("actor"; "sending shutdown to supervisor");
    let _ = supervisor_tx.send(SupervisorMsg::Shutdown).await;
    let _ = tokio::time::timeout(STOP_TIMEOUT, supervisor_handle).await;

    Ok(())
}

//! `ego serve`: proxy, watcher and supervisor together.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::Result;
use crossbeam::channel::Receiver;

use crate::{
    actor::Coordinator,
    config::{DevConfig, cfg},
    debug, log,
    proxy::BoundProxy,
    supervisor::Supervisor,
};

/// Run until Ctrl+C or a fatal supervisor error.
pub fn serve() -> Result<()> {
    let config = cfg();
    let proxy = BoundProxy::bind(&config)?;
    let supervisor = Arc::new(Supervisor::from_config(&config));

    let actors = spawn_actors(
        Arc::clone(&config),
        Arc::clone(&supervisor),
        proxy.shutdown_signal(),
    )?;
    debug!("serve"; "accepting on {}", proxy.addr());
    proxy.run();

    wait_for_shutdown(actors);
    supervisor.shutdown();
    log!("serve"; "stopped");
    Ok(())
}

/// Run the actor system on its own runtime thread.
fn spawn_actors(
    config: Arc<DevConfig>,
    supervisor: Arc<Supervisor>,
    shutdown_rx: Receiver<()>,
) -> Result<JoinHandle<()>> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let handle = thread::Builder::new()
        .name("ego-actors".into())
        .spawn(move || {
            rt.block_on(async {
                let coordinator = Coordinator::with_config(config)
                    .with_supervisor(supervisor)
                    .with_shutdown_signal(shutdown_rx);
                if let Err(e) = coordinator.run().await {
                    log!("actor"; "error: {:#}", e);
                    crate::core::request_shutdown(1);
                }
            });
        })?;
    Ok(handle)
}

/// Wait for the actor system to wind down (max 2 seconds).
fn wait_for_shutdown(handle: JoinHandle<()>) {
    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
    debug!("actor"; "still running after shutdown, leaving it behind");
}

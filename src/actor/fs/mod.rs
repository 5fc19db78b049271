//! FileSystem Actor
//!
//! Watches the project for changes and asks the supervisor for a restart.
//! The watcher is attached before the first build starts, so edits made
//! while it runs are not lost.
//!
//! Architecture:
//! ```text
//! Watcher → Debouncer (pure timing) → Classifier (restart / log-only / ignore) → SupervisorMsg
//! ```

use std::path::PathBuf;
use std::time::Duration;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use super::messages::SupervisorMsg;
use crate::config::DevConfig;

// Restart / log-only / ignore decision per path.
mod classifier;
// Pure timing and deduplication.
mod debouncer;
// Classified events -> SupervisorMsg.
mod router;
// Shared fs event types.
mod types;
// Watch root attach/re-attach lifecycle.
mod watch_roots;


use classifier::EventClassifier;
use debouncer::Debouncer;
use router::{events_to_message, log_events};
use watch_roots::WatchRoots;

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// Watch-root consistency layer (attach/re-attach root directories)
    watch_roots: WatchRoots,
    /// Channel to send messages to SupervisorActor
    supervisor_tx: mpsc::Sender<SupervisorMsg>,
    debouncer: Debouncer,
    classifier: EventClassifier,
}

impl FsActor {
    /// Create the watcher and attach every existing root immediately.
    pub fn new(
        paths: Vec<PathBuf>,
        supervisor_tx: mpsc::Sender<SupervisorMsg>,
        config: &DevConfig,
    ) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut watch_roots = WatchRoots::new(paths);
        watch_roots.attach_existing(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            supervisor_tx,
            debouncer: Debouncer::new(Duration::from_millis(config.watch.debounce_ms)),
            classifier: EventClassifier::from_config(config),
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let Self {
            notify_rx,
            mut watcher,
            mut watch_roots,
            supervisor_tx,
            mut debouncer,
            classifier,
        } = self;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // notify delivers on a std channel; bridge it into tokio
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => debouncer.add_event(&event),
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    watch_roots.maintain(&mut watcher);
                    if process_changes(&mut debouncer, &classifier, &supervisor_tx).await.is_err() {
                        break;
                    }
                }
            }
        }
        crate::debug!("actor"; "watcher stopped");
    }
}

/// Flush debounced changes into at most one restart request.
///
/// Returns `Err(())` once the SupervisorActor is gone.
async fn process_changes(
    debouncer: &mut Debouncer,
    classifier: &EventClassifier,
    supervisor_tx: &mpsc::Sender<SupervisorMsg>,
) -> Result<(), ()> {
    if crate::core::is_shutdown() {
        return Err(());
    }

    let Some(raw) = debouncer.take_if_ready() else {
        return Ok(());
    };
    let Some(events) = classifier.classify(raw) else {
        return Ok(());
    };

    log_events(&events);

    if let Some(msg) = events_to_message(events) {
        supervisor_tx.send(msg).await.map_err(|_| ())?;
    }
    Ok(())
}

//! Process-wide run state.
//!
//! - `SHUTDOWN`: has shutdown been requested? (Ctrl+C or a fatal error)
//! - `EXIT_CODE`: status the process leaves with once everything stopped

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// Shutdown has been requested
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Exit status recorded by the first shutdown request
static EXIT_CODE: AtomicI32 = AtomicI32::new(0);

/// Proxy server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Shutdown signal sender for actor system
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - Before `register_server()`: exit immediately, nothing is running yet
/// - After `register_server()`: graceful shutdown (unblock proxy, notify actors)
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if SERVER.get().is_none() {
            std::process::exit(130);
        }
        crate::log!("serve"; "shutting down...");
        request_shutdown(0);
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the proxy server for graceful shutdown
///
/// Call this after binding the server, before entering the request loop
pub fn register_server(server: Arc<Server>, shutdown_tx: crossbeam::channel::Sender<()>) {
    let _ = SERVER.set(server);
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Stop serving and wind down the actor system.
///
/// Only the first request decides the exit code.
pub fn request_shutdown(code: i32) {
    if SHUTDOWN.swap(true, Ordering::SeqCst) {
        return;
    }
    EXIT_CODE.store(code, Ordering::SeqCst);

    if let Some(tx) = SHUTDOWN_TX.get() {
        let _ = tx.send(());
    }
    if let Some(server) = SERVER.get() {
        server.unblock();
    }
}

/// Check if shutdown has been requested
///
/// Uses Relaxed ordering - worst case a poll loop runs one more round.
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Exit status for `main`.
pub fn exit_code() -> i32 {
    EXIT_CODE.load(Ordering::SeqCst)
}

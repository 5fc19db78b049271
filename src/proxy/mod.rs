//! Reverse proxy front.
//!
//! Listens on the public port and forwards everything to the fixed backend
//! port. It keeps no state about which backend is behind that port, so a
//! diagnostic server can replace the application without the browser
//! noticing anything but the page content.

mod forward;
mod headers;


pub use forward::Forwarder;

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    thread,
};

use anyhow::Result;
use crossbeam::channel;
use tiny_http::Server;

use crate::{config::DevConfig, log};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, trying the next ports when
/// the requested one is taken.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..MAX_PORT_RETRIES {
        let Some(port) = base_port.checked_add(offset) else {
            break;
        };
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("proxy"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts starting at port {}: {}",
        MAX_PORT_RETRIES,
        base_port,
        last_error.map_or_else(|| "port range exhausted".to_string(), |e| e.to_string())
    ))
}

/// Proxy bound to its public address, not yet accepting requests.
pub struct BoundProxy {
    server: Arc<Server>,
    addr: SocketAddr,
    forwarder: Arc<Forwarder>,
    shutdown_rx: channel::Receiver<()>,
}

impl BoundProxy {
    /// Bind the public port and register the server for graceful shutdown.
    pub fn bind(config: &DevConfig) -> Result<Self> {
        let (server, addr) = bind_with_retry(config.serve.interface, config.serve.port)?;
        let server = Arc::new(server);
        let forwarder = Arc::new(Forwarder::new(config.serve.backend_url())?);

        let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
        crate::core::register_server(Arc::clone(&server), shutdown_tx);

        log!("proxy"; "http://{} -> {}", addr, forwarder.backend());
        Ok(Self {
            server,
            addr,
            forwarder,
            shutdown_rx,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Receiver notified once shutdown is requested.
    pub fn shutdown_signal(&self) -> channel::Receiver<()> {
        self.shutdown_rx.clone()
    }

    /// Run the request loop until the server is unblocked.
    pub fn run(self) {
        serve(&self.server, self.forwarder);
    }
}

/// Accept requests until the server is unblocked, one worker per request.
pub fn serve(server: &Server, forwarder: Arc<Forwarder>) {
    for request in server.incoming_requests() {
        if crate::core::is_shutdown() {
            let _ = request.respond(
                tiny_http::Response::from_string("shutting down")
                    .with_status_code(tiny_http::StatusCode(503)),
            );
            continue;
        }

        let forwarder = Arc::clone(&forwarder);
        let spawned = thread::Builder::new()
            .name("ego-proxy".into())
            .spawn(move || {
                if let Err(e) = forwarder.handle(request) {
                    log!("proxy"; "request error: {:#}", e);
                }
            });
        if let Err(e) = spawned {
            log!("proxy"; "cannot spawn request worker: {}", e);
        }
    }
}

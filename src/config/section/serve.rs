//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Interface the public proxy binds
//! port = 8080                 # Public proxy port (open this in the browser)
//! backend_port = 5000         # Local port every backend is started on
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the proxy accessible from LAN.
//! The backend always listens on its own port; only the proxy is public.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

/// Proxy and backend port settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind the proxy on.
    pub interface: IpAddr,

    /// Public proxy port.
    pub port: u16,

    /// Fixed local backend port.
    pub backend_port: u16,
}

impl ServeConfig {
    /// Address the proxy listens on.
    pub fn public_addr(&self) -> SocketAddr {
        SocketAddr::new(self.interface, self.port)
    }

    /// Base URL requests are forwarded to.
    pub fn backend_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.backend_port)
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8080,
            backend_port: 5000,
        }
    }
}

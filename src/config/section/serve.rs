//! `[serve]` section configuration.
//!
//! Contains development server settings.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 8080                 # HTTP port number
//! watch = true                # Auto-rebuild on file changes
//! reload_port = 35729         # WebSocket port for live reload
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use std::net::{IpAddr, Ipv4Addr};

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

const RELOAD_PORT: FieldPath = FieldPath::new("serve.reload_port");

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Enable file watcher for live reload.
    pub watch: bool,

    /// WebSocket port the injected reload client connects to.
    pub reload_port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8080,
            watch: true,
            reload_port: 35729,
        }
    }
}

impl ServeConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.reload_port == self.port && self.port != 0 {
            diag.error_with_hint(
                RELOAD_PORT,
                format!("reload port {} collides with the http port", self.port),
                "pick a different `serve.reload_port`",
            );
        }
    }
}

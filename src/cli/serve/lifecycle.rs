//! Server lifecycle: binding, the watcher thread and shutdown.

use crate::{config::SiteConfig, core::BuildEnv, log, reload::LiveReload, watch};
use anyhow::{Result, anyhow};
use crossbeam::channel::Receiver;
use std::{
    net::{IpAddr, SocketAddr},
    thread::{self, JoinHandle},
    time::Duration,
};
use tiny_http::Server;
use tokio::sync::oneshot;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to `interface`, trying successive ports from `base_port`.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..MAX_PORT_RETRIES {
        let addr = SocketAddr::new(interface, base_port.saturating_add(offset));
        match Server::http(addr) {
            Ok(server) => {
                // port 0 lets the OS choose
                let addr = server.server_addr().to_ip().unwrap_or(addr);
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, addr.port());
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(anyhow!(
        "failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Start the watch loop on its own tokio runtime.
///
/// The loop stops when `shutdown_rx` receives (Ctrl+C) or disconnects.
pub fn spawn_watcher(
    config: &SiteConfig,
    env: BuildEnv,
    reload: LiveReload,
    shutdown_rx: Receiver<()>,
) -> Result<JoinHandle<()>> {
    let root = &config.root;
    let session = watch::start(config)
        .map_err(|e| anyhow!("failed to watch {}: {}", root.display(), e))?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let (stop_tx, stop_rx) = oneshot::channel();
    thread::spawn(move || {
        let _ = shutdown_rx.recv();
        let _ = stop_tx.send(());
    });

    log!("watch"; "watching {}", root.display());
    Ok(thread::spawn(move || {
        runtime.block_on(watch::run(session, env, reload, stop_rx));
    }))
}

/// Wait up to two seconds for the watch loop to finish.
pub fn wait_for_shutdown(handle: Option<JoinHandle<()>>) {
    let Some(handle) = handle else { return };

    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_bind_retries_next_port() {
        let localhost = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let (first, addr) = bind_with_retry(localhost, 0).unwrap();
        assert_ne!(addr.port(), 0);

        let (_second, next) = bind_with_retry(localhost, addr.port()).unwrap();
        assert_ne!(next.port(), addr.port());
        drop(first);
    }
}

//! WebSocket server for live reload.

use std::net::TcpListener;
use std::time::Duration;

use anyhow::Result;

use super::clients::Clients;
use super::message::HotReloadMessage;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Running live reload endpoint.
#[derive(Clone)]
pub struct LiveReload {
    port: u16,
    clients: Clients,
}

impl LiveReload {
    /// Bind near `base_port` and start accepting clients in the background.
    pub fn start(base_port: u16) -> Result<Self> {
        let (listener, port) = try_bind_port(base_port, MAX_PORT_RETRIES)?;
        listener.set_nonblocking(true)?;

        let clients = Clients::new();
        clients.spawn_reader();

        let acceptor = clients.clone();
        std::thread::spawn(move || {
            loop {
                if crate::core::is_shutdown() {
                    acceptor.close_all();
                    break;
                }
                match listener.accept() {
                    Ok((stream, addr)) => {
                        crate::debug!("reload"; "client connecting: {}", addr);
                        // handshake needs blocking I/O, off the accept loop
                        let _ = stream.set_nonblocking(false);
                        let clients = acceptor.clone();
                        std::thread::spawn(move || clients.accept(stream));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        std::thread::sleep(Duration::from_millis(100));
                    }
                    Err(e) => {
                        crate::log!("reload"; "accept error: {}", e);
                        std::thread::sleep(Duration::from_millis(100));
                    }
                }
            }
        });

        if base_port != 0 && port != base_port {
            crate::log!("reload"; "port {} in use, using {}", base_port, port);
        }
        Ok(Self { port, clients })
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    pub fn send(&self, msg: &HotReloadMessage) -> usize {
        self.clients.broadcast(msg)
    }

    #[cfg(test)]
    pub fn clients(&self) -> &Clients {
        &self.clients
    }
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(base_port: u16, max_retries: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(("127.0.0.1", port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "failed to bind live reload server after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tungstenite::Message;

    fn read_json(ws: &mut tungstenite::WebSocket<tungstenite::stream::MaybeTlsStream<std::net::TcpStream>>) -> HotReloadMessage {
        match ws.read().unwrap() {
            Message::Text(text) => HotReloadMessage::from_json(&text).unwrap(),
            other => panic!("unexpected frame {other:?}"),
        }
    }

    fn wait_for_clients(reload: &LiveReload, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while reload.clients().len() < n {
            assert!(Instant::now() < deadline, "client never registered");
            std::thread::sleep(Duration::from_millis(20));
        }
    }

    #[test]
    fn test_retries_taken_port() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let (_listener, actual) = try_bind_port(port, 5).unwrap();
        assert_ne!(actual, port);
    }

    #[test]
    fn test_connect_and_broadcast() {
        let reload = LiveReload::start(0).unwrap();
        let url = format!("ws://127.0.0.1:{}/", reload.port());
        let (mut ws, _) = tungstenite::connect(url).unwrap();

        assert!(matches!(read_json(&mut ws), HotReloadMessage::Connected { .. }));
        wait_for_clients(&reload, 1);

        assert_eq!(reload.send(&HotReloadMessage::reload("styles")), 1);
        assert_eq!(read_json(&mut ws), HotReloadMessage::reload("styles"));
    }

    #[test]
    fn test_pending_error_replayed_to_new_clients() {
        let reload = LiveReload::start(0).unwrap();
        reload.send(&HotReloadMessage::error("generator failed"));

        let url = format!("ws://127.0.0.1:{}/", reload.port());
        let (mut ws, _) = tungstenite::connect(url).unwrap();
        assert!(matches!(read_json(&mut ws), HotReloadMessage::Connected { .. }));
        assert_eq!(read_json(&mut ws), HotReloadMessage::error("generator failed"));
    }

    #[test]
    fn test_silent_client_does_not_block_others() {
        let reload = LiveReload::start(0).unwrap();
        let port = reload.port();
        let _silent = std::net::TcpStream::connect(("127.0.0.1", port)).unwrap();
        // let the acceptor pick up the silent socket first
        std::thread::sleep(Duration::from_millis(250));

        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let url = format!("ws://127.0.0.1:{port}/");
            let greeting = tungstenite::connect(url).ok().map(|(mut ws, _)| read_json(&mut ws));
            let _ = tx.send(greeting);
        });

        let greeting = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(greeting, Some(HotReloadMessage::Connected { .. })));
    }
}

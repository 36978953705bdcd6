//! Connected live reload clients.

use std::io::ErrorKind;
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::message::HotReloadMessage;

/// How long a connecting client may take to send its upgrade request.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(3);

/// Shared registry of open sockets.
///
/// The last error is remembered so a page opened while the build is broken
/// still gets the overlay.
#[derive(Clone, Default)]
pub struct Clients {
    sockets: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
    pending_error: Arc<Mutex<Option<String>>>,
}

impl Clients {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete the handshake on `stream` and register it.
    ///
    /// Gives up after [`HANDSHAKE_TIMEOUT`] when the peer stays silent.
    pub fn accept(&self, stream: TcpStream) {
        if let Err(e) = stream
            .set_read_timeout(Some(HANDSHAKE_TIMEOUT))
            .and_then(|()| stream.set_write_timeout(Some(HANDSHAKE_TIMEOUT)))
        {
            crate::debug!("reload"; "cannot set handshake timeout: {}", e);
            return;
        }
        match tungstenite::accept(stream) {
            Ok(mut ws) => {
                // polled by the reader thread after the handshake
                let _ = ws.get_ref().set_read_timeout(None);
                let _ = ws.get_ref().set_nonblocking(true);

                if let Err(e) = ws.send(text(&HotReloadMessage::connected())) {
                    crate::debug!("reload"; "failed to greet client: {}", e);
                    return;
                }
                if let Some(error) = self.pending_error.lock().clone()
                    && let Err(e) = ws.send(text(&HotReloadMessage::error(error)))
                {
                    crate::debug!("reload"; "failed to send pending error: {}", e);
                }

                let mut sockets = self.sockets.lock();
                sockets.push(ws);
                crate::debug!("reload"; "client connected (total: {})", sockets.len());
            }
            Err(e) => crate::debug!("reload"; "handshake failed: {}", e),
        }
    }

    /// Send `msg` to every client, dropping the ones that are gone.
    pub fn broadcast(&self, msg: &HotReloadMessage) -> usize {
        match msg {
            HotReloadMessage::Error { message } => {
                *self.pending_error.lock() = Some(message.clone());
            }
            HotReloadMessage::Reload { .. } | HotReloadMessage::Clear => {
                *self.pending_error.lock() = None;
            }
            HotReloadMessage::Connected { .. } => {}
        }

        let frame = text(msg);
        let mut sockets = self.sockets.lock();
        sockets.retain_mut(|ws| match ws.send(frame.clone()) {
            Ok(()) => true,
            Err(e) => {
                crate::debug!("reload"; "client disconnected: {}", e);
                false
            }
        });
        crate::debug!("reload"; "broadcast to {} clients", sockets.len());
        sockets.len()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sockets.lock().len()
    }

    /// Poll sockets for close frames so closed tabs are dropped promptly.
    pub fn spawn_reader(&self) {
        let sockets = Arc::clone(&self.sockets);
        std::thread::spawn(move || {
            loop {
                std::thread::sleep(Duration::from_millis(200));
                if crate::core::is_shutdown() {
                    break;
                }
                sockets.lock().retain_mut(|ws| match ws.read() {
                    Ok(Message::Close(_)) => false,
                    Ok(_) => true,
                    Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => {
                        true
                    }
                    Err(_) => false,
                });
            }
        });
    }

    /// Close every socket.
    pub fn close_all(&self) {
        for mut ws in self.sockets.lock().drain(..) {
            let _ = ws.close(None);
        }
    }
}

fn text(msg: &HotReloadMessage) -> Message {
    Message::Text(msg.to_json().into())
}

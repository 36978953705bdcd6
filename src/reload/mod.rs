//! Live reload channel.
//!
//! ```text
//! watch loop ──► LiveReload::send ──► Clients ──► hotreload.js ──► location.reload()
//!                                        ▲
//! acceptor thread ── handshake ──────────┘
//! ```
//!
//! - `message` - JSON messages understood by the injected client
//! - `clients` - connected sockets and broadcast
//! - `server` - port binding and the acceptor thread

pub mod clients;
pub mod message;
pub mod server;

pub use message::HotReloadMessage;
pub use server::LiveReload;

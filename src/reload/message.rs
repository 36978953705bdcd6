//! Hot reload message protocol.
//!
//! - `connected`: sent once after the handshake
//! - `reload`: rebuild finished, reload the page
//! - `error`: rebuild failed, show an overlay and keep the page
//! - `clear`: a later rebuild succeeded, drop the overlay

use serde::{Deserialize, Serialize};

/// Hot reload message sent over WebSocket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HotReloadMessage {
    Connected {
        /// Server version for compatibility check
        version: String,
    },

    Reload {
        /// What changed, shown in the browser console
        reason: String,
    },

    Error {
        message: String,
    },

    Clear,
}

impl HotReloadMessage {
    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn reload(reason: impl Into<String>) -> Self {
        Self::Reload {
            reason: reason.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload","reason":""}"#.into())
    }

    #[cfg(test)]
    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_message() {
        let json = HotReloadMessage::reload("styles rebuilt").to_json();
        assert_eq!(json, r#"{"type":"reload","reason":"styles rebuilt"}"#);
    }

    #[test]
    fn test_clear_is_bare_tag() {
        assert_eq!(HotReloadMessage::Clear.to_json(), r#"{"type":"clear"}"#);
    }

    #[test]
    fn test_parse() {
        let msg = HotReloadMessage::from_json(r#"{"type":"error","message":"boom"}"#);
        assert_eq!(msg, Some(HotReloadMessage::error("boom")));
        assert_eq!(HotReloadMessage::from_json(r#"{"type":"patch"}"#), None);
    }

    #[test]
    fn test_connected_carries_version() {
        let json = HotReloadMessage::connected().to_json();
        assert!(json.contains(env!("CARGO_PKG_VERSION")));
    }
}

//! Dev server state tracking.
//!
//! - `PHASE`: where the orchestrator is (initializing, building, serving, rebuilding)
//! - `SHUTDOWN`: has shutdown been requested? (Ctrl+C received)

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// Orchestrator phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    /// Process started, nothing built yet.
    Initializing = 0,
    /// Running asset pipelines and the first generator build.
    Building = 1,
    /// Server up, watchers registered, waiting for changes.
    Serving = 2,
    /// A watched change is being processed.
    Rebuilding = 3,
}

impl Phase {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Building,
            2 => Self::Serving,
            3 => Self::Rebuilding,
            _ => Self::Initializing,
        }
    }

    /// Whether moving from `self` to `next` is a valid transition.
    pub const fn can_enter(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Initializing, Self::Building)
                | (Self::Building, Self::Serving)
                | (Self::Serving, Self::Rebuilding)
                | (Self::Rebuilding, Self::Serving)
                // config reload re-runs every pipeline
                | (Self::Serving, Self::Building)
                | (Self::Rebuilding, Self::Building)
        )
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Building => "building",
            Self::Serving => "serving",
            Self::Rebuilding => "rebuilding",
        }
    }
}

static PHASE: AtomicU8 = AtomicU8::new(Phase::Initializing as u8);

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Shutdown signal sender for the watch loop
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

// =============================================================================
// PHASE
// =============================================================================

/// Current orchestrator phase.
pub fn phase() -> Phase {
    Phase::from_u8(PHASE.load(Ordering::SeqCst))
}

/// Move to `next`. Invalid transitions are logged in verbose mode and ignored.
///
/// Returns whether the transition happened.
pub fn enter(next: Phase) -> bool {
    let current = phase();
    if !current.can_enter(next) {
        crate::debug!("state"; "ignored {} -> {}", current.label(), next.label());
        return false;
    }
    PHASE.store(next as u8, Ordering::SeqCst);
    crate::debug!("state"; "{} -> {}", current.label(), next.label());
    true
}

// =============================================================================
// SHUTDOWN
// =============================================================================

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - Before `register_server()`: exit immediately
/// - After `register_server()`: unblock the server and stop the watcher
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if let Some(tx) = SHUTDOWN_TX.get() {
            let _ = tx.send(());
        }

        if let Some(server) = SERVER.get() {
            crate::log!("serve"; "shutting down...");
            server.unblock();
        } else {
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the HTTP server for graceful shutdown
pub fn register_server(server: Arc<Server>, shutdown_tx: crossbeam::channel::Sender<()>) {
    let _ = SERVER.set(server);
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use Phase::*;
        assert!(Initializing.can_enter(Building));
        assert!(Building.can_enter(Serving));
        assert!(Serving.can_enter(Rebuilding));
        assert!(Rebuilding.can_enter(Serving));

        assert!(!Initializing.can_enter(Serving));
        assert!(!Building.can_enter(Rebuilding));
        assert!(!Serving.can_enter(Initializing));
    }

    #[test]
    fn test_phase_roundtrip_u8() {
        for phase in [
            Phase::Initializing,
            Phase::Building,
            Phase::Serving,
            Phase::Rebuilding,
        ] {
            assert_eq!(Phase::from_u8(phase as u8), phase);
        }
    }

    #[test]
    fn test_enter_sequence() {
        PHASE.store(Phase::Initializing as u8, Ordering::SeqCst);
        assert!(!enter(Phase::Serving));
        assert!(enter(Phase::Building));
        assert!(enter(Phase::Serving));
        assert_eq!(phase(), Phase::Serving);
        assert!(enter(Phase::Rebuilding));
        assert_eq!(phase(), Phase::Rebuilding);
        assert!(enter(Phase::Serving));
        PHASE.store(Phase::Initializing as u8, Ordering::SeqCst);
    }
}

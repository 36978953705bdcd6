//! Debouncer: pure timing and per-path deduplication.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::utils::path::normalize_path;

/// Quiet window after the last event before a batch is released.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Editor artifacts that never trigger a rebuild.
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with(".#")
        || name == "4913"
}

/// Collects events until the window has been quiet for [`DEBOUNCE`].
#[derive(Debug, Default)]
pub struct Debouncer {
    changes: FxHashMap<PathBuf, ChangeKind>,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notify event. Per path:
    /// - Removed then Created/Modified: the restore wins
    /// - Modified then Removed: becomes Removed
    /// - Created then Removed: dropped
    /// - otherwise the first event wins
    pub fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;
        use notify::event::ModifyKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            // mtime/chmod noise
            EventKind::Modify(ModifyKind::Metadata(_)) => return,
            EventKind::Modify(_) => ChangeKind::Modified,
            _ => return,
        };

        for path in &event.paths {
            if !is_temp_file(path) {
                self.add(normalize_path(path), kind);
            }
        }
    }

    pub fn add(&mut self, path: PathBuf, kind: ChangeKind) {
        match self.changes.get(&path).copied() {
            None => {
                crate::debug!("watch"; "event {}: {}", kind.label(), path.display());
                self.changes.insert(path, kind);
            }
            Some(ChangeKind::Removed) if kind != ChangeKind::Removed => {
                self.changes.insert(path, kind);
            }
            Some(ChangeKind::Modified) if kind == ChangeKind::Removed => {
                self.changes.insert(path, ChangeKind::Removed);
            }
            Some(ChangeKind::Created) if kind == ChangeKind::Removed => {
                self.changes.remove(&path);
            }
            Some(_) => {}
        }
        self.last_event = Some(Instant::now());
    }

    /// Take the batch once the window has been quiet long enough.
    pub fn take_if_ready(&mut self) -> Option<Vec<(PathBuf, ChangeKind)>> {
        let last_event = self.last_event?;
        if last_event.elapsed() < DEBOUNCE {
            return None;
        }
        self.last_event = None;
        if self.changes.is_empty() {
            return None;
        }

        let mut batch: Vec<_> = self.changes.drain().collect();
        batch.sort();
        Some(batch)
    }

    /// Precise sleep duration until the batch may be ready.
    pub fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };
        DEBOUNCE
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

use std::sync::Arc;

use parking_lot::Mutex;

use super::{EngineEvent, EventHandler};
use crate::history::HistoryState;

/// What a host needs to know about an engine between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStatus {
    /// Drawings changed since the host last took them for persisting.
    pub dirty: bool,
    pub history: HistoryState,
}

impl Default for EngineStatus {
    fn default() -> Self {
        Self {
            dirty: false,
            history: HistoryState::Empty,
        }
    }
}

/// Mirrors engine events into shared [`EngineStatus`] the host can poll.
#[derive(Debug, Clone, Default)]
pub struct StatusTracker {
    status: Arc<Mutex<EngineStatus>>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> EngineStatus {
        *self.status.lock()
    }

    /// Returns whether drawings were dirty, and marks them clean.
    pub fn take_dirty(&self) -> bool {
        std::mem::take(&mut self.status.lock().dirty)
    }
}

impl EventHandler for StatusTracker {
    fn handle_event(&mut self, event: &EngineEvent) {
        let mut status = self.status.lock();
        match event {
            EngineEvent::DrawingsChanged => status.dirty = true,
            EngineEvent::HistoryChanged(history) => status.history = *history,
            EngineEvent::StrokeCommitted { .. } | EngineEvent::ToolChanged { .. } => {}
        }
    }
}

/// Delays saving until edits have paused for a while.
///
/// Times are in seconds from any monotonic-enough clock (the host passes
/// egui's input time).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutosaveDebouncer {
    delay: f64,
    last_edit: Option<f64>,
}

impl AutosaveDebouncer {
    pub fn new(delay_secs: f64) -> Self {
        Self {
            delay: delay_secs.max(0.0),
            last_edit: None,
        }
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Records an edit at `now`, pushing the deadline back.
    pub fn mark_dirty(&mut self, now: f64) {
        self.last_edit = Some(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.last_edit.is_some()
    }

    /// Seconds until a save is due, if anything is pending.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.last_edit.map(|t| (t + self.delay - now).max(0.0))
    }

    /// Returns true once per burst of edits, after the delay has passed.
    pub fn take_due(&mut self, now: f64) -> bool {
        match self.last_edit {
            Some(t) if now - t >= self.delay => {
                self.last_edit = None;
                true
            }
            _ => false,
        }
    }

    /// Drops a pending save, e.g. after saving explicitly.
    pub fn reset(&mut self) {
        self.last_edit = None;
    }
}

use egui::Pos2;

use crate::stroke::Stroke;

/// Committed strokes in z-order, plus the strokes that can be redone.
///
/// The store is plain data. Undo/redo policy lives in [`crate::history`], hit
/// testing in [`crate::eraser`] and pixels in [`crate::renderer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeStore {
    committed: Vec<Stroke>,
    redo: Vec<Stroke>,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole store with persisted strokes. Redo starts empty.
    pub fn from_strokes(strokes: Vec<Stroke>) -> Self {
        Self {
            committed: strokes,
            redo: Vec::new(),
        }
    }

    /// Committed strokes in replay order.
    pub fn strokes(&self) -> &[Stroke] {
        &self.committed
    }

    /// Undone strokes; the last one is restored first.
    pub fn redo_strokes(&self) -> &[Stroke] {
        &self.redo
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    pub fn total_points(&self) -> usize {
        self.committed.iter().map(|s| s.points().len()).sum()
    }

    pub(crate) fn push(&mut self, stroke: Stroke) {
        self.committed.push(stroke);
    }

    pub(crate) fn pop(&mut self) -> Option<Stroke> {
        self.committed.pop()
    }

    pub(crate) fn push_redo(&mut self, stroke: Stroke) {
        self.redo.push(stroke);
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Stroke> {
        self.redo.pop()
    }

    pub(crate) fn discard_redo(&mut self) {
        self.redo.clear();
    }

    pub(crate) fn replace_redo(&mut self, strokes: Vec<Stroke>) {
        self.redo = strokes;
    }

    /// Rescales committed and redo strokes alike, keeping their order.
    pub(crate) fn scale(&mut self, factor: f32) {
        for stroke in self.committed.iter_mut().chain(self.redo.iter_mut()) {
            *stroke = stroke.scaled(factor);
        }
    }

    pub(crate) fn take_committed(&mut self) -> Vec<Stroke> {
        std::mem::take(&mut self.committed)
    }

    /// Drops every committed stroke that has a point matching `hit`.
    /// Returns how many strokes were removed.
    pub(crate) fn remove_where(&mut self, mut hit: impl FnMut(Pos2) -> bool) -> usize {
        let before = self.committed.len();
        self.committed
            .retain(|stroke| !stroke.points().iter().any(|p| hit(*p)));
        before - self.committed.len()
    }
}

use serde::{Deserialize, Serialize};

use crate::store::StrokeStore;
use crate::stroke::Stroke;

/// What "clear all" does with the strokes it removes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearPolicy {
    /// Cleared strokes move to the redo sequence and come back one redo at a
    /// time, oldest first.
    #[default]
    Undoable,
    /// Cleared strokes are dropped.
    Destructive,
}

/// Undo/redo availability, derived from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    Empty,
    CanUndo,
    CanRedo,
    CanUndoAndRedo,
}

impl HistoryState {
    pub fn of(store: &StrokeStore) -> Self {
        match (!store.is_empty(), !store.redo_strokes().is_empty()) {
            (false, false) => Self::Empty,
            (true, false) => Self::CanUndo,
            (false, true) => Self::CanRedo,
            (true, true) => Self::CanUndoAndRedo,
        }
    }

    pub fn can_undo(self) -> bool {
        matches!(self, Self::CanUndo | Self::CanUndoAndRedo)
    }

    pub fn can_redo(self) -> bool {
        matches!(self, Self::CanRedo | Self::CanUndoAndRedo)
    }
}

/// Applies the undo/redo discipline to a [`StrokeStore`].
///
/// Every method returns `true` when the store changed; callers redraw and
/// persist only then. Operations on an empty history are silent no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryController {
    clear_policy: ClearPolicy,
}

impl HistoryController {
    pub fn new(clear_policy: ClearPolicy) -> Self {
        Self { clear_policy }
    }

    pub fn clear_policy(&self) -> ClearPolicy {
        self.clear_policy
    }

    pub fn set_clear_policy(&mut self, policy: ClearPolicy) {
        self.clear_policy = policy;
    }

    /// Starting a new stroke discards the undone branch.
    pub fn begin_stroke(&self, store: &mut StrokeStore) {
        store.discard_redo();
    }

    /// Appends a finished stroke. Empty strokes are never committed.
    pub fn commit(&self, store: &mut StrokeStore, stroke: Stroke) -> bool {
        if stroke.points().is_empty() {
            return false;
        }
        store.push(stroke);
        store.discard_redo();
        true
    }

    pub fn undo(&self, store: &mut StrokeStore) -> bool {
        match store.pop() {
            Some(stroke) => {
                store.push_redo(stroke);
                true
            }
            None => false,
        }
    }

    /// Restores the most recently undone stroke on top of the z-order.
    pub fn redo(&self, store: &mut StrokeStore) -> bool {
        match store.pop_redo() {
            Some(stroke) => {
                store.push(stroke);
                true
            }
            None => false,
        }
    }

    pub fn clear_all(&self, store: &mut StrokeStore) -> bool {
        if store.is_empty() {
            return false;
        }
        let mut cleared = store.take_committed();
        match self.clear_policy {
            ClearPolicy::Undoable => {
                // Redo pops from the back, so the oldest stroke goes last.
                cleared.reverse();
                store.replace_redo(cleared);
            }
            ClearPolicy::Destructive => {}
        }
        true
    }

    pub fn state(&self, store: &StrokeStore) -> HistoryState {
        HistoryState::of(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{InkColor, StrokeTool};
    use egui::pos2;

    fn stroke(x: f32) -> Stroke {
        Stroke::new(StrokeTool::Ink, InkColor::WHITE, 3.0, vec![pos2(x, x), pos2(x + 1.0, x)])
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let history = HistoryController::default();
        let mut store = StrokeStore::new();
        assert!(!history.undo(&mut store));
        assert!(!history.redo(&mut store));
        assert_eq!(history.state(&store), HistoryState::Empty);
    }

    #[test]
    fn test_state_transitions() {
        let history = HistoryController::default();
        let mut store = StrokeStore::new();

        history.commit(&mut store, stroke(0.0));
        assert_eq!(history.state(&store), HistoryState::CanUndo);

        history.commit(&mut store, stroke(1.0));
        history.undo(&mut store);
        assert_eq!(history.state(&store), HistoryState::CanUndoAndRedo);

        history.undo(&mut store);
        assert_eq!(history.state(&store), HistoryState::CanRedo);
        assert!(history.state(&store).can_redo());
        assert!(!history.state(&store).can_undo());
    }

    #[test]
    fn test_undoable_clear_restores_original_order() {
        let history = HistoryController::new(ClearPolicy::Undoable);
        let mut store = StrokeStore::new();
        let strokes: Vec<_> = (0..3).map(|i| stroke(i as f32 * 10.0)).collect();
        for s in &strokes {
            history.commit(&mut store, s.clone());
        }

        assert!(history.clear_all(&mut store));
        assert!(store.is_empty());
        assert_eq!(store.redo_strokes().len(), 3);

        history.redo(&mut store);
        assert_eq!(store.strokes(), &strokes[..1]);
        history.redo(&mut store);
        history.redo(&mut store);
        assert_eq!(store.strokes(), &strokes[..]);
    }

    #[test]
    fn test_destructive_clear() {
        let history = HistoryController::new(ClearPolicy::Destructive);
        let mut store = StrokeStore::new();
        history.commit(&mut store, stroke(0.0));

        assert!(history.clear_all(&mut store));
        assert_eq!(history.state(&store), HistoryState::Empty);
    }

    #[test]
    fn test_clear_empty_keeps_redo() {
        let history = HistoryController::default();
        let mut store = StrokeStore::new();
        history.commit(&mut store, stroke(0.0));
        history.undo(&mut store);

        assert!(!history.clear_all(&mut store));
        assert_eq!(store.redo_strokes().len(), 1);
    }
}

use egui::Pos2;

use crate::store::StrokeStore;
use crate::stroke::Stroke;

/// Removes whole strokes that come within a fixed radius of the eraser.
///
/// Only the recorded sample points are tested, not the segments between
/// them, so a stroke with widely spaced samples can survive an eraser that
/// passes over its rendered line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eraser {
    radius: f32,
}

impl Eraser {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn hits_point(&self, center: Pos2, point: Pos2) -> bool {
        center.distance(point) < self.radius
    }

    pub fn hits(&self, stroke: &Stroke, center: Pos2) -> bool {
        stroke.points().iter().any(|p| self.hits_point(center, *p))
    }

    /// Erases at `center`; returns the number of strokes removed.
    pub fn erase(&self, store: &mut StrokeStore, center: Pos2) -> usize {
        store.remove_where(|p| self.hits_point(center, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryController;
    use crate::stroke::{InkColor, StrokeTool};
    use egui::pos2;

    fn store_with(strokes: Vec<Vec<Pos2>>) -> StrokeStore {
        let history = HistoryController::default();
        let mut store = StrokeStore::new();
        for points in strokes {
            history.commit(&mut store, Stroke::new(StrokeTool::Ink, InkColor::WHITE, 2.0, points));
        }
        store
    }

    #[test]
    fn test_removes_whole_stroke_on_any_point() {
        let mut store = store_with(vec![
            vec![pos2(0.0, 0.0), pos2(100.0, 0.0), pos2(200.0, 0.0)],
            vec![pos2(0.0, 100.0)],
        ]);
        let removed = Eraser::new(15.0).erase(&mut store, pos2(105.0, 5.0));
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.strokes()[0].points(), &[pos2(0.0, 100.0)]);
    }

    #[test]
    fn test_boundary_distance_is_not_a_hit() {
        let mut store = store_with(vec![vec![pos2(15.0, 0.0)]]);
        assert_eq!(Eraser::new(15.0).erase(&mut store, pos2(0.0, 0.0)), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_gap_between_samples_survives() {
        // The rendered line passes through (50, 0) but no sample is near it.
        let mut store = store_with(vec![vec![pos2(0.0, 0.0), pos2(100.0, 0.0)]]);
        assert_eq!(Eraser::new(10.0).erase(&mut store, pos2(50.0, 0.0)), 0);
    }

    #[test]
    fn test_single_point_stroke_is_erasable() {
        let mut store = store_with(vec![vec![pos2(40.0, 40.0)]]);
        assert_eq!(Eraser::new(5.0).erase(&mut store, pos2(42.0, 41.0)), 1);
        assert!(store.is_empty());
    }
}

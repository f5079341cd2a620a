use egui::{Pos2, pos2};
use study_ink::{
    ClearPolicy, EngineConfig, HistoryController, HistoryState, InkColor, Stroke, StrokeStore,
    StrokeTool, SurfaceSize,
};
use study_ink::engine::DrawingEngine;
use study_ink::eraser::Eraser;

fn stroke(points: Vec<Pos2>) -> Stroke {
    Stroke::new(StrokeTool::Ink, InkColor::WHITE, 3.0, points)
}

fn numbered(i: usize) -> Stroke {
    let x = i as f32 * 7.0;
    stroke(vec![pos2(x, 1.0), pos2(x + 2.5, 3.0), pos2(x + 4.0, 9.5)])
}

#[test]
fn test_undo_counts_for_every_prefix() {
    let history = HistoryController::default();
    for n in 0..6 {
        for m in 0..=n {
            let mut store = StrokeStore::new();
            for i in 0..n {
                assert!(history.commit(&mut store, numbered(i)));
            }
            for _ in 0..m {
                assert!(history.undo(&mut store));
            }
            assert_eq!(store.len(), n - m, "n={n} m={m}");
            assert_eq!(store.redo_strokes().len(), m, "n={n} m={m}");
        }
    }
}

#[test]
fn test_redo_restores_identical_stroke() {
    let history = HistoryController::default();
    let mut store = StrokeStore::new();
    let original = Stroke::new(
        StrokeTool::Highlighter,
        "#12ab34cc".parse().unwrap(),
        17.25,
        vec![pos2(0.1, 0.2), pos2(3.3, 4.4), pos2(5.5, 6.6)],
    );
    history.commit(&mut store, original.clone());

    history.undo(&mut store);
    history.redo(&mut store);

    assert_eq!(store.strokes(), &[original.clone()]);
    assert_eq!(
        serde_json::to_string(&store.strokes()[0]).unwrap(),
        serde_json::to_string(&original).unwrap()
    );
}

#[test]
fn test_commit_after_undo_clears_redo() {
    let history = HistoryController::default();
    let mut store = StrokeStore::new();
    history.commit(&mut store, numbered(0));
    history.commit(&mut store, numbered(1));

    history.undo(&mut store);
    history.commit(&mut store, numbered(2));
    let before = store.strokes().to_vec();

    assert!(!history.redo(&mut store));
    assert_eq!(store.strokes(), &before[..]);
}

#[test]
fn test_undo_undo_redo_scenario() {
    let history = HistoryController::default();
    let mut store = StrokeStore::new();
    let a = stroke(vec![pos2(0.0, 0.0), pos2(10.0, 10.0)]);
    let b = stroke(vec![pos2(50.0, 50.0)]);
    history.commit(&mut store, a.clone());
    history.commit(&mut store, b.clone());

    history.undo(&mut store);
    assert_eq!(store.strokes(), &[a.clone()]);
    assert_eq!(store.redo_strokes(), &[b.clone()]);

    history.undo(&mut store);
    assert!(store.strokes().is_empty());
    assert_eq!(store.redo_strokes(), &[b.clone(), a.clone()]);

    // The stroke undone last comes back first.
    history.redo(&mut store);
    assert_eq!(store.strokes(), &[a]);
    assert_eq!(store.redo_strokes(), &[b]);
}

#[test]
fn test_erase_iff_sample_within_radius() {
    let history = HistoryController::default();
    let eraser = Eraser::new(15.0);
    let center = pos2(100.0, 100.0);

    let cases = [
        (vec![pos2(114.9, 100.0)], 1),
        (vec![pos2(115.0, 100.0)], 0),
        (vec![pos2(0.0, 0.0), pos2(110.0, 110.0)], 1),
        (vec![pos2(80.0, 100.0), pos2(120.0, 100.0)], 0),
    ];
    for (points, expected) in cases {
        let mut store = StrokeStore::new();
        history.commit(&mut store, stroke(points.clone()));
        assert_eq!(eraser.erase(&mut store, center), expected, "{points:?}");
    }
}

#[test]
fn test_erase_keeps_redo() {
    let history = HistoryController::default();
    let mut store = StrokeStore::new();
    history.commit(&mut store, numbered(0));
    history.commit(&mut store, numbered(1));
    history.undo(&mut store);

    Eraser::new(15.0).erase(&mut store, pos2(0.0, 1.0));
    assert!(store.is_empty());
    assert_eq!(store.redo_strokes().len(), 1);
}

#[test]
fn test_engine_clear_all_policies() {
    let size = SurfaceSize::new(120, 120);
    for (policy, restorable) in [(ClearPolicy::Undoable, 2), (ClearPolicy::Destructive, 0)] {
        let config = EngineConfig {
            clear_policy: policy,
            ..Default::default()
        };
        let mut engine = DrawingEngine::new(&config, size);
        engine.load_drawings(vec![numbered(0), numbered(1)]);

        assert!(engine.clear_all());
        assert!(engine.drawings().is_empty());
        let mut redone = 0;
        while engine.redo() {
            redone += 1;
        }
        assert_eq!(redone, restorable, "{policy:?}");
    }
}

#[test]
fn test_history_state_follows_engine() {
    let mut engine = DrawingEngine::new(&EngineConfig::default(), SurfaceSize::new(50, 50));
    assert_eq!(engine.history_state(), HistoryState::Empty);
    assert!(!engine.undo());

    engine.load_drawings(vec![numbered(0)]);
    assert_eq!(engine.history_state(), HistoryState::CanUndo);
    engine.undo();
    assert_eq!(engine.history_state(), HistoryState::CanRedo);
}

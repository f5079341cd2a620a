use std::collections::BTreeMap;

use egui::pos2;
use study_ink::app::{AppState, StudyInkApp};
use study_ink::notes::{
    FileStore, KeyValueStore, MemoryStore, NoteLibrary, NoteUpdate, PersistenceError, STORAGE_KEY,
};
use study_ink::{DeviceClass, InkColor, PointerEvent, Stroke, StrokeTool, Tool};

fn library() -> NoteLibrary {
    NoteLibrary::open(Box::new(MemoryStore::new())).unwrap()
}

fn temp_dir() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("study_ink_notes_{}", uuid::Uuid::new_v4()))
}

fn line() -> Stroke {
    Stroke::new(
        StrokeTool::Highlighter,
        InkColor::HIGHLIGHTER_YELLOW,
        15.0,
        vec![pos2(1.0, 2.0), pos2(3.0, 4.0)],
    )
}

#[test]
fn test_folder_and_note_lifecycle() {
    let mut library = library();
    let folder = library.create_folder("Physics").unwrap();
    let note = library.create_note(&folder.id, "Kinematics").unwrap();
    assert_eq!(library.notes(&folder.id).len(), 1);
    assert!(note.markdown.is_empty());

    library.rename_note(&folder.id, &note.id, "Dynamics").unwrap();
    library
        .update_note(
            &folder.id,
            &note.id,
            NoteUpdate {
                markdown: Some("# F = ma".into()),
                ..Default::default()
            },
        )
        .unwrap();
    library.save_drawings(&folder.id, &note.id, &[line()]).unwrap();

    let stored = library.note(&folder.id, &note.id).unwrap();
    assert_eq!(stored.name, "Dynamics");
    assert_eq!(stored.markdown, "# F = ma");
    assert_eq!(stored.drawings, vec![line()]);

    library.rename_folder(&folder.id, "Science").unwrap();
    assert_eq!(library.folder(&folder.id).unwrap().name, "Science");

    library.delete_note(&folder.id, &note.id).unwrap();
    assert!(library.notes(&folder.id).is_empty());
    library.delete_folder(&folder.id).unwrap();
    assert!(library.folders().is_empty());
}

#[test]
fn test_missing_ids_are_errors() {
    let mut library = library();
    assert!(matches!(
        library.create_note("nope", "x"),
        Err(PersistenceError::FolderNotFound(_))
    ));
    let folder = library.create_folder("A").unwrap();
    assert!(matches!(
        library.save_drawings(&folder.id, "nope", &[]),
        Err(PersistenceError::NoteNotFound { .. })
    ));
    assert!(library.notes("nope").is_empty());
}

#[test]
fn test_library_survives_reopen() {
    let dir = temp_dir();
    let (folder_id, note_id) = {
        let mut library = NoteLibrary::open(Box::new(FileStore::new(&dir))).unwrap();
        let folder = library.create_folder("Math").unwrap();
        let note = library.create_note(&folder.id, "Limits").unwrap();
        let mut pages = BTreeMap::new();
        pages.insert(2, vec![line()]);
        library
            .update_note(
                &folder.id,
                &note.id,
                NoteUpdate {
                    drawings: Some(vec![line()]),
                    pdf_drawings: Some(pages),
                    ..Default::default()
                },
            )
            .unwrap();
        (folder.id, note.id)
    };

    let store = FileStore::new(&dir);
    let raw = store.get(STORAGE_KEY).unwrap().unwrap();
    assert!(raw.contains("\"tool\":\"highlighter\""));

    let library = NoteLibrary::open(Box::new(store)).unwrap();
    let note = library.note(&folder_id, &note_id).unwrap();
    assert_eq!(note.drawings, vec![line()]);
    assert_eq!(note.page_strokes()[&2], vec![line()]);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_backup_round_trip() {
    let mut source = library();
    let folder = source.create_folder("History").unwrap();
    source.create_note(&folder.id, "Rome").unwrap();
    let backup = source.export_backup().unwrap();
    assert!(backup.contains("\n  \"folders\""));

    let mut target = library();
    target.create_folder("Scratch").unwrap();
    target.import_backup(&backup).unwrap();
    assert_eq!(target.database().folders, source.database().folders);
}

#[test]
fn test_web_app_backup_imports() {
    let backup = r###"{
  "folders": [
    {
      "id": "1709287200000",
      "name": "Chemistry",
      "notes": [
        {
          "id": "1709287200001",
          "name": "Bonds",
          "markdown": "## Covalent",
          "drawings": [
            {"tool": "pen", "color": "#ffffff", "size": 3, "opacity": 1, "points": [{"x": 10, "y": 10}, {"x": 40, "y": 10}]},
            {"tool": "highlighter", "color": "#ffe66d", "size": 15, "points": [{"x": 5, "y": 30}]}
          ],
          "textBoxes": [],
          "pdfDrawings": {"1": "data:image/png;base64,iVBORw0KGgo="},
          "createdAt": "2024-03-01T10:00:00.000Z",
          "updatedAt": "2024-03-02T08:30:00.000Z"
        }
      ],
      "createdAt": "2024-03-01T10:00:00.000Z",
      "updatedAt": "2024-03-02T08:30:00.000Z"
    }
  ],
  "version": 1,
  "lastUpdated": "2024-03-02T08:30:00.000Z"
}"###;
    let mut library = library();
    library.import_backup(backup).unwrap();

    let note = library.note("1709287200000", "1709287200001").unwrap();
    assert_eq!(note.drawings.len(), 2);
    assert_eq!(note.drawings[1].opacity(), 0.4);
    assert!(note.page_strokes().is_empty());
    assert_eq!(
        note.updated_at.to_rfc3339(),
        "2024-03-02T08:30:00+00:00"
    );

    // Saving keeps the PNG page so a later export still has it.
    library
        .save_drawings("1709287200000", "1709287200001", &[line()])
        .unwrap();
    let exported = library.export_backup().unwrap();
    assert!(exported.contains("data:image/png;base64,iVBORw0KGgo="));
}

#[test]
fn test_invalid_backup_keeps_data() {
    let mut library = library();
    library.create_folder("Keep me").unwrap();

    for bad in ["not json", "{\"version\": 1}", "{\"folders\": {}}"] {
        assert!(library.import_backup(bad).is_err(), "{bad}");
    }
    assert!(matches!(
        library.import_backup("{\"folders\": 3}"),
        Err(PersistenceError::InvalidBackup(_))
    ));
    assert_eq!(library.folders().len(), 1);
}

#[test]
fn test_corrupt_store_is_reported() {
    let mut store = MemoryStore::new();
    store.set(STORAGE_KEY, "{ truncated").unwrap();
    assert!(matches!(
        NoteLibrary::open(Box::new(store)),
        Err(PersistenceError::Serialization(_))
    ));
}

#[test]
fn test_app_saves_ink_into_open_note() {
    let mut app = StudyInkApp::with_store(AppState::default(), Box::new(MemoryStore::new()));
    app.create_folder("Biology");
    let folder_id = app.library().folders()[0].id.clone();
    app.create_note(&folder_id, "Cells");
    let note_id = app.open_note_ids().unwrap().note_id.clone();

    app.set_tool(Tool::Pen);
    let pen = |x, y| PointerEvent::new(1, DeviceClass::Stylus, pos2(x, y));
    app.engine_mut().pointer_down(&pen(10.0, 10.0));
    app.engine_mut().pointer_move(&pen(40.0, 10.0));
    app.engine_mut().pointer_up(&pen(40.0, 10.0));
    app.flush();

    let note = app.library().note(&folder_id, &note_id).unwrap();
    assert_eq!(note.drawings.len(), 1);

    // Reopening loads the strokes back into the engine.
    app.close_note();
    assert!(app.engine().drawings().is_empty());
    app.open_note(&folder_id, &note_id);
    assert_eq!(app.engine().drawings().len(), 1);
}

#[test]
fn test_app_backup_files() {
    let dir = temp_dir();
    let mut app = StudyInkApp::with_store(AppState::default(), Box::new(MemoryStore::new()))
        .with_backup_dir(Some(dir.clone()));
    app.create_folder("Geography");

    let path = app.export_backup_file().unwrap();
    let name = path.file_name().unwrap().to_str().unwrap().to_owned();
    assert!(name.starts_with("study-notes-backup-") && name.ends_with(".json"));
    std::fs::write(dir.join("notes.txt"), "ignored").unwrap();
    assert_eq!(app.backup_files(), vec![path.clone()]);

    let mut restored = StudyInkApp::with_store(AppState::default(), Box::new(MemoryStore::new()))
        .with_backup_dir(Some(dir.clone()));
    assert!(restored.library().folders().is_empty());
    restored.import_backup_file(&path);
    assert_eq!(restored.library().folders()[0].name, "Geography");

    let without_dir = StudyInkApp::with_store(AppState::default(), Box::new(MemoryStore::new()));
    assert!(without_dir.backup_files().is_empty());

    let _ = std::fs::remove_dir_all(dir);
}

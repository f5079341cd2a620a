use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use super::model::{Folder, Note, NotesDatabase};
use super::{KeyValueStore, PersistenceError, PersistenceResult};
use crate::stroke::Stroke;

/// The key the whole database is stored under.
pub const STORAGE_KEY: &str = "study_notes_data";

/// Partial update of a note; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteUpdate {
    pub name: Option<String>,
    pub markdown: Option<String>,
    pub drawings: Option<Vec<Stroke>>,
    /// Page ink from the editor; older PNG snapshot pages are kept.
    pub pdf_drawings: Option<BTreeMap<u32, Vec<Stroke>>>,
}

/// Folders and notes backed by a [`KeyValueStore`].
///
/// The database is held in memory and written through on every mutation.
pub struct NoteLibrary {
    store: Box<dyn KeyValueStore>,
    db: NotesDatabase,
}

impl std::fmt::Debug for NoteLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteLibrary")
            .field("folders", &self.db.folders.len())
            .finish()
    }
}

impl NoteLibrary {
    /// Loads the database from `store`, starting empty if nothing was saved.
    pub fn open(store: Box<dyn KeyValueStore>) -> PersistenceResult<Self> {
        let db = match store.get(STORAGE_KEY)? {
            Some(json) => serde_json::from_str(&json)?,
            None => NotesDatabase::new(Utc::now()),
        };
        log::info!("Opened note library with {} folders", db.folders.len());
        Ok(Self { store, db })
    }

    /// An empty library over `store`. Nothing is written until the first change.
    pub fn empty(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            db: NotesDatabase::new(Utc::now()),
        }
    }

    pub fn database(&self) -> &NotesDatabase {
        &self.db
    }

    fn save(&mut self) -> PersistenceResult<()> {
        self.db.last_updated = Utc::now();
        let json = serde_json::to_string(&self.db)?;
        self.store.set(STORAGE_KEY, &json)?;
        log::debug!("Saved note library ({} bytes)", json.len());
        Ok(())
    }

    fn folder_mut(&mut self, folder_id: &str) -> PersistenceResult<&mut Folder> {
        self.db
            .folder_mut(folder_id)
            .ok_or_else(|| PersistenceError::FolderNotFound(folder_id.to_owned()))
    }

    fn note_mut(&mut self, folder_id: &str, note_id: &str) -> PersistenceResult<(&mut Folder, usize)> {
        let folder = self.folder_mut(folder_id)?;
        let index = folder
            .notes
            .iter()
            .position(|n| n.id == note_id)
            .ok_or_else(|| PersistenceError::NoteNotFound {
                folder: folder_id.to_owned(),
                note: note_id.to_owned(),
            })?;
        Ok((folder, index))
    }

    // ---------------------------------------------------------------------
    // Folders

    pub fn folders(&self) -> &[Folder] {
        &self.db.folders
    }

    pub fn folder(&self, folder_id: &str) -> Option<&Folder> {
        self.db.folder(folder_id)
    }

    pub fn create_folder(&mut self, name: &str) -> PersistenceResult<Folder> {
        let folder = Folder::new(new_id(), name.to_owned(), Utc::now());
        self.db.folders.push(folder.clone());
        self.save()?;
        log::info!("Created folder {:?}", folder.name);
        Ok(folder)
    }

    pub fn rename_folder(&mut self, folder_id: &str, name: &str) -> PersistenceResult<()> {
        let folder = self.folder_mut(folder_id)?;
        folder.name = name.to_owned();
        folder.updated_at = Utc::now();
        self.save()
    }

    /// Deletes a folder with all its notes.
    pub fn delete_folder(&mut self, folder_id: &str) -> PersistenceResult<()> {
        let before = self.db.folders.len();
        self.db.folders.retain(|f| f.id != folder_id);
        if self.db.folders.len() == before {
            return Err(PersistenceError::FolderNotFound(folder_id.to_owned()));
        }
        log::info!("Deleted folder {folder_id}");
        self.save()
    }

    // ---------------------------------------------------------------------
    // Notes

    /// Notes of a folder; empty if the folder does not exist.
    pub fn notes(&self, folder_id: &str) -> &[Note] {
        self.db.folder(folder_id).map_or(&[][..], |f| f.notes.as_slice())
    }

    pub fn note(&self, folder_id: &str, note_id: &str) -> Option<&Note> {
        self.db.folder(folder_id)?.note(note_id)
    }

    pub fn create_note(&mut self, folder_id: &str, name: &str) -> PersistenceResult<Note> {
        let now = Utc::now();
        let note = Note::new(new_id(), name.to_owned(), now);
        let folder = self.folder_mut(folder_id)?;
        folder.notes.push(note.clone());
        folder.updated_at = now;
        self.save()?;
        log::info!("Created note {:?}", note.name);
        Ok(note)
    }

    pub fn update_note(&mut self, folder_id: &str, note_id: &str, update: NoteUpdate) -> PersistenceResult<()> {
        let now = Utc::now();
        let (folder, index) = self.note_mut(folder_id, note_id)?;
        let note = &mut folder.notes[index];
        if let Some(name) = update.name {
            note.name = name;
        }
        if let Some(markdown) = update.markdown {
            note.markdown = markdown;
        }
        if let Some(drawings) = update.drawings {
            note.drawings = drawings;
        }
        if let Some(pdf_drawings) = update.pdf_drawings {
            note.set_page_strokes(pdf_drawings);
        }
        note.updated_at = now;
        folder.updated_at = now;
        self.save()
    }

    pub fn rename_note(&mut self, folder_id: &str, note_id: &str, name: &str) -> PersistenceResult<()> {
        self.update_note(
            folder_id,
            note_id,
            NoteUpdate {
                name: Some(name.to_owned()),
                ..Default::default()
            },
        )
    }

    /// Stores the committed strokes of a note's main drawing layer.
    pub fn save_drawings(&mut self, folder_id: &str, note_id: &str, drawings: &[Stroke]) -> PersistenceResult<()> {
        self.update_note(
            folder_id,
            note_id,
            NoteUpdate {
                drawings: Some(drawings.to_vec()),
                ..Default::default()
            },
        )
    }

    pub fn delete_note(&mut self, folder_id: &str, note_id: &str) -> PersistenceResult<()> {
        let (folder, index) = self.note_mut(folder_id, note_id)?;
        folder.notes.remove(index);
        folder.updated_at = Utc::now();
        log::info!("Deleted note {note_id}");
        self.save()
    }

    // ---------------------------------------------------------------------
    // Backup

    /// The whole database as pretty-printed JSON.
    pub fn export_backup(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string_pretty(&self.db)?)
    }

    /// Replaces the whole database with a backup. The current data is kept if
    /// the backup does not parse or has no `folders` array.
    pub fn import_backup(&mut self, json: &str) -> PersistenceResult<()> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.get("folders").is_some_and(serde_json::Value::is_array) {
            return Err(PersistenceError::InvalidBackup(
                "expected a \"folders\" array".to_owned(),
            ));
        }
        let db: NotesDatabase = serde_json::from_value(value)
            .map_err(|e| PersistenceError::InvalidBackup(e.to_string()))?;
        log::info!("Imported backup with {} folders", db.folders.len());
        self.db = db;
        self.save()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

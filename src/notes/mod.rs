//! Folders of notes, persisted as one JSON document in a key-value store.

mod autosave;
mod kv;
mod library;
mod model;

pub use autosave::AutosaveDebouncer;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use library::{NoteLibrary, NoteUpdate, STORAGE_KEY};
pub use model::{
    DATABASE_VERSION, Folder, Note, NotesDatabase, PageDrawing, backup_file_name,
    is_backup_file_name,
};

use thiserror::Error;

/// Errors that can occur while loading or saving notes
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize notes: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("No folder with id {0}")]
    FolderNotFound(String),

    #[error("No note with id {note} in folder {folder}")]
    NoteNotFound { folder: String, note: String },

    #[error("Invalid backup: {0}")]
    InvalidBackup(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

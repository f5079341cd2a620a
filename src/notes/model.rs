use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stroke::Stroke;

pub const DATABASE_VERSION: u32 = 1;

/// Everything the app persists, stored under a single key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesDatabase {
    pub folders: Vec<Folder>,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub last_updated: DateTime<Utc>,
}

fn default_version() -> u32 {
    DATABASE_VERSION
}

impl NotesDatabase {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            folders: Vec::new(),
            version: DATABASE_VERSION,
            last_updated: now,
        }
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn folder_mut(&mut self, id: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| f.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    pub fn new(id: String, name: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            notes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn note_mut(&mut self, id: &str) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }
}

/// Ink saved for one PDF page.
///
/// Older saves hold a flattened PNG data URL instead of strokes. Those are
/// kept as they are so a save does not lose them, but cannot be edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageDrawing {
    Strokes(Vec<Stroke>),
    Snapshot(String),
}

impl PageDrawing {
    pub fn strokes(&self) -> Option<&[Stroke]> {
        match self {
            Self::Strokes(strokes) => Some(strokes),
            Self::Snapshot(_) => None,
        }
    }
}

impl From<Vec<Stroke>> for PageDrawing {
    fn from(strokes: Vec<Stroke>) -> Self {
        Self::Strokes(strokes)
    }
}

/// A markdown document with the ink drawn over it and over its PDF pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub drawings: Vec<Stroke>,
    /// Ink per PDF page number (1-based).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pdf_drawings: BTreeMap<u32, PageDrawing>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(id: String, name: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            markdown: String::new(),
            drawings: Vec::new(),
            pdf_drawings: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Editable page ink, ready for [`crate::PageInkSet::load_pages`].
    /// Snapshot pages are left out.
    pub fn page_strokes(&self) -> BTreeMap<u32, Vec<Stroke>> {
        self.pdf_drawings
            .iter()
            .filter_map(|(page, drawing)| Some((*page, drawing.strokes()?.to_vec())))
            .collect()
    }

    /// Stores page ink from the editor. Snapshot pages with no new strokes
    /// are kept; every other page is replaced.
    pub fn set_page_strokes(&mut self, pages: BTreeMap<u32, Vec<Stroke>>) {
        self.pdf_drawings
            .retain(|page, drawing| matches!(drawing, PageDrawing::Snapshot(_)) && !pages.contains_key(page));
        self.pdf_drawings
            .extend(pages.into_iter().map(|(page, strokes)| (page, strokes.into())));
    }
}

const BACKUP_PREFIX: &str = "study-notes-backup-";

/// `study-notes-backup-YYYY-MM-DD.json` for the given day (UTC).
pub fn backup_file_name(now: DateTime<Utc>) -> String {
    format!("{BACKUP_PREFIX}{}.json", now.format("%Y-%m-%d"))
}

pub fn is_backup_file_name(name: &str) -> bool {
    name.starts_with(BACKUP_PREFIX) && name.ends_with(".json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_backup_file_name() {
        assert_eq!(
            backup_file_name(DateTime::<Utc>::default()),
            "study-notes-backup-1970-01-01.json"
        );
        let leap_day = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        assert_eq!(backup_file_name(leap_day), "study-notes-backup-2024-02-29.json");
        assert!(is_backup_file_name(&backup_file_name(leap_day)));
        assert!(!is_backup_file_name("study_notes_data.json"));
    }

    #[test]
    fn test_note_schema_uses_camel_case() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let note = Note::new("n1".into(), "Lecture".into(), created);
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["createdAt"], "2024-03-01T10:00:00Z");
        assert_eq!(json["drawings"], serde_json::json!([]));
        assert!(json.get("pdfDrawings").is_none());
    }

    #[test]
    fn test_legacy_fields_are_tolerated() {
        let json = r##"{
            "folders": [{
                "id": "1700000000000",
                "name": "Math",
                "notes": [{
                    "id": "1700000000001",
                    "name": "Limits",
                    "markdown": "# Limits",
                    "drawings": [{"tool": "pen", "color": "#ffffff", "size": 3, "opacity": 1, "points": [{"x": 1, "y": 2}]}],
                    "textBoxes": [],
                    "createdAt": "2024-03-01T10:00:00.000Z"
                }]
            }],
            "version": 1
        }"##;
        let db: NotesDatabase = serde_json::from_str(json).unwrap();
        let note = &db.folders[0].notes[0];
        assert_eq!(note.drawings.len(), 1);
        assert_eq!(note.drawings[0].points()[0], egui::pos2(1.0, 2.0));
        assert_eq!(note.created_at, Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
        assert_eq!(note.updated_at, DateTime::<Utc>::default());
    }

    #[test]
    fn test_page_snapshots_are_kept() {
        let json = r##"{
            "id": "n", "name": "Slides",
            "pdfDrawings": {
                "1": "data:image/png;base64,iVBORw0KGgo=",
                "2": [{"tool": "pen", "color": "#ffffff", "size": 3, "points": [{"x": 1, "y": 2}]}]
            }
        }"##;
        let mut note: Note = serde_json::from_str(json).unwrap();
        assert!(matches!(note.pdf_drawings[&1], PageDrawing::Snapshot(_)));
        assert_eq!(note.page_strokes().keys().copied().collect::<Vec<_>>(), vec![2]);

        let stroke = note.page_strokes()[&2][0].clone();
        note.set_page_strokes(BTreeMap::from([(3, vec![stroke.clone()])]));
        assert!(matches!(note.pdf_drawings[&1], PageDrawing::Snapshot(_)));
        assert!(!note.pdf_drawings.contains_key(&2));
        assert_eq!(note.pdf_drawings[&3], PageDrawing::Strokes(vec![stroke.clone()]));

        // Drawing over a snapshot page replaces the picture.
        note.set_page_strokes(BTreeMap::from([(1, vec![stroke])]));
        assert!(note.pdf_drawings[&1].strokes().is_some());

        let saved = serde_json::to_value(&note).unwrap();
        assert!(saved["pdfDrawings"]["1"].is_array());
    }
}

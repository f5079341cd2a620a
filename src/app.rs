use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::EngineConfig;
use crate::engine::DrawingEngine;
use crate::event::StatusTracker;
use crate::history::ClearPolicy;
use crate::input::{EguiInputTranslator, InkInputPolicy, InputEvent};
use crate::notes::{
    AutosaveDebouncer, KeyValueStore, MemoryStore, NoteLibrary, NoteUpdate, PersistenceError,
    PersistenceResult, backup_file_name, is_backup_file_name,
};
use crate::panels::{central_panel, tools_panel};
use crate::surface::SurfaceSize;
use crate::texture_manager::TextureManager;
use crate::tools::Tool;

pub const APP_ID: &str = "study_ink";

const TOAST_SECS: f64 = 4.0;

/// What survives a restart besides the notes themselves.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppState {
    pub config: EngineConfig,
    pub tool: Tool,
    pub open_folder: Option<String>,
    pub open_note: Option<String>,
}

struct Toast {
    message: String,
    error: bool,
    /// Set on the first frame the toast is visible.
    shown_at: Option<f64>,
}

/// The folder/note currently being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenNote {
    pub folder_id: String,
    pub note_id: String,
}

pub struct StudyInkApp {
    state: AppState,
    engine: DrawingEngine,
    status: StatusTracker,
    library: NoteLibrary,
    open: Option<OpenNote>,
    markdown: String,
    autosave: AutosaveDebouncer,
    input: EguiInputTranslator,
    textures: TextureManager,
    toasts: Vec<Toast>,
    backup_dir: Option<PathBuf>,
    pub(crate) new_folder_name: String,
    pub(crate) new_note_name: String,
}

impl StudyInkApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let state: AppState = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_store(state, notes_store()).with_backup_dir(default_backup_dir())
    }

    /// Builds the app over an explicit store; used by [`Self::new`] and tests.
    pub fn with_store(state: AppState, store: Box<dyn KeyValueStore>) -> Self {
        let mut toasts = Vec::new();
        let library = match NoteLibrary::open(store) {
            Ok(library) => library,
            Err(e) => {
                log::error!("Failed to load notes: {e}");
                toasts.push(Toast {
                    message: format!("Could not load notes: {e}"),
                    error: true,
                    shown_at: None,
                });
                NoteLibrary::empty(Box::new(MemoryStore::new()))
            }
        };

        let mut engine = DrawingEngine::new(&state.config, SurfaceSize::default());
        engine.set_tool(state.tool);
        let status = StatusTracker::new();
        engine.subscribe(Box::new(status.clone()));

        let mut app = Self {
            autosave: AutosaveDebouncer::new(state.config.autosave_delay_secs),
            state,
            engine,
            status,
            library,
            open: None,
            markdown: String::new(),
            input: EguiInputTranslator::new(egui::Rect::NOTHING),
            textures: TextureManager::default(),
            toasts,
            backup_dir: None,
            new_folder_name: String::new(),
            new_note_name: String::new(),
        };

        if let (Some(folder), Some(note)) = (app.state.open_folder.clone(), app.state.open_note.clone()) {
            app.open_note(&folder, &note);
        }
        app
    }

    /// Where backup files are written and looked for. `None` disables them.
    pub fn with_backup_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.backup_dir = dir;
        self
    }

    pub fn backup_dir(&self) -> Option<&Path> {
        self.backup_dir.as_deref()
    }

    pub fn engine(&self) -> &DrawingEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DrawingEngine {
        &mut self.engine
    }

    pub fn library(&self) -> &NoteLibrary {
        &self.library
    }

    pub fn open_note_ids(&self) -> Option<&OpenNote> {
        self.open.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.state.config
    }

    pub(crate) fn markdown_mut(&mut self) -> &mut String {
        &mut self.markdown
    }

    pub(crate) fn input_mut(&mut self) -> &mut EguiInputTranslator {
        &mut self.input
    }

    /// The note's ink, uploaded to the GPU if it changed since last frame.
    pub(crate) fn ink_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureId> {
        self.textures.texture_for(ctx, 0, self.engine.surface())
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.engine.set_tool(tool);
        self.state.tool = tool;
    }

    /// Persists the tool settings the user just changed.
    pub fn sync_settings(&mut self) {
        self.state.config.tools = *self.engine.settings();
    }

    pub fn set_input_policy(&mut self, policy: InkInputPolicy) {
        self.engine.set_input_policy(policy);
        self.state.config.input_policy = policy;
    }

    pub fn set_clear_policy(&mut self, policy: ClearPolicy) {
        self.engine.set_clear_policy(policy);
        self.state.config.clear_policy = policy;
    }

    /// Remembers a content edit; the note is saved once edits pause.
    pub fn markdown_edited(&mut self, now: f64) {
        self.autosave.mark_dirty(now);
    }

    /// Feeds pointer events to the engine. Returns whether any was consumed.
    pub fn handle_pointer_events(&mut self, events: &[InputEvent]) -> bool {
        let mut consumed = false;
        for event in events {
            consumed |= self.engine.handle_input(event);
        }
        consumed
    }

    // ---------------------------------------------------------------------
    // Notes

    pub fn open_note(&mut self, folder_id: &str, note_id: &str) {
        self.flush();
        let Some(note) = self.library.note(folder_id, note_id) else {
            log::warn!("Note {note_id} in folder {folder_id} no longer exists");
            self.close_note();
            return;
        };
        self.markdown = note.markdown.clone();
        let drawings = note.drawings.clone();
        self.engine.load_drawings(drawings);
        self.status.take_dirty();
        self.autosave.reset();

        self.open = Some(OpenNote {
            folder_id: folder_id.to_owned(),
            note_id: note_id.to_owned(),
        });
        self.state.open_folder = Some(folder_id.to_owned());
        self.state.open_note = Some(note_id.to_owned());
        log::info!("Opened note {note_id}");
    }

    pub fn close_note(&mut self) {
        self.flush();
        self.open = None;
        self.markdown.clear();
        self.engine.load_drawings(Vec::new());
        self.status.take_dirty();
        self.state.open_note = None;
    }

    pub fn create_folder(&mut self, name: &str) {
        let result = self.library.create_folder(name).map(|folder| {
            self.state.open_folder = Some(folder.id);
        });
        self.report(result);
    }

    pub fn select_folder(&mut self, folder_id: &str) {
        self.state.open_folder = Some(folder_id.to_owned());
    }

    pub fn selected_folder(&self) -> Option<&str> {
        self.state.open_folder.as_deref()
    }

    pub fn delete_folder(&mut self, folder_id: &str) {
        if self.open.as_ref().is_some_and(|open| open.folder_id == folder_id) {
            self.close_note();
        }
        let result = self.library.delete_folder(folder_id);
        if result.is_ok() && self.state.open_folder.as_deref() == Some(folder_id) {
            self.state.open_folder = None;
        }
        self.report(result);
    }

    pub fn create_note(&mut self, folder_id: &str, name: &str) {
        match self.library.create_note(folder_id, name) {
            Ok(note) => self.open_note(folder_id, &note.id),
            Err(e) => self.report::<()>(Err(e)),
        }
    }

    pub fn delete_note(&mut self, folder_id: &str, note_id: &str) {
        if self
            .open
            .as_ref()
            .is_some_and(|open| open.folder_id == folder_id && open.note_id == note_id)
        {
            self.autosave.reset();
            self.status.take_dirty();
            self.open = None;
            self.markdown.clear();
            self.engine.load_drawings(Vec::new());
            self.state.open_note = None;
        }
        let result = self.library.delete_note(folder_id, note_id);
        self.report(result);
    }

    pub fn export_backup(&mut self) -> Option<String> {
        self.flush();
        match self.library.export_backup() {
            Ok(json) => Some(json),
            Err(e) => {
                self.report::<()>(Err(e));
                None
            }
        }
    }

    pub fn import_backup(&mut self, json: &str) {
        self.close_note();
        let result = self.library.import_backup(json);
        self.report(result);
    }

    /// Writes today's backup file. Returns its path.
    pub fn export_backup_file(&mut self) -> Option<PathBuf> {
        let dir = self.backup_dir.clone()?;
        let json = self.export_backup()?;
        let path = dir.join(backup_file_name(Utc::now()));
        let written = std::fs::create_dir_all(&dir).and_then(|()| std::fs::write(&path, json));
        match written {
            Ok(()) => {
                log::info!("Backup written to {}", path.display());
                self.notify(format!("Backup saved to {}", path.display()));
                Some(path)
            }
            Err(e) => {
                self.report::<()>(Err(PersistenceError::Io(e)));
                None
            }
        }
    }

    /// Backup files in the backup directory, newest first.
    pub fn backup_files(&self) -> Vec<PathBuf> {
        let Some(entries) = self.backup_dir.as_ref().and_then(|dir| std::fs::read_dir(dir).ok()) else {
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(is_backup_file_name)
            })
            .collect();
        files.sort_by(|a, b| b.cmp(a));
        files
    }

    pub fn import_backup_file(&mut self, path: &Path) {
        match std::fs::read_to_string(path) {
            Ok(json) => self.import_backup(&json),
            Err(e) => self.report::<()>(Err(PersistenceError::Io(e))),
        }
    }

    /// Saves drawings after every committing change, and the markdown once the
    /// autosave delay has passed.
    fn persist(&mut self, now: f64) {
        let Some(open) = self.open.clone() else {
            return;
        };
        if self.status.take_dirty() {
            let result = self
                .library
                .save_drawings(&open.folder_id, &open.note_id, self.engine.drawings());
            self.report(result);
        }
        if self.autosave.take_due(now) {
            let result = self.library.update_note(
                &open.folder_id,
                &open.note_id,
                NoteUpdate {
                    markdown: Some(self.markdown.clone()),
                    ..Default::default()
                },
            );
            self.report(result);
        }
    }

    /// Writes anything pending right away.
    pub fn flush(&mut self) {
        let Some(open) = self.open.clone() else {
            return;
        };
        if !self.status.take_dirty() && !self.autosave.is_dirty() {
            return;
        }
        self.autosave.reset();
        let result = self.library.update_note(
            &open.folder_id,
            &open.note_id,
            NoteUpdate {
                markdown: Some(self.markdown.clone()),
                drawings: Some(self.engine.drawings().to_vec()),
                ..Default::default()
            },
        );
        self.report(result);
    }

    fn report<T>(&mut self, result: PersistenceResult<T>) {
        if let Err(e) = result {
            log::error!("Persistence failed: {e}");
            self.toasts.push(Toast {
                message: e.to_string(),
                error: true,
                shown_at: None,
            });
        }
    }

    fn notify(&mut self, message: String) {
        self.toasts.push(Toast {
            message,
            error: false,
            shown_at: None,
        });
    }

    fn show_toasts(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        self.toasts
            .retain_mut(|t| now - *t.shown_at.get_or_insert(now) < TOAST_SECS);
        if self.toasts.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        if toast.error {
                            ui.colored_label(ui.visuals().error_fg_color, &toast.message);
                        } else {
                            ui.label(&toast.message);
                        }
                    });
                }
            });
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn notes_store() -> Box<dyn KeyValueStore> {
    match eframe::storage_dir(APP_ID) {
        Some(dir) => Box::new(crate::notes::FileStore::new(dir)),
        None => {
            log::warn!("No storage directory; notes will not be kept");
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn notes_store() -> Box<dyn KeyValueStore> {
    Box::new(MemoryStore::new())
}

#[cfg(not(target_arch = "wasm32"))]
fn default_backup_dir() -> Option<PathBuf> {
    eframe::storage_dir(APP_ID).map(|dir| dir.join("backups"))
}

#[cfg(target_arch = "wasm32")]
fn default_backup_dir() -> Option<PathBuf> {
    None
}

impl eframe::App for StudyInkApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.flush();
        eframe::set_value(storage, eframe::APP_KEY, &self.state);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.flush();
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.textures.begin_frame();

        tools_panel(self, ctx);
        central_panel(self, ctx);

        let now = ctx.input(|i| i.time);
        self.persist(now);
        if let Some(remaining) = self.autosave.remaining(now) {
            ctx.request_repaint_after(std::time::Duration::from_secs_f64(remaining));
        }
        self.show_toasts(ctx);
    }
}

use crate::StudyInkApp;
use crate::components::ToolButton;
use crate::history::ClearPolicy;
use crate::input::InkInputPolicy;
use crate::tools::Tool;

pub fn tools_panel(app: &mut StudyInkApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            ui.horizontal(|ui| {
                let active = app.engine().tool();
                let settings = *app.engine().settings();
                for tool in Tool::ALL {
                    let mut button = ToolButton::new(tool, tool == active);
                    if let Some(stroke_tool) = tool.stroke_tool() {
                        button = button.with_swatch(settings.brush(stroke_tool).color.color32());
                    }
                    if button.show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", tool.name());
                        app.set_tool(tool);
                    }
                }
            });

            brush_controls(app, ui);
            ui.separator();

            ui.horizontal(|ui| {
                let history = app.engine().history_state();
                if ui.add_enabled(history.can_undo(), egui::Button::new("Undo")).clicked() {
                    app.engine_mut().undo();
                }
                if ui.add_enabled(history.can_redo(), egui::Button::new("Redo")).clicked() {
                    app.engine_mut().redo();
                }
                let has_ink = !app.engine().drawings().is_empty();
                if ui.add_enabled(has_ink, egui::Button::new("Clear")).clicked() {
                    app.engine_mut().clear_all();
                }
            });

            egui::CollapsingHeader::new("Input").show(ui, |ui| {
                let mut policy = app.engine().input_policy();
                ui.radio_value(&mut policy, InkInputPolicy::PointerDevices, "Pen and mouse");
                ui.radio_value(&mut policy, InkInputPolicy::StylusOnly, "Pen only");
                ui.radio_value(&mut policy, InkInputPolicy::AllDevices, "Fingers too");
                if policy != app.engine().input_policy() {
                    app.set_input_policy(policy);
                }

                let mut undoable = app.config().clear_policy == ClearPolicy::Undoable;
                if ui.checkbox(&mut undoable, "Clear can be undone").changed() {
                    let policy = if undoable {
                        ClearPolicy::Undoable
                    } else {
                        ClearPolicy::Destructive
                    };
                    app.set_clear_policy(policy);
                }
            });

            ui.separator();
            notes_list(app, ui);

            ui.separator();
            backup_controls(app, ui);
        });
}

fn backup_controls(app: &mut StudyInkApp, ui: &mut egui::Ui) {
    egui::CollapsingHeader::new("Backup").show(ui, |ui| {
        if app.backup_dir().is_none() {
            ui.label("Backups are not available here.");
            return;
        }
        if ui.button("Export backup").clicked() {
            app.export_backup_file();
        }
        for path in app.backup_files() {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.horizontal(|ui| {
                ui.label(&name);
                if ui
                    .small_button("Import")
                    .on_hover_text("Replace all notes with this backup")
                    .clicked()
                {
                    app.import_backup_file(&path);
                }
            });
        }
    });
}

fn brush_controls(app: &mut StudyInkApp, ui: &mut egui::Ui) {
    let tool = app.engine().tool();
    let mut changed = false;
    {
        let settings = app.engine_mut().settings_mut();
        match tool.stroke_tool() {
            Some(stroke_tool) => {
                let brush = settings.brush_mut(stroke_tool);
                ui.horizontal(|ui| {
                    let mut color = brush.color.color32();
                    if ui.color_edit_button_srgba(&mut color).changed() {
                        brush.color = color.into();
                        changed = true;
                    }
                    changed |= ui
                        .add(egui::Slider::new(&mut brush.size, 1.0..=40.0).text("size"))
                        .changed();
                });
            }
            None if tool == Tool::Eraser => {
                changed |= ui
                    .add(egui::Slider::new(&mut settings.eraser_size, 5.0..=60.0).text("radius"))
                    .changed();
            }
            None => {}
        }
    }
    if changed {
        app.sync_settings();
    }
}

fn notes_list(app: &mut StudyInkApp, ui: &mut egui::Ui) {
    ui.heading("Notes");

    ui.horizontal(|ui| {
        ui.text_edit_singleline(&mut app.new_folder_name);
        let name = app.new_folder_name.trim().to_owned();
        if ui.add_enabled(!name.is_empty(), egui::Button::new("+ Folder")).clicked() {
            app.create_folder(&name);
            app.new_folder_name.clear();
        }
    });

    let selected = app.selected_folder().map(str::to_owned);
    let open_note = app.open_note_ids().map(|open| open.note_id.clone());
    let folders: Vec<(String, String, Vec<(String, String)>)> = app
        .library()
        .folders()
        .iter()
        .map(|f| {
            let notes = f.notes.iter().map(|n| (n.id.clone(), n.name.clone())).collect();
            (f.id.clone(), f.name.clone(), notes)
        })
        .collect();

    egui::ScrollArea::vertical()
        .id_salt("notes_list")
        .show(ui, |ui| {
            for (folder_id, folder_name, notes) in folders {
                let is_selected = selected.as_deref() == Some(folder_id.as_str());
                ui.horizontal(|ui| {
                    if ui.selectable_label(is_selected, format!("📁 {folder_name}")).clicked() {
                        app.select_folder(&folder_id);
                    }
                    if ui.small_button("🗑").on_hover_text("Delete folder").clicked() {
                        app.delete_folder(&folder_id);
                    }
                });
                if !is_selected {
                    continue;
                }

                ui.indent(&folder_id, |ui| {
                    for (note_id, note_name) in notes {
                        ui.horizontal(|ui| {
                            let is_open = open_note.as_deref() == Some(note_id.as_str());
                            if ui.selectable_label(is_open, &note_name).clicked() && !is_open {
                                app.open_note(&folder_id, &note_id);
                            }
                            if ui.small_button("🗑").on_hover_text("Delete note").clicked() {
                                app.delete_note(&folder_id, &note_id);
                            }
                        });
                    }
                    ui.horizontal(|ui| {
                        ui.text_edit_singleline(&mut app.new_note_name);
                        let name = app.new_note_name.trim().to_owned();
                        if ui.add_enabled(!name.is_empty(), egui::Button::new("+ Note")).clicked() {
                            app.create_note(&folder_id, &name);
                            app.new_note_name.clear();
                        }
                    });
                });
            }
        });
}

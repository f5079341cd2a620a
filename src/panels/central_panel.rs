use crate::StudyInkApp;
use crate::input::DeviceClass;
use crate::surface::{SurfaceLayout, SurfaceMapping};
use crate::tools::Tool;

pub fn central_panel(app: &mut StudyInkApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        if app.open_note_ids().is_none() {
            ui.centered_and_justified(|ui| ui.label("Select or create a note"));
            return;
        }

        let inking = app.engine().tool() != Tool::View;
        // Fingers keep scrolling unless they are allowed to ink.
        let touch_scrolls = !app.engine().input_policy().inks_with(DeviceClass::Touch)
            && app.input_mut().touch_active();
        let drag_to_scroll = !inking || touch_scrolls;

        let output = egui::ScrollArea::vertical()
            .id_salt("note_content")
            .auto_shrink([false, false])
            .drag_to_scroll(drag_to_scroll)
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(app.markdown_mut())
                        .font(egui::TextStyle::Monospace)
                        .desired_width(f32::INFINITY)
                        .desired_rows(40)
                        .interactive(!inking),
                )
                .changed()
            });
        if output.inner {
            app.markdown_edited(ui.input(|i| i.time));
        }

        // The ink surface scrolls with the content and covers all of it.
        let viewport = output.inner_rect;
        let origin = viewport.min - output.state.offset;
        let engine = app.engine_mut();
        engine.resize(SurfaceLayout::new(viewport.size(), output.content_size));
        let displayed = engine.surface().size().to_vec2();
        engine.set_mapping(SurfaceMapping::new(origin, displayed));

        app.input_mut().set_canvas_rect(viewport);
        let events = ui.input(|i| i.raw.events.clone());
        let frame = app.input_mut().process(&events);
        app.handle_pointer_events(&frame.pointer);
        if ctx.memory(|m| m.focused().is_none()) {
            for command in frame.commands {
                app.engine_mut().run_command(command);
            }
        }
        if app.engine().is_drawing() {
            ctx.request_repaint();
        }

        if let Some(texture) = app.ink_texture(ctx) {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter_at(viewport).image(
                texture,
                egui::Rect::from_min_size(origin, displayed),
                uv,
                egui::Color32::WHITE,
            );
        }
    });
}

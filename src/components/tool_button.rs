use crate::tools::Tool;

/// Square toolbar button showing a tool's glyph.
pub struct ToolButton {
    pub tool: Tool,
    pub selected: bool,
    /// Drawn as a strip under the glyph for inking tools.
    pub swatch: Option<egui::Color32>,
}

impl ToolButton {
    pub fn new(tool: Tool, selected: bool) -> Self {
        Self {
            tool,
            selected,
            swatch: None,
        }
    }

    pub fn with_swatch(mut self, color: egui::Color32) -> Self {
        self.swatch = Some(color);
        self
    }

    pub fn icon(tool: Tool) -> &'static str {
        match tool {
            Tool::View => "👁",
            Tool::Pen => "✏",
            Tool::Highlighter => "🖍",
            Tool::Eraser => "⌫",
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(36.0, 36.0);
        let (rect, response) = ui.allocate_exact_size(button_size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                egui::Color32::from_rgb(100, 181, 246)
            } else if response.hovered() {
                egui::Color32::from_gray(40)
            } else {
                egui::Color32::from_gray(30)
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let text_color = if self.selected {
                egui::Color32::BLACK
            } else {
                egui::Color32::WHITE
            };
            ui.painter().text(
                rect.center() - egui::vec2(0.0, 2.0),
                egui::Align2::CENTER_CENTER,
                Self::icon(self.tool),
                egui::FontId::proportional(20.0),
                text_color,
            );

            if let Some(color) = self.swatch {
                let strip = egui::Rect::from_min_max(
                    egui::pos2(rect.left() + 6.0, rect.bottom() - 6.0),
                    egui::pos2(rect.right() - 6.0, rect.bottom() - 3.0),
                );
                ui.painter().rect_filled(strip, 1.0, color);
            }

            if self.selected {
                ui.painter().rect_stroke(
                    rect,
                    4.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(33, 150, 243)),
                );
            }
        }

        response.on_hover_text(self.tool.name())
    }
}

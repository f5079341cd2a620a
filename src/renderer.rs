use egui::Pos2;
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Transform};

use crate::stroke::{Stroke, StrokeStyle};
use crate::surface::Surface;

/// Paints strokes onto a [`Surface`].
///
/// Segments are painted one at a time with round caps and joins, the same way
/// while drawing and while replaying, so a redraw matches what was on screen.
#[derive(Debug, Clone, Copy)]
pub struct StrokeRenderer {
    anti_alias: bool,
}

impl Default for StrokeRenderer {
    fn default() -> Self {
        Self { anti_alias: true }
    }
}

impl StrokeRenderer {
    pub fn new(anti_alias: bool) -> Self {
        Self { anti_alias }
    }

    /// Paints one segment. O(1); called for every pointer move while drawing.
    pub fn draw_segment(&self, surface: &mut Surface, from: Pos2, to: Pos2, style: StrokeStyle) {
        let Some(pixmap) = surface.pixmap_mut() else {
            return;
        };
        let mut builder = PathBuilder::new();
        builder.move_to(from.x, from.y);
        builder.line_to(to.x, to.y);
        let Some(path) = builder.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(segment_color(style));
        paint.anti_alias = self.anti_alias;

        let line = tiny_skia::Stroke {
            width: style.size.max(0.0),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &line, Transform::identity(), None);
        surface.touch();
    }

    pub fn draw_stroke(&self, surface: &mut Surface, stroke: &Stroke) {
        let style = stroke.style();
        for (from, to) in stroke.segments() {
            self.draw_segment(surface, from, to, style);
        }
    }

    /// Clears the surface and replays `strokes` in order.
    ///
    /// O(total points); only for undo, redo, erase, clear, load and resize.
    pub fn redraw_all(&self, surface: &mut Surface, strokes: &[Stroke]) {
        surface.clear();
        for stroke in strokes {
            self.draw_stroke(surface, stroke);
        }
        log::debug!(
            "Redrew {} strokes on {}x{} surface",
            strokes.len(),
            surface.size().width,
            surface.size().height
        );
    }
}

fn segment_color(style: StrokeStyle) -> Color {
    let [r, g, b, a] = style.color.rgba();
    let alpha = (f32::from(a) * style.opacity.clamp(0.0, 1.0)).round() as u8;
    Color::from_rgba8(r, g, b, alpha)
}

use egui::Pos2;

use crate::input::PointerId;
use crate::stroke::MutableStroke;
use crate::tools::{Tool, ToolSettings};

/// What the active pointer is doing.
#[derive(Debug, Clone)]
pub enum GestureKind {
    Stroke(MutableStroke),
    /// `removed` counts strokes erased so far in this pass.
    Erase { removed: usize },
}

/// One pointer-down-to-release interaction.
#[derive(Debug, Clone)]
pub struct Gesture {
    pub pointer_id: PointerId,
    pub kind: GestureKind,
    /// Last known position in surface pixels.
    pub last: Pos2,
    /// The tool a stylus button replaced with the eraser for this gesture.
    /// The selected tool is never rewritten, so release needs no restore step.
    pub overridden: Option<Tool>,
}

/// Transient drawing state: selected tool, its settings and the gesture in
/// progress.
#[derive(Debug, Clone, Default)]
pub struct DrawingSession {
    pub(crate) tool: Tool,
    pub(crate) settings: ToolSettings,
    pub(crate) gesture: Option<Gesture>,
}

impl DrawingSession {
    pub fn new(tool: Tool, settings: ToolSettings) -> Self {
        Self {
            tool,
            settings,
            gesture: None,
        }
    }

    /// The tool selected in the toolbar.
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// The tool actually in effect, taking a stylus override into account.
    pub fn effective_tool(&self) -> Tool {
        match &self.gesture {
            Some(gesture) if gesture.overridden.is_some() => Tool::Eraser,
            _ => self.tool,
        }
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn active_pointer(&self) -> Option<PointerId> {
        self.gesture.as_ref().map(|g| g.pointer_id)
    }

    pub fn is_drawing(&self) -> bool {
        self.gesture.is_some()
    }
}

use serde::{Deserialize, Serialize};

use crate::stroke::{InkColor, StrokeTool};

/// The tool selected in the toolbar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Drawing disabled; pointer input goes to the content (typing, scrolling).
    #[default]
    View,
    Pen,
    Highlighter,
    Eraser,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::View, Tool::Pen, Tool::Highlighter, Tool::Eraser];

    pub fn name(self) -> &'static str {
        match self {
            Self::View => "View",
            Self::Pen => "Pen",
            Self::Highlighter => "Highlighter",
            Self::Eraser => "Eraser",
        }
    }

    /// The kind of stroke this tool lays down, if it inks at all.
    pub fn stroke_tool(self) -> Option<StrokeTool> {
        match self {
            Self::Pen => Some(StrokeTool::Ink),
            Self::Highlighter => Some(StrokeTool::Highlighter),
            Self::View | Self::Eraser => None,
        }
    }

    pub fn is_inking(self) -> bool {
        self.stroke_tool().is_some()
    }
}

/// Color and width used by one inking tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushSettings {
    pub color: InkColor,
    pub size: f32,
}

/// Per-tool settings. Each inking tool remembers its own color and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub pen: BrushSettings,
    pub highlighter: BrushSettings,
    pub eraser_size: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            pen: BrushSettings {
                color: InkColor::WHITE,
                size: 3.0,
            },
            highlighter: BrushSettings {
                color: InkColor::HIGHLIGHTER_YELLOW,
                size: 15.0,
            },
            eraser_size: 15.0,
        }
    }
}

impl ToolSettings {
    pub fn brush(&self, tool: StrokeTool) -> BrushSettings {
        match tool {
            StrokeTool::Ink => self.pen,
            StrokeTool::Highlighter => self.highlighter,
        }
    }

    pub fn brush_mut(&mut self, tool: StrokeTool) -> &mut BrushSettings {
        match tool {
            StrokeTool::Ink => &mut self.pen,
            StrokeTool::Highlighter => &mut self.highlighter,
        }
    }

    /// Sizes multiplied by `factor`, for surfaces drawn at a zoom level.
    pub fn scaled(&self, factor: f32) -> Self {
        let mut scaled = *self;
        scaled.pen.size *= factor;
        scaled.highlighter.size *= factor;
        scaled.eraser_size *= factor;
        scaled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_selection() {
        assert_eq!(Tool::default(), Tool::View);
        assert_eq!(Tool::Pen.stroke_tool(), Some(StrokeTool::Ink));
        assert_eq!(Tool::Highlighter.stroke_tool(), Some(StrokeTool::Highlighter));
        assert!(!Tool::Eraser.is_inking());
        assert!(!Tool::View.is_inking());
    }

    #[test]
    fn test_settings_are_per_tool() {
        let mut settings = ToolSettings::default();
        settings.brush_mut(StrokeTool::Ink).size = 7.0;
        assert_eq!(settings.brush(StrokeTool::Ink).size, 7.0);
        assert_eq!(settings.brush(StrokeTool::Highlighter).size, 15.0);
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: ToolSettings = serde_json::from_str(r#"{"eraser_size": 30}"#).unwrap();
        assert_eq!(settings.eraser_size, 30.0);
        assert_eq!(settings.pen, ToolSettings::default().pen);
    }
}

use crate::history::HistoryState;
use crate::tools::Tool;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A finished stroke entered the history.
    StrokeCommitted { points: usize },
    /// The committed strokes changed and should be persisted.
    DrawingsChanged,
    /// Undo/redo availability may have changed.
    HistoryChanged(HistoryState),
    ToolChanged { old: Tool, new: Tool },
}

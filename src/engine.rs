use egui::Pos2;

use crate::config::EngineConfig;
use crate::eraser::Eraser;
use crate::event::{EngineEvent, EventBus, EventHandler};
use crate::history::{ClearPolicy, HistoryController, HistoryState};
use crate::input::{Decision, InkInputPolicy, InputArbiter, InputEvent, KeyCommand, PointerEvent};
use crate::renderer::StrokeRenderer;
use crate::session::{DrawingSession, Gesture, GestureKind};
use crate::store::StrokeStore;
use crate::stroke::{MutableStroke, Stroke};
use crate::surface::{Surface, SurfaceLayout, SurfaceMapping, SurfaceSize};
use crate::tools::{Tool, ToolSettings};

/// One ink layer: its strokes, the session drawing into it and the surface
/// they are painted on.
///
/// Each open note (or PDF page) owns its own engine. Nothing else mutates the
/// store; collaborators read [`DrawingEngine::drawings`] or replace it
/// wholesale with [`DrawingEngine::load_drawings`].
#[derive(Debug)]
pub struct DrawingEngine {
    store: StrokeStore,
    history: HistoryController,
    session: DrawingSession,
    arbiter: InputArbiter,
    renderer: StrokeRenderer,
    surface: Surface,
    mapping: SurfaceMapping,
    events: EventBus,
}

impl DrawingEngine {
    pub fn new(config: &EngineConfig, size: SurfaceSize) -> Self {
        Self {
            store: StrokeStore::new(),
            history: HistoryController::new(config.clear_policy),
            session: DrawingSession::new(Tool::default(), config.tools),
            arbiter: InputArbiter::new(config.input_policy),
            renderer: StrokeRenderer::default(),
            surface: Surface::new(size),
            mapping: SurfaceMapping::default(),
            events: EventBus::new(),
        }
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.events.subscribe(handler);
    }

    // ---------------------------------------------------------------------
    // Tools and settings

    pub fn tool(&self) -> Tool {
        self.session.tool()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        let old = self.session.tool;
        if old == tool {
            return;
        }
        self.session.tool = tool;
        log::info!("Tool changed: {} -> {}", old.name(), tool.name());
        self.events.emit(EngineEvent::ToolChanged { old, new: tool });
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn settings(&self) -> &ToolSettings {
        self.session.settings()
    }

    /// Settings apply to the next gesture; a stroke in progress keeps its style.
    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.session.settings
    }

    pub fn input_policy(&self) -> InkInputPolicy {
        self.arbiter.policy()
    }

    pub fn set_input_policy(&mut self, policy: InkInputPolicy) {
        self.arbiter.set_policy(policy);
    }

    pub fn set_clear_policy(&mut self, policy: ClearPolicy) {
        self.history.set_clear_policy(policy);
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_drawing()
    }

    // ---------------------------------------------------------------------
    // Pointer input

    /// Feeds one input event. Returns whether the engine consumed it; hosts
    /// let unconsumed events through to the platform (scrolling and so on).
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown(e) => self.pointer_down(e).is_claimed(),
            InputEvent::PointerMove(e) => self.pointer_move(e),
            InputEvent::PointerUp(e) => self.pointer_up(e),
            InputEvent::PointerCancel(e) => self.pointer_cancel(e),
            InputEvent::PointerLeave { event, captured } => self.pointer_leave(event, *captured),
        }
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) -> Decision {
        // The same pointer going down again means its release was lost.
        if self.arbiter.owns(self.session.active_pointer(), event) {
            log::warn!("Pointer {:?} pressed again without release", event.pointer_id);
            self.finish_gesture();
        }

        let decision = self
            .arbiter
            .decide(event, self.session.tool, self.session.active_pointer());
        let position = self.to_surface(event.position);

        let kind = match decision {
            Decision::BeginStroke(stroke_tool) => {
                let had_redo = !self.store.redo_strokes().is_empty();
                self.history.begin_stroke(&mut self.store);
                if had_redo {
                    self.emit_history();
                }
                let brush = self.session.settings.brush(stroke_tool);
                GestureKind::Stroke(MutableStroke::new(stroke_tool, brush.color, brush.size, position))
            }
            Decision::BeginErase { .. } => GestureKind::Erase { removed: 0 },
            Decision::Ignore(reason) => {
                log::trace!("Ignoring pointer {:?}: {:?}", event.pointer_id, reason);
                return decision;
            }
        };

        let overridden = match decision {
            Decision::BeginErase { overrides } => overrides,
            _ => None,
        };
        if let Some(tool) = overridden {
            log::debug!("Stylus button: erasing in place of {}", tool.name());
        }
        log::debug!("Gesture started by {:?} at {:?}", event.pointer_id, position);

        self.session.gesture = Some(Gesture {
            pointer_id: event.pointer_id,
            kind,
            last: position,
            overridden,
        });
        decision
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) -> bool {
        if !self.arbiter.owns(self.session.active_pointer(), event) {
            return false;
        }
        let position = self.to_surface(event.position);
        let eraser = Eraser::new(self.session.settings.eraser_size);

        let Some(gesture) = self.session.gesture.as_mut() else {
            return false;
        };
        match &mut gesture.kind {
            GestureKind::Stroke(stroke) => {
                self.renderer
                    .draw_segment(&mut self.surface, gesture.last, position, stroke.style());
                stroke.add_point(position);
            }
            GestureKind::Erase { removed } => {
                let count = eraser.erase(&mut self.store, position);
                if count > 0 {
                    *removed += count;
                    self.renderer.redraw_all(&mut self.surface, self.store.strokes());
                }
            }
        }
        gesture.last = position;
        true
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) -> bool {
        if !self.arbiter.owns(self.session.active_pointer(), event) {
            return false;
        }
        self.finish_gesture();
        true
    }

    /// Discards the stroke in progress if `event` comes from its pointer.
    pub fn pointer_cancel(&mut self, event: &PointerEvent) -> bool {
        if !self.arbiter.owns(self.session.active_pointer(), event) {
            return false;
        }
        let Some(gesture) = self.session.gesture.take() else {
            return false;
        };
        match gesture.kind {
            GestureKind::Stroke(stroke) => {
                log::debug!("Stroke cancelled after {} points", stroke.points().len());
                self.redraw_all();
            }
            GestureKind::Erase { removed } => self.notify_erased(removed),
        }
        true
    }

    /// Ends the gesture when its pointer leaves without capture.
    pub fn pointer_leave(&mut self, event: &PointerEvent, captured: bool) -> bool {
        if captured || !self.arbiter.owns(self.session.active_pointer(), event) {
            return false;
        }
        self.finish_gesture();
        true
    }

    fn finish_gesture(&mut self) {
        let Some(gesture) = self.session.gesture.take() else {
            return;
        };
        if let Some(tool) = gesture.overridden {
            log::debug!("Stylus button released, back to {}", tool.name());
        }
        match gesture.kind {
            GestureKind::Stroke(stroke) => self.commit(stroke.into_stroke()),
            GestureKind::Erase { removed } => self.notify_erased(removed),
        }
    }

    fn commit(&mut self, stroke: Stroke) {
        let points = stroke.points().len();
        if self.history.commit(&mut self.store, stroke) {
            log::debug!("Committed stroke with {points} points");
            self.events.emit(EngineEvent::StrokeCommitted { points });
            self.mutated();
        }
    }

    fn notify_erased(&mut self, removed: usize) {
        if removed > 0 {
            log::debug!("Erased {removed} strokes");
            self.mutated();
        }
    }

    fn to_surface(&self, device: Pos2) -> Pos2 {
        self.mapping.to_surface(device, self.surface.size())
    }

    // ---------------------------------------------------------------------
    // History

    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo(&mut self.store);
        if changed {
            self.redraw_all();
            self.mutated();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo(&mut self.store);
        if changed {
            self.redraw_all();
            self.mutated();
        }
        changed
    }

    pub fn clear_all(&mut self) -> bool {
        let changed = self.history.clear_all(&mut self.store);
        if changed {
            log::info!("Cleared canvas ({:?})", self.history.clear_policy());
            self.redraw_all();
            self.mutated();
        }
        changed
    }

    pub fn run_command(&mut self, command: KeyCommand) -> bool {
        match command {
            KeyCommand::Undo => self.undo(),
            KeyCommand::Redo => self.redo(),
        }
    }

    /// Erases at a surface position outside of a pointer gesture.
    pub fn erase_at(&mut self, position: Pos2) -> usize {
        let removed = Eraser::new(self.session.settings.eraser_size).erase(&mut self.store, position);
        if removed > 0 {
            self.redraw_all();
            self.mutated();
        }
        removed
    }

    pub fn history_state(&self) -> HistoryState {
        self.history.state(&self.store)
    }

    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    fn mutated(&self) {
        self.events.emit(EngineEvent::DrawingsChanged);
        self.emit_history();
    }

    fn emit_history(&self) {
        self.events
            .emit(EngineEvent::HistoryChanged(self.history.state(&self.store)));
    }

    // ---------------------------------------------------------------------
    // Persistence boundary

    /// Committed strokes, for the persistence collaborator.
    pub fn drawings(&self) -> &[Stroke] {
        self.store.strokes()
    }

    /// Replaces the strokes with persisted ones. Drops any gesture and the
    /// redo sequence.
    pub fn load_drawings(&mut self, strokes: Vec<Stroke>) {
        self.session.gesture = None;
        log::info!("Loading {} strokes", strokes.len());
        self.store = StrokeStore::from_strokes(strokes);
        self.redraw_all();
        self.emit_history();
    }

    // ---------------------------------------------------------------------
    // Surface

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn mapping(&self) -> SurfaceMapping {
        self.mapping
    }

    pub fn set_mapping(&mut self, mapping: SurfaceMapping) {
        self.mapping = mapping;
    }

    /// Resizes the surface to cover `layout` and replays every stroke.
    /// Returns whether the size changed.
    pub fn resize(&mut self, layout: SurfaceLayout) -> bool {
        let size = layout.surface_size();
        if !self.surface.resize(size) {
            return false;
        }
        log::debug!("Surface resized to {}x{}", size.width, size.height);
        // Reallocation dropped every pixel.
        self.redraw_all();
        true
    }

    /// Multiplies every stroke, including redo and the one in progress, by
    /// `factor`. Used when the page under the ink is zoomed; not a history
    /// change.
    pub fn rescale(&mut self, factor: f32) {
        self.store.scale(factor);
        if let Some(gesture) = self.session.gesture.as_mut() {
            if let GestureKind::Stroke(stroke) = &mut gesture.kind {
                stroke.scale(factor);
            }
            gesture.last = (gesture.last.to_vec2() * factor).to_pos2();
        }
        log::debug!("Rescaled ink by {factor}");
        self.redraw_all();
    }

    pub fn redraw_all(&mut self) {
        self.renderer.redraw_all(&mut self.surface, self.store.strokes());
    }
}

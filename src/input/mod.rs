use egui::{Key, Modifiers, Pos2};

mod arbiter;
mod egui_input;

pub use arbiter::{Decision, IgnoreReason, InkInputPolicy, InputArbiter};
pub use egui_input::{EguiInputTranslator, FrameInput, MOUSE_POINTER_ID};

/// Identifies one pointer (a finger, a pen, a mouse) for the length of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

/// The class of device a pointer event comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Stylus,
    Mouse,
    Touch,
}

/// The button whose state changed with this event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
    /// The eraser end, or eraser button, of a stylus.
    Eraser,
    Other,
}

impl From<egui::PointerButton> for PointerButton {
    fn from(button: egui::PointerButton) -> Self {
        match button {
            egui::PointerButton::Primary => Self::Primary,
            egui::PointerButton::Secondary => Self::Secondary,
            egui::PointerButton::Middle => Self::Auxiliary,
            egui::PointerButton::Extra1 | egui::PointerButton::Extra2 => Self::Other,
        }
    }
}

/// Buttons held down during an event, as a bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ButtonMask(pub u32);

impl ButtonMask {
    pub const NONE: Self = Self(0);
    pub const PRIMARY: Self = Self(1);
    pub const SECONDARY: Self = Self(2);
    pub const AUXILIARY: Self = Self(4);
    pub const ERASER: Self = Self(32);
    /// Reported by some pens for their side button.
    pub const STYLUS_BUTTON: Self = Self(64);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// One pointer event, in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub device: DeviceClass,
    pub position: Pos2,
    /// The button that changed, on press and release.
    pub button: Option<PointerButton>,
    pub buttons: ButtonMask,
}

impl PointerEvent {
    /// A plain event with the primary button, as most devices report contact.
    pub fn new(pointer_id: u64, device: DeviceClass, position: Pos2) -> Self {
        Self {
            pointer_id: PointerId(pointer_id),
            device,
            position,
            button: Some(PointerButton::Primary),
            buttons: ButtonMask::PRIMARY,
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn with_buttons(mut self, buttons: ButtonMask) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn at(mut self, position: Pos2) -> Self {
        self.position = position;
        self
    }
}

/// Pointer input the drawing engine understands.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    /// The platform took the pointer away (e.g. a system gesture).
    PointerCancel(PointerEvent),
    /// The pointer left the surface. `captured` tells whether the surface
    /// still receives its events.
    PointerLeave { event: PointerEvent, captured: bool },
}

impl InputEvent {
    pub fn pointer(&self) -> &PointerEvent {
        match self {
            InputEvent::PointerDown(event)
            | InputEvent::PointerMove(event)
            | InputEvent::PointerUp(event)
            | InputEvent::PointerCancel(event)
            | InputEvent::PointerLeave { event, .. } => event,
        }
    }
}

/// History commands bound to keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Undo,
    Redo,
}

/// Ctrl+Z undoes; Ctrl+Shift+Z and Ctrl+Y redo. Cmd works in place of Ctrl.
pub fn shortcut_for(key: Key, modifiers: Modifiers) -> Option<KeyCommand> {
    if !(modifiers.ctrl || modifiers.command) {
        return None;
    }
    match key {
        Key::Z if modifiers.shift => Some(KeyCommand::Redo),
        Key::Z => Some(KeyCommand::Undo),
        Key::Y => Some(KeyCommand::Redo),
        _ => None,
    }
}

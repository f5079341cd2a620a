use std::collections::HashSet;

use egui::{Event, Rect, TouchPhase};

use super::{DeviceClass, InputEvent, KeyCommand, PointerEvent, shortcut_for};

/// The mouse always reports as this pointer.
pub const MOUSE_POINTER_ID: u64 = 0;

/// Everything a frame's raw egui events mean to the drawing engine.
#[derive(Debug, Default)]
pub struct FrameInput {
    pub pointer: Vec<InputEvent>,
    pub commands: Vec<KeyCommand>,
}

/// Turns raw egui events into [`InputEvent`]s for one canvas.
///
/// egui does not say which pointer type produced a mouse event, so mouse
/// events map to [`DeviceClass::Mouse`] and touches to [`DeviceClass::Touch`].
/// Mouse events synthesized from an ongoing touch are dropped, otherwise each
/// finger would arrive twice.
#[derive(Debug)]
pub struct EguiInputTranslator {
    canvas_rect: Rect,
    touches: HashSet<u64>,
}

impl EguiInputTranslator {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            canvas_rect,
            touches: HashSet::new(),
        }
    }

    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    pub fn touch_active(&self) -> bool {
        !self.touches.is_empty()
    }

    pub fn process(&mut self, events: &[Event]) -> FrameInput {
        let mut frame = FrameInput::default();
        for event in events {
            match event {
                Event::Touch { id, phase, pos, .. } => {
                    let pointer_id = id.0.wrapping_add(1);
                    let pointer = PointerEvent::new(pointer_id, DeviceClass::Touch, *pos);
                    match phase {
                        TouchPhase::Start => {
                            self.touches.insert(pointer_id);
                            if self.canvas_rect.contains(*pos) {
                                frame.pointer.push(InputEvent::PointerDown(pointer));
                            }
                        }
                        TouchPhase::Move => frame.pointer.push(InputEvent::PointerMove(pointer)),
                        TouchPhase::End => {
                            self.touches.remove(&pointer_id);
                            frame.pointer.push(InputEvent::PointerUp(pointer));
                        }
                        TouchPhase::Cancel => {
                            self.touches.remove(&pointer_id);
                            frame.pointer.push(InputEvent::PointerCancel(pointer));
                        }
                    }
                }
                Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } if !self.touch_active() => {
                    let pointer = PointerEvent::new(MOUSE_POINTER_ID, DeviceClass::Mouse, *pos)
                        .with_button((*button).into());
                    if !*pressed {
                        frame.pointer.push(InputEvent::PointerUp(pointer));
                    } else if self.canvas_rect.contains(*pos) {
                        frame.pointer.push(InputEvent::PointerDown(pointer));
                    }
                }
                Event::PointerMoved(pos) if !self.touch_active() => {
                    let pointer = PointerEvent::new(MOUSE_POINTER_ID, DeviceClass::Mouse, *pos);
                    frame.pointer.push(InputEvent::PointerMove(pointer));
                }
                Event::PointerGone if !self.touch_active() => {
                    let pointer =
                        PointerEvent::new(MOUSE_POINTER_ID, DeviceClass::Mouse, self.canvas_rect.min);
                    frame.pointer.push(InputEvent::PointerLeave {
                        event: pointer,
                        captured: false,
                    });
                }
                Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    modifiers,
                    ..
                } => frame.commands.extend(shortcut_for(*key, *modifiers)),
                _ => {}
            }
        }
        frame
    }
}

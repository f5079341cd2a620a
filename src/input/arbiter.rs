use serde::{Deserialize, Serialize};

use super::{ButtonMask, DeviceClass, PointerButton, PointerEvent, PointerId};
use crate::stroke::StrokeTool;
use crate::tools::Tool;

/// Which device classes are allowed to ink. Everything else passes through
/// to the platform (scrolling, text selection).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InkInputPolicy {
    /// Stylus and mouse ink, fingers scroll.
    #[default]
    PointerDevices,
    /// Only a stylus inks.
    StylusOnly,
    /// Fingers ink too.
    AllDevices,
}

impl InkInputPolicy {
    pub fn inks_with(self, device: DeviceClass) -> bool {
        match (self, device) {
            (_, DeviceClass::Stylus) => true,
            (Self::PointerDevices | Self::AllDevices, DeviceClass::Mouse) => true,
            (Self::AllDevices, DeviceClass::Touch) => true,
            _ => false,
        }
    }
}

/// Why a pointer-down was not claimed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The device class is not allowed to ink under the current policy.
    PassThrough,
    /// The view tool is active.
    ViewMode,
    /// Another pointer owns the current gesture.
    Busy,
    /// A mouse press with something other than the primary button.
    NonPrimaryButton,
}

/// The outcome of a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    BeginStroke(StrokeTool),
    /// `overrides` holds the inking tool a stylus button temporarily replaced.
    BeginErase { overrides: Option<Tool> },
    Ignore(IgnoreReason),
}

impl Decision {
    pub fn is_claimed(&self) -> bool {
        !matches!(self, Decision::Ignore(_))
    }
}

/// Decides which pointer events drive the drawing engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputArbiter {
    policy: InkInputPolicy,
}

impl InputArbiter {
    pub fn new(policy: InkInputPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> InkInputPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: InkInputPolicy) {
        self.policy = policy;
    }

    /// Classifies a pointer-down given the selected tool and the pointer that
    /// currently owns a gesture, if any.
    pub fn decide(&self, event: &PointerEvent, tool: Tool, active: Option<PointerId>) -> Decision {
        if !self.policy.inks_with(event.device) {
            return Decision::Ignore(IgnoreReason::PassThrough);
        }
        if tool == Tool::View {
            return Decision::Ignore(IgnoreReason::ViewMode);
        }
        if active.is_some_and(|id| id != event.pointer_id) {
            return Decision::Ignore(IgnoreReason::Busy);
        }
        if event.device == DeviceClass::Mouse
            && event.button.is_some_and(|b| b != PointerButton::Primary)
        {
            return Decision::Ignore(IgnoreReason::NonPrimaryButton);
        }

        match tool.stroke_tool() {
            Some(_) if Self::is_secondary_actuation(event) => Decision::BeginErase {
                overrides: Some(tool),
            },
            Some(stroke_tool) => Decision::BeginStroke(stroke_tool),
            None => Decision::BeginErase { overrides: None },
        }
    }

    /// Only the pointer that began a gesture may continue or end it.
    pub fn owns(&self, active: Option<PointerId>, event: &PointerEvent) -> bool {
        active == Some(event.pointer_id)
    }

    /// A stylus side button or eraser end.
    pub fn is_secondary_actuation(event: &PointerEvent) -> bool {
        event.device == DeviceClass::Stylus
            && (matches!(
                event.button,
                Some(PointerButton::Secondary | PointerButton::Eraser)
            ) || event.buttons.contains(ButtonMask::ERASER)
                || event.buttons.contains(ButtonMask::STYLUS_BUTTON))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn down(device: DeviceClass) -> PointerEvent {
        PointerEvent::new(1, device, pos2(10.0, 10.0))
    }

    #[test]
    fn test_touch_passes_through_by_default() {
        let arbiter = InputArbiter::default();
        assert_eq!(
            arbiter.decide(&down(DeviceClass::Touch), Tool::Pen, None),
            Decision::Ignore(IgnoreReason::PassThrough)
        );
        assert_eq!(
            arbiter.decide(&down(DeviceClass::Mouse), Tool::Pen, None),
            Decision::BeginStroke(StrokeTool::Ink)
        );
    }

    #[test]
    fn test_policy_is_the_only_switch() {
        let stylus_only = InputArbiter::new(InkInputPolicy::StylusOnly);
        assert!(!stylus_only.decide(&down(DeviceClass::Mouse), Tool::Pen, None).is_claimed());
        assert!(stylus_only.decide(&down(DeviceClass::Stylus), Tool::Pen, None).is_claimed());

        let all = InputArbiter::new(InkInputPolicy::AllDevices);
        assert_eq!(
            all.decide(&down(DeviceClass::Touch), Tool::Highlighter, None),
            Decision::BeginStroke(StrokeTool::Highlighter)
        );
    }

    #[test]
    fn test_view_mode_ignores() {
        let arbiter = InputArbiter::default();
        assert_eq!(
            arbiter.decide(&down(DeviceClass::Stylus), Tool::View, None),
            Decision::Ignore(IgnoreReason::ViewMode)
        );
    }

    #[test]
    fn test_busy_with_other_pointer() {
        let arbiter = InputArbiter::default();
        assert_eq!(
            arbiter.decide(&down(DeviceClass::Mouse), Tool::Pen, Some(PointerId(7))),
            Decision::Ignore(IgnoreReason::Busy)
        );
    }

    #[test]
    fn test_mouse_secondary_button_ignored() {
        let arbiter = InputArbiter::default();
        let event = down(DeviceClass::Mouse).with_button(PointerButton::Secondary);
        assert_eq!(
            arbiter.decide(&event, Tool::Pen, None),
            Decision::Ignore(IgnoreReason::NonPrimaryButton)
        );
    }

    #[test]
    fn test_stylus_button_overrides_to_eraser() {
        let arbiter = InputArbiter::default();
        let barrel = down(DeviceClass::Stylus).with_buttons(ButtonMask::STYLUS_BUTTON);
        assert_eq!(
            arbiter.decide(&barrel, Tool::Highlighter, None),
            Decision::BeginErase {
                overrides: Some(Tool::Highlighter)
            }
        );

        let eraser_end = down(DeviceClass::Stylus).with_button(PointerButton::Eraser);
        assert_eq!(
            arbiter.decide(&eraser_end, Tool::Eraser, None),
            Decision::BeginErase { overrides: None }
        );
    }
}

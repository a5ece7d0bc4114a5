#![forbid(unsafe_code)]

//! Host view port.

use rdtouch_core::Point;

use crate::strategy::InputFeedbackType;

/// What the gesture handler asks of the view that displays the desktop.
pub trait DesktopView {
    /// Start or stop calling [`TouchInputHandler::process_animation`] every frame.
    ///
    /// [`TouchInputHandler::process_animation`]: crate::handler::TouchInputHandler::process_animation
    fn set_animation_enabled(&mut self, enabled: bool);

    fn show_action_bar(&mut self);

    fn show_keyboard(&mut self);

    /// Draw local feedback at `position` (image coordinates).
    fn show_input_feedback(&mut self, feedback: InputFeedbackType, position: Point);

    /// The cursor position in the shared render data changed.
    fn cursor_moved(&mut self) {}

    /// The input mode changed; the cursor may need to be shown or hidden.
    fn cursor_visibility_changed(&mut self) {}
}

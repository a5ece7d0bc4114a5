#![forbid(unsafe_code)]

//! Input strategies: how recognised gestures become remote input.
//!
//! The [`TouchInputHandler`](crate::handler::TouchInputHandler) decides
//! *what* the user did (tap, long press, two-finger scroll, ...). The active
//! [`InputStrategy`] decides what that means for the remote host, and sends
//! the result through an [`InputEventSender`].
//!
//! | Strategy | Pointing | Remote events |
//! |----------|----------|---------------|
//! | [`TrackpadInputStrategy`] | indirect (cursor moves relatively) | mouse |
//! | [`SimulatedTouchInputStrategy`] | direct (cursor under the finger) | mouse |
//! | [`TouchInputStrategy`] | direct | native touch |
//! | [`NullInputStrategy`] | direct | none |
//!
//! Exactly one strategy is active at a time; switching strategies is the
//! handler's job, which aborts any running fling first.

use std::rc::Rc;

use rdtouch_core::{Point, RenderData, TouchEvent, Vec2};

use crate::config::TouchConfig;

pub mod simulated_touch;
pub mod touch;
pub mod trackpad;

pub use simulated_touch::SimulatedTouchInputStrategy;
pub use touch::TouchInputStrategy;
pub use trackpad::TrackpadInputStrategy;

// ---------------------------------------------------------------------------
// Shared vocabulary
// ---------------------------------------------------------------------------

/// Remote mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Button emulated by a tap or long press with `pointer_count` fingers.
    ///
    /// One finger is left, two right, three middle; anything else is not a
    /// button.
    #[must_use]
    pub const fn from_pointer_count(pointer_count: usize) -> Option<Self> {
        match pointer_count {
            1 => Some(Self::Left),
            2 => Some(Self::Right),
            3 => Some(Self::Middle),
            _ => None,
        }
    }

    /// Protocol button id (left = 1, middle = 2, right = 3).
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::Left => 1,
            Self::Middle => 2,
            Self::Right => 3,
        }
    }
}

/// Local feedback shown when a gesture is sent to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFeedbackType {
    #[default]
    None,
    ShortTouchAnimation,
    LongTouchAnimation,
}

/// Phase of a remote touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteTouchEventKind {
    Start,
    Move,
    End,
    Cancel,
}

/// One touch point in remote-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemoteTouchPoint {
    pub id: u32,
    pub position: Point,
}

/// Outbound port to the remote host.
///
/// Implementations take `&self`; the sender is shared by whichever strategy
/// is active and is only touched from the input thread.
pub trait InputEventSender {
    /// Move the mouse to `(x, y)` and optionally change a button's state.
    fn send_mouse_event(&self, x: i32, y: i32, button: Option<MouseButton>, button_down: bool);

    /// Scroll by whole wheel units.
    fn send_mouse_wheel_event(&self, delta_x: i32, delta_y: i32);

    /// Send a native touch event.
    fn send_touch_event(&self, kind: RemoteTouchEventKind, points: &[RemoteTouchPoint]);

    fn send_cursor_move(&self, x: i32, y: i32) {
        self.send_mouse_event(x, y, None, false);
    }

    fn send_mouse_down(&self, position: Point, button: MouseButton) {
        self.send_mouse_event(position.x as i32, position.y as i32, Some(button), true);
    }

    fn send_mouse_up(&self, position: Point, button: MouseButton) {
        self.send_mouse_event(position.x as i32, position.y as i32, Some(button), false);
    }

    fn send_mouse_click(&self, position: Point, button: MouseButton) {
        self.send_mouse_down(position, button);
        self.send_mouse_up(position, button);
    }

    /// Scroll in the opposite direction of `distance`, truncated to whole units.
    ///
    /// Scroll distances run opposite to finger travel, while wheel deltas
    /// follow the content.
    fn send_reverse_mouse_wheel_event(&self, distance: Vec2) {
        self.send_mouse_wheel_event(-(distance.x as i32), -(distance.y as i32));
    }
}

/// How translated gestures become remote input.
pub trait InputStrategy {
    /// A tap with the given button; returns whether it was sent.
    fn on_tap(&mut self, button: MouseButton, render_data: &RenderData) -> bool;

    /// A long press with the given button; returns whether it was sent.
    fn on_press_and_hold(&mut self, button: MouseButton, render_data: &RenderData) -> bool;

    /// Observe every raw event before the gesture detectors see it.
    fn on_motion_event(&mut self, event: &TouchEvent, render_data: &RenderData);

    /// A two-finger scroll (or scroll fling step), screen pixels.
    fn on_scroll(&mut self, distance: Vec2);

    /// The cursor moved to `(x, y)` in image coordinates.
    fn inject_cursor_move_event(&mut self, x: i32, y: i32);

    fn short_press_feedback_type(&self) -> InputFeedbackType;

    fn long_press_feedback_type(&self) -> InputFeedbackType;

    /// Trackpad semantics (`true`) or touch semantics (`false`).
    fn is_indirect_input_mode(&self) -> bool;
}

/// Placeholder used until a real strategy is selected.
///
/// Handles nothing and reports direct input mode, which still lets the user
/// pan and zoom the desktop image.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullInputStrategy;

impl InputStrategy for NullInputStrategy {
    fn on_tap(&mut self, _button: MouseButton, _render_data: &RenderData) -> bool {
        false
    }

    fn on_press_and_hold(&mut self, _button: MouseButton, _render_data: &RenderData) -> bool {
        false
    }

    fn on_motion_event(&mut self, _event: &TouchEvent, _render_data: &RenderData) {}

    fn on_scroll(&mut self, _distance: Vec2) {}

    fn inject_cursor_move_event(&mut self, _x: i32, _y: i32) {}

    fn short_press_feedback_type(&self) -> InputFeedbackType {
        InputFeedbackType::None
    }

    fn long_press_feedback_type(&self) -> InputFeedbackType {
        InputFeedbackType::None
    }

    fn is_indirect_input_mode(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Input mode chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Trackpad,
    Touch,
}

/// Whether the host accepts native touch events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostTouchCapability {
    Supported,
    Unsupported,
}

/// Build the strategy for a mode/capability pair.
pub fn create_input_strategy(
    mode: InputMode,
    capability: HostTouchCapability,
    sender: Rc<dyn InputEventSender>,
    config: &TouchConfig,
) -> Box<dyn InputStrategy> {
    match (mode, capability) {
        (InputMode::Trackpad, _) => Box::new(TrackpadInputStrategy::new(sender)),
        (InputMode::Touch, HostTouchCapability::Supported) => {
            Box::new(TouchInputStrategy::new(sender, config))
        }
        (InputMode::Touch, HostTouchCapability::Unsupported) => {
            Box::new(SimulatedTouchInputStrategy::new(sender, config))
        }
    }
}

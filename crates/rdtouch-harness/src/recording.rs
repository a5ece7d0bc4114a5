#![forbid(unsafe_code)]

//! Recording test doubles for the handler's ports.

use std::cell::RefCell;
use std::rc::Rc;

use rdtouch_core::{Point, RenderData, TouchAction, TouchEvent, Vec2};
use rdtouch_input::{
    DesktopView, InputEventSender, InputFeedbackType, InputStrategy, MouseButton,
    RemoteTouchEventKind, RemoteTouchPoint,
};

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// A call made on a [`RecordingView`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEvent {
    AnimationEnabled(bool),
    ShowActionBar,
    ShowKeyboard,
    InputFeedback(InputFeedbackType, Point),
    CursorMoved,
    CursorVisibilityChanged,
}

/// [`DesktopView`] that logs every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
    animation_enabled: bool,
}

impl RecordingView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value passed to `set_animation_enabled`.
    #[must_use]
    pub fn animation_enabled(&self) -> bool {
        self.animation_enabled
    }

    #[must_use]
    pub fn count(&self, event: &ViewEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    /// Feedback calls in order.
    #[must_use]
    pub fn feedback(&self) -> Vec<(InputFeedbackType, Point)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::InputFeedback(kind, at) => Some((*kind, *at)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl DesktopView for RecordingView {
    fn set_animation_enabled(&mut self, enabled: bool) {
        self.animation_enabled = enabled;
        self.events.push(ViewEvent::AnimationEnabled(enabled));
    }

    fn show_action_bar(&mut self) {
        self.events.push(ViewEvent::ShowActionBar);
    }

    fn show_keyboard(&mut self) {
        self.events.push(ViewEvent::ShowKeyboard);
    }

    fn show_input_feedback(&mut self, feedback: InputFeedbackType, position: Point) {
        self.events.push(ViewEvent::InputFeedback(feedback, position));
    }

    fn cursor_moved(&mut self) {
        self.events.push(ViewEvent::CursorMoved);
    }

    fn cursor_visibility_changed(&mut self) {
        self.events.push(ViewEvent::CursorVisibilityChanged);
    }
}

// ---------------------------------------------------------------------------
// Sender
// ---------------------------------------------------------------------------

/// A call made on a [`RecordingSender`].
#[derive(Debug, Clone, PartialEq)]
pub enum SenderEvent {
    Mouse {
        x: i32,
        y: i32,
        button: Option<MouseButton>,
        down: bool,
    },
    Wheel {
        dx: i32,
        dy: i32,
    },
    Touch {
        kind: RemoteTouchEventKind,
        points: Vec<RemoteTouchPoint>,
    },
}

/// [`InputEventSender`] that logs every event instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingSender {
    events: RefCell<Vec<SenderEvent>>,
}

impl RecordingSender {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    #[must_use]
    pub fn events(&self) -> Vec<SenderEvent> {
        self.events.borrow().clone()
    }

    /// Mouse events that change a button state.
    #[must_use]
    pub fn button_events(&self) -> Vec<(MouseButton, bool)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SenderEvent::Mouse {
                    button: Some(b),
                    down,
                    ..
                } => Some((*b, *down)),
                _ => None,
            })
            .collect()
    }

    /// Kinds of the touch events sent, in order.
    #[must_use]
    pub fn touch_kinds(&self) -> Vec<RemoteTouchEventKind> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SenderEvent::Touch { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl InputEventSender for RecordingSender {
    fn send_mouse_event(&self, x: i32, y: i32, button: Option<MouseButton>, button_down: bool) {
        self.events.borrow_mut().push(SenderEvent::Mouse {
            x,
            y,
            button,
            down: button_down,
        });
    }

    fn send_mouse_wheel_event(&self, delta_x: i32, delta_y: i32) {
        self.events.borrow_mut().push(SenderEvent::Wheel {
            dx: delta_x,
            dy: delta_y,
        });
    }

    fn send_touch_event(&self, kind: RemoteTouchEventKind, points: &[RemoteTouchPoint]) {
        self.events.borrow_mut().push(SenderEvent::Touch {
            kind,
            points: points.to_vec(),
        });
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// A call made on a [`RecordingStrategy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrategyCall {
    Tap(MouseButton),
    PressAndHold(MouseButton),
    Motion(TouchAction),
    Scroll(Vec2),
    CursorMove(i32, i32),
}

/// Shared view of a [`RecordingStrategy`]'s calls, usable after the strategy
/// has been moved into a handler.
#[derive(Debug, Clone, Default)]
pub struct StrategyLog(Rc<RefCell<Vec<StrategyCall>>>);

impl StrategyLog {
    #[must_use]
    pub fn calls(&self) -> Vec<StrategyCall> {
        self.0.borrow().clone()
    }

    /// Scroll distances in order.
    #[must_use]
    pub fn scrolls(&self) -> Vec<Vec2> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                StrategyCall::Scroll(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn taps(&self) -> Vec<MouseButton> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                StrategyCall::Tap(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn presses(&self) -> Vec<MouseButton> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                StrategyCall::PressAndHold(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn cursor_moves(&self) -> Vec<(i32, i32)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                StrategyCall::CursorMove(x, y) => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, call: StrategyCall) {
        self.0.borrow_mut().push(call);
    }
}

/// [`InputStrategy`] that logs every call and reports a fixed outcome.
#[derive(Debug, Clone)]
pub struct RecordingStrategy {
    log: StrategyLog,
    indirect: bool,
    handled: bool,
    short_feedback: InputFeedbackType,
    long_feedback: InputFeedbackType,
}

impl RecordingStrategy {
    /// Touch semantics; taps and presses are reported as handled.
    #[must_use]
    pub fn direct() -> Self {
        Self {
            log: StrategyLog::default(),
            indirect: false,
            handled: true,
            short_feedback: InputFeedbackType::ShortTouchAnimation,
            long_feedback: InputFeedbackType::LongTouchAnimation,
        }
    }

    /// Trackpad semantics; taps and presses are reported as handled.
    #[must_use]
    pub fn indirect() -> Self {
        Self {
            indirect: true,
            ..Self::direct()
        }
    }

    /// Report taps and presses as handled (`true`) or not.
    #[must_use]
    pub fn handled(mut self, handled: bool) -> Self {
        self.handled = handled;
        self
    }

    #[must_use]
    pub fn log(&self) -> StrategyLog {
        self.log.clone()
    }
}

impl InputStrategy for RecordingStrategy {
    fn on_tap(&mut self, button: MouseButton, _render_data: &RenderData) -> bool {
        self.log.push(StrategyCall::Tap(button));
        self.handled
    }

    fn on_press_and_hold(&mut self, button: MouseButton, _render_data: &RenderData) -> bool {
        self.log.push(StrategyCall::PressAndHold(button));
        self.handled
    }

    fn on_motion_event(&mut self, event: &TouchEvent, _render_data: &RenderData) {
        self.log.push(StrategyCall::Motion(event.action));
    }

    fn on_scroll(&mut self, distance: Vec2) {
        self.log.push(StrategyCall::Scroll(distance));
    }

    fn inject_cursor_move_event(&mut self, x: i32, y: i32) {
        self.log.push(StrategyCall::CursorMove(x, y));
    }

    fn short_press_feedback_type(&self) -> InputFeedbackType {
        self.short_feedback
    }

    fn long_press_feedback_type(&self) -> InputFeedbackType {
        self.long_feedback
    }

    fn is_indirect_input_mode(&self) -> bool {
        self.indirect
    }
}

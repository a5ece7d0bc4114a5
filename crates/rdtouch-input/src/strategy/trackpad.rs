#![forbid(unsafe_code)]

//! Trackpad (indirect) input: the finger moves a cursor, taps click at it.

use std::rc::Rc;

use rdtouch_core::{RenderData, TouchEvent, Vec2};

use super::{InputEventSender, InputFeedbackType, InputStrategy, MouseButton};

/// Mouse emulation with trackpad semantics.
///
/// A long press holds its button down until the touch sequence ends, which
/// turns the following one-finger pan into a drag.
pub struct TrackpadInputStrategy {
    sender: Rc<dyn InputEventSender>,
    held_button: Option<MouseButton>,
}

impl TrackpadInputStrategy {
    #[must_use]
    pub fn new(sender: Rc<dyn InputEventSender>) -> Self {
        Self {
            sender,
            held_button: None,
        }
    }

    /// Button currently held down by a press-and-hold, if any.
    #[must_use]
    pub fn held_button(&self) -> Option<MouseButton> {
        self.held_button
    }
}

impl InputStrategy for TrackpadInputStrategy {
    fn on_tap(&mut self, button: MouseButton, render_data: &RenderData) -> bool {
        self.sender
            .send_mouse_click(render_data.cursor_position(), button);
        true
    }

    fn on_press_and_hold(&mut self, button: MouseButton, render_data: &RenderData) -> bool {
        self.sender
            .send_mouse_down(render_data.cursor_position(), button);
        self.held_button = Some(button);
        true
    }

    fn on_motion_event(&mut self, event: &TouchEvent, render_data: &RenderData) {
        if !event.is_sequence_end() {
            return;
        }
        if let Some(button) = self.held_button.take() {
            self.sender
                .send_mouse_up(render_data.cursor_position(), button);
        }
    }

    fn on_scroll(&mut self, distance: Vec2) {
        self.sender.send_reverse_mouse_wheel_event(distance);
    }

    fn inject_cursor_move_event(&mut self, x: i32, y: i32) {
        self.sender.send_cursor_move(x, y);
    }

    fn short_press_feedback_type(&self) -> InputFeedbackType {
        InputFeedbackType::None
    }

    fn long_press_feedback_type(&self) -> InputFeedbackType {
        InputFeedbackType::LongTouchAnimation
    }

    fn is_indirect_input_mode(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{RemoteTouchEventKind, RemoteTouchPoint};
    use rdtouch_core::{Point, TouchAction};
    use std::cell::RefCell;
    use std::time::Duration;

    #[derive(Default)]
    struct Log(RefCell<Vec<(i32, i32, Option<MouseButton>, bool)>>);

    impl InputEventSender for Log {
        fn send_mouse_event(&self, x: i32, y: i32, b: Option<MouseButton>, down: bool) {
            self.0.borrow_mut().push((x, y, b, down));
        }
        fn send_mouse_wheel_event(&self, _: i32, _: i32) {}
        fn send_touch_event(&self, _: RemoteTouchEventKind, _: &[RemoteTouchPoint]) {}
    }

    fn setup() -> (Rc<Log>, TrackpadInputStrategy, RenderData) {
        let log = Rc::new(Log::default());
        let strategy = TrackpadInputStrategy::new(log.clone());
        let mut rd = RenderData::new();
        rd.image_width = 800;
        rd.image_height = 600;
        rd.set_cursor_position(Point::new(40.0, 30.0));
        (log, strategy, rd)
    }

    #[test]
    fn tap_clicks_at_cursor() {
        let (log, mut s, rd) = setup();
        assert!(s.on_tap(MouseButton::Right, &rd));
        assert_eq!(
            log.0.borrow().as_slice(),
            &[
                (40, 30, Some(MouseButton::Right), true),
                (40, 30, Some(MouseButton::Right), false)
            ]
        );
    }

    #[test]
    fn held_button_released_when_sequence_ends() {
        let (log, mut s, rd) = setup();
        assert!(s.on_press_and_hold(MouseButton::Left, &rd));
        assert_eq!(s.held_button(), Some(MouseButton::Left));
        s.on_motion_event(&TouchEvent::move_to(1.0, 1.0, Duration::ZERO), &rd);
        assert_eq!(log.0.borrow().len(), 1);
        s.on_motion_event(
            &TouchEvent::new(TouchAction::Cancel, Vec::new(), Duration::ZERO),
            &rd,
        );
        assert_eq!(s.held_button(), None);
        assert_eq!(
            log.0.borrow().last(),
            Some(&(40, 30, Some(MouseButton::Left), false))
        );
    }
}

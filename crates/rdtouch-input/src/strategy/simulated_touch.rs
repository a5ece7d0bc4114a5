#![forbid(unsafe_code)]

//! Direct input emulated with mouse events, for hosts without touch support.
//!
//! The cursor sits under the finger, so taps click wherever the user touched.
//! Fingers are imprecise: a second left tap that lands shortly after the
//! first and near it is sent at the first tap's position, so the host sees a
//! proper double click instead of two clicks a few pixels apart.

use std::rc::Rc;
use std::time::Duration;

use rdtouch_core::{Point, RenderData, TouchAction, TouchEvent, Vec2};

use super::{InputEventSender, InputFeedbackType, InputStrategy, MouseButton};
use crate::config::TouchConfig;

#[derive(Debug, Clone, Copy)]
struct LastTap {
    time: Duration,
    image_position: Point,
}

/// Mouse emulation with touch semantics.
pub struct SimulatedTouchInputStrategy {
    sender: Rc<dyn InputEventSender>,
    double_tap_timeout: Duration,
    double_tap_slop_square: f64,
    held_button: Option<MouseButton>,
    last_down_time: Duration,
    last_tap: Option<LastTap>,
}

impl SimulatedTouchInputStrategy {
    #[must_use]
    pub fn new(sender: Rc<dyn InputEventSender>, config: &TouchConfig) -> Self {
        let slop = config.double_tap_slop();
        Self {
            sender,
            double_tap_timeout: config.double_tap_timeout(),
            double_tap_slop_square: slop * slop,
            held_button: None,
            last_down_time: Duration::ZERO,
            last_tap: None,
        }
    }

    /// Where a left tap at the current cursor should be sent.
    ///
    /// Distances are compared on screen so the slop does not depend on zoom.
    fn snapped_tap_position(&self, render_data: &RenderData) -> Point {
        let cursor = render_data.cursor_position();
        let Some(last) = self.last_tap else {
            return cursor;
        };
        let elapsed = self.last_down_time.saturating_sub(last.time);
        if elapsed > self.double_tap_timeout {
            return cursor;
        }
        let here = render_data.map_image_point_to_screen_point(cursor);
        let there = render_data.map_image_point_to_screen_point(last.image_position);
        if (here - there).hypot2() <= self.double_tap_slop_square {
            last.image_position
        } else {
            cursor
        }
    }
}

impl InputStrategy for SimulatedTouchInputStrategy {
    fn on_tap(&mut self, button: MouseButton, render_data: &RenderData) -> bool {
        let position = if button == MouseButton::Left {
            let position = self.snapped_tap_position(render_data);
            self.last_tap = Some(LastTap {
                time: self.last_down_time,
                image_position: position,
            });
            position
        } else {
            self.last_tap = None;
            render_data.cursor_position()
        };
        self.sender.send_mouse_click(position, button);
        true
    }

    fn on_press_and_hold(&mut self, button: MouseButton, render_data: &RenderData) -> bool {
        self.last_tap = None;
        self.sender
            .send_mouse_down(render_data.cursor_position(), button);
        self.held_button = Some(button);
        true
    }

    fn on_motion_event(&mut self, event: &TouchEvent, render_data: &RenderData) {
        if event.action == TouchAction::Down {
            self.last_down_time = event.time;
        }
        if event.is_sequence_end() {
            if let Some(button) = self.held_button.take() {
                self.sender
                    .send_mouse_up(render_data.cursor_position(), button);
            }
        }
    }

    fn on_scroll(&mut self, distance: Vec2) {
        self.sender.send_reverse_mouse_wheel_event(distance);
    }

    fn inject_cursor_move_event(&mut self, x: i32, y: i32) {
        self.sender.send_cursor_move(x, y);
    }

    fn short_press_feedback_type(&self) -> InputFeedbackType {
        InputFeedbackType::ShortTouchAnimation
    }

    fn long_press_feedback_type(&self) -> InputFeedbackType {
        InputFeedbackType::LongTouchAnimation
    }

    fn is_indirect_input_mode(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{RemoteTouchEventKind, RemoteTouchPoint};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Clicks(RefCell<Vec<(i32, i32, bool)>>);

    impl InputEventSender for Clicks {
        fn send_mouse_event(&self, x: i32, y: i32, b: Option<MouseButton>, down: bool) {
            if b.is_some() {
                self.0.borrow_mut().push((x, y, down));
            }
        }
        fn send_mouse_wheel_event(&self, _: i32, _: i32) {}
        fn send_touch_event(&self, _: RemoteTouchEventKind, _: &[RemoteTouchPoint]) {}
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn render_data() -> RenderData {
        let mut rd = RenderData::new();
        rd.image_width = 1000;
        rd.image_height = 1000;
        rd
    }

    fn tap_at(
        s: &mut SimulatedTouchInputStrategy,
        rd: &mut RenderData,
        at: (f64, f64),
        t: u64,
    ) {
        s.on_motion_event(&TouchEvent::down(at.0, at.1, ms(t)), rd);
        rd.set_cursor_position(Point::new(at.0, at.1));
        s.on_motion_event(&TouchEvent::up(at.0, at.1, ms(t + 50)), rd);
        assert!(s.on_tap(MouseButton::Left, rd));
    }

    #[test]
    fn quick_nearby_second_tap_snaps_to_first() {
        let clicks = Rc::new(Clicks::default());
        let mut s = SimulatedTouchInputStrategy::new(clicks.clone(), &TouchConfig::default());
        let mut rd = render_data();
        tap_at(&mut s, &mut rd, (100.0, 100.0), 0);
        tap_at(&mut s, &mut rd, (130.0, 110.0), 200);
        let log = clicks.0.borrow();
        assert_eq!(log[2], (100, 100, true));
        assert_eq!(log[3], (100, 100, false));
    }

    #[test]
    fn late_or_distant_second_tap_is_not_snapped() {
        let clicks = Rc::new(Clicks::default());
        let mut s = SimulatedTouchInputStrategy::new(clicks.clone(), &TouchConfig::default());
        let mut rd = render_data();
        tap_at(&mut s, &mut rd, (100.0, 100.0), 0);
        tap_at(&mut s, &mut rd, (130.0, 110.0), 1000);
        tap_at(&mut s, &mut rd, (400.0, 400.0), 1100);
        let log = clicks.0.borrow();
        assert_eq!(log[2], (130, 110, true));
        assert_eq!(log[4], (400, 400, true));
    }

    #[test]
    fn press_and_hold_releases_on_up() {
        let clicks = Rc::new(Clicks::default());
        let mut s = SimulatedTouchInputStrategy::new(clicks.clone(), &TouchConfig::default());
        let mut rd = render_data();
        rd.set_cursor_position(Point::new(5.0, 6.0));
        s.on_motion_event(&TouchEvent::down(5.0, 6.0, ms(0)), &rd);
        assert!(s.on_press_and_hold(MouseButton::Left, &rd));
        s.on_motion_event(&TouchEvent::up(5.0, 6.0, ms(900)), &rd);
        assert_eq!(clicks.0.borrow().as_slice(), &[(5, 6, true), (5, 6, false)]);
    }
}

#![forbid(unsafe_code)]

//! Multi-finger tap and long-press detection.
//!
//! # State Machine
//!
//! - `Down` starts a candidate with one pointer; each `PointerDown` raises the
//!   candidate's pointer count (never lowers it) and re-arms the long-press
//!   deadline.
//! - Any pointer straying beyond the touch slop from where it landed cancels
//!   the candidate: no tap, no long press.
//! - The final `Up` reports a `Tap` with the maximum pointer count seen.
//! - [`TapDetector::check_long_press`] reports a `LongPress` once the deadline
//!   passes; the candidate is then consumed and the `Up` reports nothing.
//!
//! # Invariants
//!
//! 1. At most one of `Tap` / `LongPress` is reported per sequence.
//! 2. The reported position is where the first pointer landed.

use std::collections::BTreeMap;
use std::time::Duration;

use rdtouch_core::{Point, TouchAction, TouchEvent};

use crate::config::TouchConfig;

/// Output of the [`TapDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapGesture {
    Tap { pointer_count: usize, position: Point },
    LongPress { pointer_count: usize, position: Point },
}

/// Recognises taps and long presses made with one or more fingers.
#[derive(Debug, Clone)]
pub struct TapDetector {
    touch_slop_square: f64,
    long_press_timeout: Duration,
    pointer_count: usize,
    initial_positions: BTreeMap<u32, Point>,
    position: Point,
    long_press_deadline: Option<Duration>,
    tap_cancelled: bool,
}

impl TapDetector {
    #[must_use]
    pub fn new(config: &TouchConfig) -> Self {
        let slop = config.touch_slop();
        Self {
            touch_slop_square: slop * slop,
            long_press_timeout: config.long_press_timeout(),
            pointer_count: 0,
            initial_positions: BTreeMap::new(),
            position: Point::ORIGIN,
            long_press_deadline: None,
            tap_cancelled: true,
        }
    }

    /// Whether a long press is armed.
    #[inline]
    #[must_use]
    pub fn is_long_press_pending(&self) -> bool {
        self.long_press_deadline.is_some()
    }

    /// Feed one raw event; returns a tap if this event completed one.
    pub fn on_touch_event(&mut self, event: &TouchEvent) -> Option<TapGesture> {
        match event.action {
            TouchAction::Down => {
                self.reset();
                self.tap_cancelled = false;
                self.position = event.first_position();
                self.track_down(event);
                None
            }
            TouchAction::PointerDown { .. } => {
                if !self.tap_cancelled {
                    self.track_down(event);
                }
                None
            }
            TouchAction::Move => {
                if !self.tap_cancelled && self.moved_beyond_slop(event) {
                    self.cancel();
                }
                None
            }
            TouchAction::PointerUp { .. } => None,
            TouchAction::Up => {
                self.long_press_deadline = None;
                let fired = !self.tap_cancelled;
                self.tap_cancelled = true;
                fired.then_some(TapGesture::Tap {
                    pointer_count: self.pointer_count,
                    position: self.position,
                })
            }
            TouchAction::Cancel => {
                self.cancel();
                None
            }
        }
    }

    /// Report a long press if the hold deadline has passed by `now`.
    pub fn check_long_press(&mut self, now: Duration) -> Option<TapGesture> {
        let deadline = self.long_press_deadline?;
        if now < deadline {
            return None;
        }
        self.long_press_deadline = None;
        self.tap_cancelled = true;
        Some(TapGesture::LongPress {
            pointer_count: self.pointer_count,
            position: self.position,
        })
    }

    fn track_down(&mut self, event: &TouchEvent) {
        self.pointer_count = self.pointer_count.max(event.pointer_count());
        for p in &event.pointers {
            self.initial_positions.entry(p.id).or_insert(p.position);
        }
        self.long_press_deadline = Some(event.time + self.long_press_timeout);
    }

    fn moved_beyond_slop(&self, event: &TouchEvent) -> bool {
        event.pointers.iter().any(|p| {
            self.initial_positions
                .get(&p.id)
                .is_some_and(|start| (p.position - *start).hypot2() > self.touch_slop_square)
        })
    }

    fn cancel(&mut self) {
        self.tap_cancelled = true;
        self.long_press_deadline = None;
    }

    fn reset(&mut self) {
        self.pointer_count = 0;
        self.initial_positions.clear();
        self.long_press_deadline = None;
        self.tap_cancelled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdtouch_core::TouchPointer;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn detector() -> TapDetector {
        TapDetector::new(&TouchConfig::default())
    }

    fn pair(action: TouchAction, t: u64) -> TouchEvent {
        TouchEvent::new(
            action,
            vec![TouchPointer::new(0, 50.0, 50.0), TouchPointer::new(1, 90.0, 50.0)],
            ms(t),
        )
    }

    #[test]
    fn single_tap() {
        let mut td = detector();
        assert_eq!(td.on_touch_event(&TouchEvent::down(50.0, 50.0, ms(0))), None);
        let g = td.on_touch_event(&TouchEvent::up(52.0, 51.0, ms(80)));
        assert_eq!(
            g,
            Some(TapGesture::Tap {
                pointer_count: 1,
                position: Point::new(50.0, 50.0)
            })
        );
    }

    #[test]
    fn two_finger_tap_keeps_max_count() {
        let mut td = detector();
        td.on_touch_event(&TouchEvent::down(50.0, 50.0, ms(0)));
        td.on_touch_event(&pair(TouchAction::PointerDown { index: 1 }, 10));
        td.on_touch_event(&pair(TouchAction::PointerUp { index: 1 }, 60));
        let g = td.on_touch_event(&TouchEvent::up(50.0, 50.0, ms(70)));
        assert!(matches!(g, Some(TapGesture::Tap { pointer_count: 2, .. })));
    }

    #[test]
    fn movement_cancels_tap_and_long_press() {
        let mut td = detector();
        td.on_touch_event(&TouchEvent::down(50.0, 50.0, ms(0)));
        td.on_touch_event(&TouchEvent::move_to(80.0, 50.0, ms(20)));
        assert!(!td.is_long_press_pending());
        assert_eq!(td.check_long_press(ms(1000)), None);
        assert_eq!(td.on_touch_event(&TouchEvent::up(80.0, 50.0, ms(40))), None);
    }

    #[test]
    fn long_press_fires_once_and_consumes_tap() {
        let mut td = detector();
        td.on_touch_event(&TouchEvent::down(50.0, 50.0, ms(0)));
        assert_eq!(td.check_long_press(ms(499)), None);
        let g = td.check_long_press(ms(500));
        assert!(matches!(g, Some(TapGesture::LongPress { pointer_count: 1, .. })));
        assert_eq!(td.check_long_press(ms(900)), None);
        assert_eq!(td.on_touch_event(&TouchEvent::up(50.0, 50.0, ms(950))), None);
    }

    #[test]
    fn second_finger_rearms_long_press() {
        let mut td = detector();
        td.on_touch_event(&TouchEvent::down(50.0, 50.0, ms(0)));
        td.on_touch_event(&pair(TouchAction::PointerDown { index: 1 }, 300));
        assert_eq!(td.check_long_press(ms(600)), None);
        assert!(matches!(
            td.check_long_press(ms(800)),
            Some(TapGesture::LongPress { pointer_count: 2, .. })
        ));
    }

    #[test]
    fn cancel_drops_candidate() {
        let mut td = detector();
        td.on_touch_event(&TouchEvent::down(50.0, 50.0, ms(0)));
        td.on_touch_event(&TouchEvent::new(TouchAction::Cancel, Vec::new(), ms(10)));
        assert_eq!(td.on_touch_event(&TouchEvent::up(50.0, 50.0, ms(20))), None);
    }
}

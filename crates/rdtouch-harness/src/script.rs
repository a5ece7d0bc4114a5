#![forbid(unsafe_code)]

//! Scripted touch sequences.
//!
//! [`TouchScript`] keeps track of which fingers are down and where, so a test
//! can describe a gesture step by step and get well-formed events back:
//!
//! ```
//! use rdtouch_harness::TouchScript;
//!
//! let events = TouchScript::new()
//!     .down(100.0, 100.0)
//!     .pointer_down(200.0, 100.0)
//!     .move_by(0.0, 30.0)
//!     .pointer_up(1)
//!     .up()
//!     .build();
//! assert_eq!(events.len(), 5);
//! ```

use std::time::Duration;

use rdtouch_core::{TouchAction, TouchEvent, TouchPointer};
use rdtouch_input::{DesktopView, TouchInputHandler};

/// Default time between scripted events.
const DEFAULT_STEP: Duration = Duration::from_millis(10);

/// Builder for timed multi-pointer touch sequences.
#[derive(Debug, Clone)]
pub struct TouchScript {
    now: Duration,
    step: Duration,
    next_id: u32,
    pointers: Vec<TouchPointer>,
    events: Vec<TouchEvent>,
}

impl Default for TouchScript {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchScript {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            step: DEFAULT_STEP,
            next_id: 0,
            pointers: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Start the script at `time` instead of zero.
    #[must_use]
    pub fn starting_at(mut self, time: Duration) -> Self {
        self.now = time;
        self
    }

    /// Time between consecutive events.
    #[must_use]
    pub fn step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    /// Timestamp the next event will carry.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Let `millis` pass before the next event.
    #[must_use]
    pub fn wait_ms(mut self, millis: u64) -> Self {
        self.now += Duration::from_millis(millis);
        self
    }

    /// First finger lands.
    #[must_use]
    pub fn down(mut self, x: f64, y: f64) -> Self {
        self.pointers.clear();
        self.next_id = 0;
        self.add_pointer(x, y);
        self.emit(TouchAction::Down)
    }

    /// Another finger lands.
    #[must_use]
    pub fn pointer_down(mut self, x: f64, y: f64) -> Self {
        self.add_pointer(x, y);
        let index = self.pointers.len() - 1;
        self.emit(TouchAction::PointerDown { index })
    }

    /// Every finger moves by `(dx, dy)`.
    #[must_use]
    pub fn move_by(mut self, dx: f64, dy: f64) -> Self {
        for p in &mut self.pointers {
            p.position.x += dx;
            p.position.y += dy;
        }
        self.emit(TouchAction::Move)
    }

    /// Fingers move to the given positions, in pointer order.
    ///
    /// Extra positions are ignored; fingers without a position stay put.
    #[must_use]
    pub fn move_to(mut self, positions: &[(f64, f64)]) -> Self {
        for (p, (x, y)) in self.pointers.iter_mut().zip(positions) {
            p.position.x = *x;
            p.position.y = *y;
        }
        self.emit(TouchAction::Move)
    }

    /// Move every finger by `(dx, dy)` in `steps` equal increments.
    #[must_use]
    pub fn drag_by(mut self, dx: f64, dy: f64, steps: u32) -> Self {
        let n = f64::from(steps.max(1));
        for _ in 0..steps.max(1) {
            self = self.move_by(dx / n, dy / n);
        }
        self
    }

    /// The finger at `index` lifts while others stay down.
    #[must_use]
    pub fn pointer_up(mut self, index: usize) -> Self {
        if index >= self.pointers.len() {
            return self;
        }
        self = self.emit(TouchAction::PointerUp { index });
        self.pointers.remove(index);
        self
    }

    /// The last finger lifts.
    #[must_use]
    pub fn up(mut self) -> Self {
        self.pointers.truncate(1);
        self = self.emit(TouchAction::Up);
        self.pointers.clear();
        self
    }

    /// The platform aborts the sequence.
    #[must_use]
    pub fn cancel(mut self) -> Self {
        self = self.emit(TouchAction::Cancel);
        self.pointers.clear();
        self
    }

    #[must_use]
    pub fn build(self) -> Vec<TouchEvent> {
        self.events
    }

    fn add_pointer(&mut self, x: f64, y: f64) {
        self.pointers.push(TouchPointer::new(self.next_id, x, y));
        self.next_id += 1;
    }

    fn emit(mut self, action: TouchAction) -> Self {
        self.events
            .push(TouchEvent::new(action, self.pointers.clone(), self.now));
        self.now += self.step;
        self
    }
}

/// Feed `events` to `handler` in order; returns each event's handled flag.
pub fn feed<V: DesktopView>(handler: &mut TouchInputHandler<V>, events: &[TouchEvent]) -> Vec<bool> {
    events
        .iter()
        .map(|event| handler.handle_touch_event(event))
        .collect()
}

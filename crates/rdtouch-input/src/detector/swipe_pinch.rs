#![forbid(unsafe_code)]

//! Two-finger swipe vs. pinch disambiguation.
//!
//! The classification starts out unknown when the second finger lands. Once
//! either finger has travelled beyond the touch slop, the detector compares
//! how far each finger moved: if the vector between the fingers is still
//! within the slop of where it started, the fingers moved together and the
//! gesture is a swipe; otherwise it is a pinch. The decision sticks until the
//! next `Down` or the next time a second finger lands.
//!
//! This is the single source of truth the handler consults to keep two-finger
//! scroll and zoom mutually exclusive.

use rdtouch_core::{Point, TouchAction, TouchEvent};

use crate::config::TouchConfig;

/// Current two-finger classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TwoFingerMode {
    #[default]
    Undecided,
    Swipe,
    Pinch,
}

/// Decides whether a two-finger gesture is a swipe or a pinch.
#[derive(Debug, Clone)]
pub struct SwipePinchDetector {
    touch_slop_square: f64,
    mode: TwoFingerMode,
    first: Option<(Point, Point)>,
}

impl SwipePinchDetector {
    #[must_use]
    pub fn new(config: &TouchConfig) -> Self {
        let slop = config.touch_slop();
        Self {
            touch_slop_square: slop * slop,
            mode: TwoFingerMode::Undecided,
            first: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> TwoFingerMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn is_swiping(&self) -> bool {
        self.mode == TwoFingerMode::Swipe
    }

    #[inline]
    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.mode == TwoFingerMode::Pinch
    }

    /// Feed one raw event.
    pub fn on_touch_event(&mut self, event: &TouchEvent) {
        match event.action {
            TouchAction::Down => self.reset(),
            TouchAction::PointerDown { .. } => {
                self.reset();
                if event.pointer_count() == 2 {
                    self.first = Self::finger_pair(event);
                }
            }
            TouchAction::Move => {
                if event.pointer_count() == 2 {
                    self.try_to_detect(event);
                }
            }
            _ => {}
        }
    }

    fn try_to_detect(&mut self, event: &TouchEvent) {
        if self.mode != TwoFingerMode::Undecided {
            return;
        }
        let (Some((first0, first1)), Some((current0, current1))) =
            (self.first, Self::finger_pair(event))
        else {
            return;
        };

        let delta0 = current0 - first0;
        let delta1 = current1 - first1;
        if delta0.hypot2() <= self.touch_slop_square && delta1.hypot2() <= self.touch_slop_square {
            return;
        }

        self.mode = if (delta0 - delta1).hypot2() <= self.touch_slop_square {
            TwoFingerMode::Swipe
        } else {
            TwoFingerMode::Pinch
        };
        tracing::trace!(mode = ?self.mode, "two-finger gesture classified");
    }

    fn finger_pair(event: &TouchEvent) -> Option<(Point, Point)> {
        Some((event.position(0)?, event.position(1)?))
    }

    fn reset(&mut self) {
        self.mode = TwoFingerMode::Undecided;
        self.first = None;
    }
}
